// src/store/mod.rs

//! Per-site novelty state: which identity keys have been seen before.
//!
//! State is partitioned by site name so sites load and persist
//! independently, a persistence failure in one site cannot corrupt
//! another, and sites may be processed concurrently without shared
//! mutable state.

pub mod local;

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::NormalizedRecord;

// Re-export for convenience
pub use local::LocalStore;

/// Identity keys previously observed for one site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeenState {
    /// Last time this state was written
    pub updated_at: DateTime<Utc>,

    /// Seen identity keys, oldest first
    pub keys: Vec<String>,
}

impl Default for SeenState {
    fn default() -> Self {
        Self {
            updated_at: Utc::now(),
            keys: Vec::new(),
        }
    }
}

impl SeenState {
    /// Whether a key has been observed before.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }
}

/// Partition candidates into unseen records and the successor state.
///
/// The successor state holds every key observed this run plus prior keys
/// not observed, with observed keys moved to the back so eviction always
/// drops the least recently observed. Within-run duplicates collapse to
/// their first occurrence.
pub fn diff(
    state: &SeenState,
    candidates: &[NormalizedRecord],
    max_keys: usize,
) -> (Vec<NormalizedRecord>, SeenState) {
    let prior: HashSet<&str> = state.keys.iter().map(String::as_str).collect();
    let observed: HashSet<&str> = candidates
        .iter()
        .map(|r| r.identity_key.as_str())
        .collect();

    let mut keys: Vec<String> = state
        .keys
        .iter()
        .filter(|k| !observed.contains(k.as_str()))
        .cloned()
        .collect();

    let mut fresh = Vec::new();
    let mut appended: HashSet<&str> = HashSet::new();
    for record in candidates {
        let key = record.identity_key.as_str();
        if !appended.insert(key) {
            continue;
        }
        keys.push(record.identity_key.clone());
        if !prior.contains(key) {
            fresh.push(record.clone());
        }
    }

    if keys.len() > max_keys {
        let excess = keys.len() - max_keys;
        keys.drain(..excess);
    }

    let updated = SeenState {
        updated_at: Utc::now(),
        keys,
    };
    (fresh, updated)
}

/// Trait for novelty state backends.
#[async_trait]
pub trait NoveltyStore: Send + Sync {
    /// Load the seen state for a site. A site never checked before has
    /// an empty state; that is not an error.
    async fn load(&self, site_name: &str) -> Result<SeenState>;

    /// Durably write the state so the next run can load it. Must not
    /// corrupt other sites' state if interrupted.
    async fn persist(&self, site_name: &str, state: &SeenState) -> Result<()>;
}
