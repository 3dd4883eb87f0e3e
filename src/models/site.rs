// src/models/site.rs

//! Per-site monitoring configuration.

use serde::{Deserialize, Serialize};

use super::FieldSelectors;

/// How multiple keywords combine when filtering records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordMode {
    /// A record passes if at least one keyword matches
    #[default]
    Any,

    /// A record passes only if every keyword matches
    All,
}

/// Configuration for one monitored site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Unique site name, used as the state partition key
    pub name: String,

    /// URL of the page to monitor
    pub url: String,

    /// Whether this site is checked during a run
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Selector rules for record extraction
    #[serde(default)]
    pub selectors: FieldSelectors,

    /// Keywords a record must contain to be reported; empty reports all
    #[serde(default)]
    pub keywords: Vec<String>,

    /// How the keywords combine
    #[serde(default)]
    pub keyword_mode: KeywordMode,
}

fn default_enabled() -> bool {
    true
}
