// src/store/local.rs

//! Local filesystem novelty state backend.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── city_events.json      # SeenState for site "City Events"
//! └── museum_calendar.json  # SeenState for site "museum-calendar"
//! ```
//!
//! One JSON file per site, written atomically (temp file + rename), so
//! an interrupted write never corrupts another site's state and leaves
//! the current site's previous state intact.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::store::{NoveltyStore, SeenState};
use crate::utils::slugify;

/// Local filesystem store, one state file per site.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root_dir: PathBuf,
}

impl LocalStore {
    /// Create a new LocalStore rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// State file path for a site.
    fn path(&self, site_name: &str) -> PathBuf {
        self.root_dir.join(format!("{}.json", slugify(site_name)))
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &PathBuf, bytes: &[u8]) -> Result<()> {
        self.ensure_dir(path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self, path: &PathBuf) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl NoveltyStore for LocalStore {
    async fn load(&self, site_name: &str) -> Result<SeenState> {
        let path = self.path(site_name);
        match self.read_bytes(&path).await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => {
                log::debug!("No state file for {site_name}; starting empty");
                Ok(SeenState {
                    keys: Vec::new(),
                    ..SeenState::default()
                })
            }
        }
    }

    async fn persist(&self, site_name: &str, state: &SeenState) -> Result<()> {
        let path = self.path(site_name);
        let bytes = serde_json::to_vec_pretty(state)?;
        self.write_bytes(&path, &bytes).await
    }
}
