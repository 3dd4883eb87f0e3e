// src/models/mod.rs

//! Domain models for the monitor application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod record;
mod selectors;
mod site;

// Re-export all public types
pub use config::{CleaningConfig, Config, MonitorConfig, StateConfig};
pub use record::{Extraction, NormalizedRecord, RawRecord};
pub use selectors::FieldSelectors;
pub use site::{KeywordMode, SiteConfig};
