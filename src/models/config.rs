// src/models/config.rs

//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils::slugify;

use super::SiteConfig;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and run behavior settings
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Seen-state persistence settings
    #[serde(default)]
    pub state: StateConfig,

    /// Text preprocessing settings
    #[serde(default)]
    pub cleaning: CleaningConfig,

    /// Monitored site definitions
    #[serde(default)]
    pub sites: Vec<SiteConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// An unreadable or unparseable file is a fatal error: the run aborts
    /// before any site is processed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.monitor.user_agent.trim().is_empty() {
            return Err(AppError::validation("monitor.user_agent is empty"));
        }
        if self.monitor.timeout_secs == 0 {
            return Err(AppError::validation("monitor.timeout_secs must be > 0"));
        }
        if self.monitor.max_concurrent == 0 {
            return Err(AppError::validation("monitor.max_concurrent must be > 0"));
        }
        if self.state.max_keys_per_site == 0 {
            return Err(AppError::validation("state.max_keys_per_site must be > 0"));
        }
        if self.sites.is_empty() {
            return Err(AppError::validation("No sites defined"));
        }

        // Site names double as state partition keys, so both the names and
        // their filesystem slugs must be unique.
        let mut names = HashSet::new();
        let mut slugs = HashSet::new();
        for site in &self.sites {
            if site.name.trim().is_empty() {
                return Err(AppError::validation("Site with empty name"));
            }
            if !names.insert(site.name.as_str()) {
                return Err(AppError::validation(format!(
                    "Duplicate site name: {}",
                    site.name
                )));
            }
            if !slugs.insert(slugify(&site.name)) {
                return Err(AppError::validation(format!(
                    "Site names '{}' collide after slugification",
                    site.name
                )));
            }
            url::Url::parse(&site.url)
                .map_err(|e| AppError::validation(format!("Site {}: bad url: {e}", site.name)))?;
            if site.selectors.container.is_empty() {
                return Err(AppError::validation(format!(
                    "Site {}: selectors.container is empty",
                    site.name
                )));
            }
        }
        Ok(())
    }
}

/// HTTP client and run behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between site checks in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Maximum sites checked concurrently
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Seen-state persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Directory holding one state file per site
    #[serde(default = "defaults::state_dir")]
    pub dir: String,

    /// Maximum seen keys retained per site; oldest are evicted beyond this
    #[serde(default = "defaults::max_keys_per_site")]
    pub max_keys_per_site: usize,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            dir: defaults::state_dir(),
            max_keys_per_site: defaults::max_keys_per_site(),
        }
    }
}

/// Text cleaning/preprocessing settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CleaningConfig {
    /// Patterns to remove from titles
    #[serde(default)]
    pub title_remove_patterns: Vec<String>,

    /// Patterns to remove from dates
    #[serde(default)]
    pub date_remove_patterns: Vec<String>,
}

impl CleaningConfig {
    /// Clean text by normalizing whitespace and removing patterns.
    fn clean(&self, text: &str, patterns: &[String]) -> String {
        let mut result = crate::utils::normalize_whitespace(text);

        for pattern in patterns {
            result = result.replace(pattern, "");
        }

        result.trim().to_string()
    }

    /// Clean a title string.
    pub fn clean_title(&self, text: &str) -> String {
        self.clean(text, &self.title_remove_patterns)
    }

    /// Clean a date string.
    pub fn clean_date(&self, text: &str) -> String {
        self.clean(text, &self.date_remove_patterns)
    }
}

mod defaults {
    // Monitor defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; pagewatch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        100
    }
    pub fn max_concurrent() -> usize {
        4
    }

    // State defaults
    pub fn state_dir() -> String {
        "state".into()
    }
    pub fn max_keys_per_site() -> usize {
        500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> Config {
        toml::from_str(
            r#"
            [[sites]]
            name = "city-events"
            url = "https://example.com/events"
            [sites.selectors]
            container = [".event"]
            title = ["h3"]
            "#,
        )
        .unwrap()
    }

    #[test]
    fn validate_sample_config_ok() {
        assert!(sample_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_no_sites() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = sample_config();
        config.monitor.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_site_names() {
        let mut config = sample_config();
        let dup = config.sites[0].clone();
        config.sites.push(dup);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_colliding_slugs() {
        let mut config = sample_config();
        let mut other = config.sites[0].clone();
        // Distinct name, but identical state file slug.
        other.name = "City-Events".to_string();
        config.sites.push(other);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_url() {
        let mut config = sample_config();
        config.sites[0].url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn cleaning_removes_patterns_and_collapses_whitespace() {
        let cleaning = CleaningConfig {
            title_remove_patterns: vec!["[New]".to_string()],
            date_remove_patterns: vec![],
        };
        assert_eq!(
            cleaning.clean_title("  [New]  Spring   Concert "),
            "Spring Concert"
        );
    }

    #[test]
    fn monitor_defaults_apply() {
        let config = sample_config();
        assert_eq!(config.monitor.timeout_secs, 30);
        assert_eq!(config.state.max_keys_per_site, 500);
    }
}
