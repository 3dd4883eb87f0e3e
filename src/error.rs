// src/error.rs

//! Unified error handling for the monitor application.

use std::fmt;

use thiserror::Error;

/// Result type alias for monitor operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Page fetch failed for a site
    #[error("Fetch error for {site}: {message}")]
    Fetch { site: String, message: String },

    /// Record extraction failed for a site
    #[error("Extraction error for {site}: {message}")]
    Extraction { site: String, message: String },

    /// Seen-state read/write failed for a site
    #[error("Persistence error for {site}: {message}")]
    Persistence { site: String, message: String },
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a fetch error with site context.
    pub fn fetch(site: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            site: site.into(),
            message: message.to_string(),
        }
    }

    /// Create an extraction error with site context.
    pub fn extraction(site: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Extraction {
            site: site.into(),
            message: message.to_string(),
        }
    }

    /// Create a persistence error with site context.
    pub fn persistence(site: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Persistence {
            site: site.into(),
            message: message.to_string(),
        }
    }
}
