// src/models/record.rs

//! Event record data structures.

use serde::{Deserialize, Serialize};

/// A candidate record extracted from a page.
///
/// Every field is optional: a selector that found nothing is represented
/// as absence, never as an error. Raw records are transient and are not
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// Record title text
    pub title: Option<String>,

    /// Record date text, as published (no date parsing is attempted)
    pub date: Option<String>,

    /// Record description text
    pub description: Option<String>,

    /// Absolute URL to the record
    pub link: Option<String>,
}

/// Outcome of running extraction over one page.
#[derive(Debug, Clone)]
pub enum Extraction {
    /// Selector-based extraction produced at least one record
    Structured(Vec<RawRecord>),

    /// Whole-page digest stand-in, carrying the content hash its
    /// identity derives from
    Fallback { record: RawRecord, digest: String },
}

/// A record with a stable identity and display-ready fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Deterministic identity for novelty comparison
    pub identity_key: String,

    /// Record title
    pub title: String,

    /// Record date
    pub date: String,

    /// Record description
    pub description: String,

    /// Full URL to the record (empty when none was extracted)
    pub link: String,
}

impl NormalizedRecord {
    /// Format the record for display using a template.
    ///
    /// Supported placeholders: `{title}`, `{date}`, `{description}`, `{link}`
    pub fn format(&self, template: &str) -> String {
        template
            .replace("{title}", &self.title)
            .replace("{date}", &self.date)
            .replace("{description}", &self.description)
            .replace("{link}", &self.link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> NormalizedRecord {
        NormalizedRecord {
            identity_key: "abc123".to_string(),
            title: "Jazz Night".to_string(),
            date: "2026-08-01".to_string(),
            description: "An evening of live jazz".to_string(),
            link: "https://example.com/events/42".to_string(),
        }
    }

    #[test]
    fn test_format() {
        let record = sample_record();
        let result = record.format("{title} ({date})");
        assert_eq!(result, "Jazz Night (2026-08-01)");
    }
}
