// src/models/selectors.rs

//! CSS selector rules for extracting event records from a page.

use serde::{Deserialize, Serialize};

/// Ordered CSS selector lists for one site.
///
/// Each list is scanned in order and the first selector that produces a
/// usable match wins; later entries are not tried. This keeps the rule
/// chain extensible: append a coarser selector to the end of a list to
/// cover a site redesign without touching the preferred rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSelectors {
    /// Selectors for the node holding one candidate record
    pub container: Vec<String>,

    /// Selectors for the title element within a container
    #[serde(default)]
    pub title: Vec<String>,

    /// Selectors for the date element within a container
    #[serde(default)]
    pub date: Vec<String>,

    /// Selectors for the description element within a container
    #[serde(default)]
    pub description: Vec<String>,

    /// Selectors for the link element (the title element is tried when
    /// none of these match)
    #[serde(default)]
    pub link: Vec<String>,

    /// HTML attribute name for extracting links (usually "href")
    #[serde(default = "default_link_attr")]
    pub link_attr: String,
}

fn default_link_attr() -> String {
    "href".to_string()
}

impl Default for FieldSelectors {
    fn default() -> Self {
        Self::generic()
    }
}

impl FieldSelectors {
    /// Generic selectors that work with common event-listing markup.
    pub fn generic() -> Self {
        Self {
            container: vec!["article".to_string(), "li:has(a)".to_string()],
            title: vec![
                "h1".to_string(),
                "h2".to_string(),
                "h3".to_string(),
                "a".to_string(),
            ],
            date: vec!["time".to_string(), ".date".to_string()],
            description: vec!["p".to_string()],
            link: vec!["a".to_string()],
            link_attr: default_link_attr(),
        }
    }
}
