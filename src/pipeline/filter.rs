// src/pipeline/filter.rs

//! Keyword inclusion filter.

use crate::models::{KeywordMode, NormalizedRecord};

/// Decide whether a record passes the site's keyword rule.
///
/// With no keywords every record passes. Matching is a case-folded
/// substring search over the title and description. Records that fail
/// are dropped before the novelty diff, so they are never marked seen
/// and can still surface later if the keywords change.
pub fn passes_keywords(record: &NormalizedRecord, keywords: &[String], mode: KeywordMode) -> bool {
    if keywords.is_empty() {
        return true;
    }

    let haystack = format!("{} {}", record.title, record.description).to_lowercase();
    let mut matches = keywords.iter().map(|k| haystack.contains(&k.to_lowercase()));

    match mode {
        KeywordMode::Any => matches.any(|m| m),
        KeywordMode::All => matches.all(|m| m),
    }
}
