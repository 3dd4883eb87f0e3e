// src/pipeline/normalize.rs

//! Record normalization and identity derivation.

use sha2::{Digest, Sha256};

use crate::models::{Extraction, NormalizedRecord, RawRecord};

/// Placeholder shown for a missing title.
pub const NO_TITLE: &str = "(untitled)";

/// Placeholder shown for a missing date.
pub const NO_DATE: &str = "(no date)";

/// Placeholder shown for a missing description.
pub const NO_DESCRIPTION: &str = "(no description)";

/// Normalize every record of an extraction outcome.
pub fn normalize(extraction: &Extraction) -> Vec<NormalizedRecord> {
    match extraction {
        Extraction::Structured(records) => records.iter().map(normalize_structured).collect(),
        Extraction::Fallback { record, digest } => {
            vec![normalized_with_key(record, digest.clone())]
        }
    }
}

/// Derive a structured record's identity and display form.
///
/// The link is the primary disambiguator: two records sharing a link are
/// the same event even if the title text varies. Without a link the
/// identity falls back to the title/date pair.
pub fn normalize_structured(record: &RawRecord) -> NormalizedRecord {
    let key = match record.link.as_deref() {
        Some(link) if !link.is_empty() => identity_hash(&["link", link]),
        _ => identity_hash(&[
            "text",
            record.title.as_deref().unwrap_or(""),
            record.date.as_deref().unwrap_or(""),
        ]),
    };
    normalized_with_key(record, key)
}

fn normalized_with_key(record: &RawRecord, identity_key: String) -> NormalizedRecord {
    NormalizedRecord {
        identity_key,
        title: record.title.clone().unwrap_or_else(|| NO_TITLE.to_string()),
        date: record.date.clone().unwrap_or_else(|| NO_DATE.to_string()),
        description: record
            .description
            .clone()
            .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        link: record.link.clone().unwrap_or_default(),
    }
}

/// Hash a field tuple into a stable hex identity.
///
/// Fields are NUL-delimited so distinct tuples cannot collide by
/// concatenation.
fn identity_hash(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}
