// src/pipeline/digest.rs

//! Whole-page digest fallback.
//!
//! When selector extraction yields nothing, the page is reduced to a
//! hash of its visible text so "page changed at all" remains detectable
//! for unknown or redesigned page structures. Markup is stripped and
//! whitespace collapsed before hashing, so markup-only churn does not
//! register as a change.

use scraper::Html;
use sha2::{Digest, Sha256};

use crate::models::{Extraction, RawRecord};
use crate::utils::{normalize_whitespace, truncate_chars};

/// Sentinel title for whole-page digest records.
pub const SNAPSHOT_TITLE: &str = "page snapshot";

/// Longest description preview carried on a digest record, in characters.
const PREVIEW_CHARS: usize = 200;

/// Produce the single fallback record for a page.
///
/// The record's identity derives purely from the content hash; the
/// preview and link exist only for display.
pub fn digest_page(document: &Html, page_url: &str) -> Extraction {
    let text = visible_text(document);
    let digest = hex::encode(Sha256::digest(text.as_bytes()));

    let record = RawRecord {
        title: Some(SNAPSHOT_TITLE.to_string()),
        date: None,
        description: if text.is_empty() {
            None
        } else {
            Some(truncate_chars(&text, PREVIEW_CHARS))
        },
        link: Some(page_url.to_string()),
    };

    Extraction::Fallback { record, digest }
}

/// Collect the page's visible text: text nodes outside
/// script/style/noscript subtrees, whitespace-collapsed.
pub fn visible_text(document: &Html) -> String {
    let mut out = String::new();
    for node in document.root_element().descendants() {
        if let Some(text) = node.value().as_text() {
            let skipped = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| matches!(el.name(), "script" | "style" | "noscript"))
            });
            if !skipped {
                out.push_str(text);
                out.push(' ');
            }
        }
    }
    normalize_whitespace(&out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest_of(html: &str) -> String {
        let document = Html::parse_document(html);
        match digest_page(&document, "https://example.com") {
            Extraction::Fallback { digest, .. } => digest,
            Extraction::Structured(_) => unreachable!(),
        }
    }

    #[test]
    fn markup_churn_does_not_change_digest() {
        let a = digest_of("<div><p>Hello   world</p></div>");
        let b = digest_of("<section>\n  Hello world\n</section>");
        assert_eq!(a, b);
    }

    #[test]
    fn content_change_changes_digest() {
        let a = digest_of("<p>Hello world</p>");
        let b = digest_of("<p>Goodbye world</p>");
        assert_ne!(a, b);
    }

    #[test]
    fn scripts_and_styles_are_ignored() {
        let a = digest_of("<p>Hello</p>");
        let b = digest_of("<script>var t = Date.now();</script><p>Hello</p><style>p{}</style>");
        assert_eq!(a, b);
    }

    #[test]
    fn record_carries_sentinel_title_and_preview() {
        let document = Html::parse_document("<p>Concert listings for April</p>");
        let Extraction::Fallback { record, .. } = digest_page(&document, "https://example.com")
        else {
            panic!("expected fallback");
        };
        assert_eq!(record.title.as_deref(), Some(SNAPSHOT_TITLE));
        assert_eq!(
            record.description.as_deref(),
            Some("Concert listings for April")
        );
        assert_eq!(record.link.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn long_preview_is_truncated_on_char_boundary() {
        let body = "ä".repeat(300);
        let document = Html::parse_document(&format!("<p>{body}</p>"));
        let Extraction::Fallback { record, .. } = digest_page(&document, "https://example.com")
        else {
            panic!("expected fallback");
        };
        let preview = record.description.unwrap();
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 203);
    }

    #[test]
    fn empty_page_still_digests() {
        let document = Html::parse_document("");
        let Extraction::Fallback { record, digest } = digest_page(&document, "https://example.com")
        else {
            panic!("expected fallback");
        };
        assert!(!digest.is_empty());
        assert_eq!(record.description, None);
    }
}
