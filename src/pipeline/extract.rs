// src/pipeline/extract.rs

//! Selector-based record extraction.
//!
//! Applies a site's ordered selector lists to a parsed page. Selector
//! lists are first-match-wins: the container list is scanned until one
//! selector yields nodes, and each field list is scanned per container
//! until one selector yields usable content.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::models::{CleaningConfig, FieldSelectors, RawRecord};
use crate::utils::{normalize_whitespace, resolve_url};

/// Extract candidate records from a parsed page, in document order.
///
/// Returns an empty sequence when no container selector matches, which
/// signals the caller to fall back to the whole-page digest.
pub fn extract_records(
    document: &Html,
    selectors: &FieldSelectors,
    base_url: &Url,
    cleaning: &CleaningConfig,
) -> Vec<RawRecord> {
    let Some(containers) = first_container_match(document, &selectors.container) else {
        return Vec::new();
    };

    containers
        .iter()
        .filter_map(|container| parse_container(container, selectors, base_url, cleaning))
        .collect()
}

/// Scan the container selector list in order; the first selector yielding
/// at least one node wins and the remaining selectors are not tried.
fn first_container_match<'a>(
    document: &'a Html,
    selectors: &[String],
) -> Option<Vec<ElementRef<'a>>> {
    for raw in selectors {
        let Some(selector) = parse_selector(raw) else {
            continue;
        };
        let matches: Vec<ElementRef<'a>> = document.select(&selector).collect();
        if !matches.is_empty() {
            return Some(matches);
        }
    }
    None
}

/// Build one record from a container node.
///
/// Missing fields are represented as absence, never as an error. A
/// container yielding neither a title nor a link identifies nothing and
/// is dropped.
fn parse_container(
    container: &ElementRef<'_>,
    selectors: &FieldSelectors,
    base_url: &Url,
    cleaning: &CleaningConfig,
) -> Option<RawRecord> {
    let title_hit = first_text_element(container, &selectors.title);

    let title = title_hit
        .as_ref()
        .map(|(_, text)| cleaning.clean_title(text))
        .filter(|t| !t.is_empty());

    let date = first_text_element(container, &selectors.date)
        .map(|(_, text)| cleaning.clean_date(&text))
        .filter(|d| !d.is_empty());

    let description = first_text_element(container, &selectors.description).map(|(_, text)| text);

    // The title element doubles as the link carrier when no link selector
    // matches, the common anchor-as-title markup.
    let link = first_attr(container, &selectors.link, &selectors.link_attr)
        .or_else(|| {
            title_hit.as_ref().and_then(|(element, _)| {
                element
                    .value()
                    .attr(&selectors.link_attr)
                    .map(str::to_string)
            })
        })
        .map(|href| resolve_url(base_url, &href));

    if title.is_none() && link.is_none() {
        return None;
    }

    Some(RawRecord {
        title,
        date,
        description,
        link,
    })
}

/// First element whose collected text is non-empty, scanning the
/// selector list in order.
fn first_text_element<'a>(
    scope: &ElementRef<'a>,
    selectors: &[String],
) -> Option<(ElementRef<'a>, String)> {
    for raw in selectors {
        let Some(selector) = parse_selector(raw) else {
            continue;
        };
        for element in scope.select(&selector) {
            let text = normalize_whitespace(&element.text().collect::<String>());
            if !text.is_empty() {
                return Some((element, text));
            }
        }
    }
    None
}

/// First non-empty attribute value, scanning the selector list in order.
fn first_attr(scope: &ElementRef<'_>, selectors: &[String], attr: &str) -> Option<String> {
    for raw in selectors {
        let Some(selector) = parse_selector(raw) else {
            continue;
        };
        for element in scope.select(&selector) {
            if let Some(value) = element.value().attr(attr) {
                if !value.trim().is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

/// Parse a selector string, warning and skipping on failure so the
/// ordered scan continues with the next rule.
fn parse_selector(raw: &str) -> Option<Selector> {
    match Selector::parse(raw) {
        Ok(selector) => Some(selector),
        Err(e) => {
            log::warn!("Skipping invalid selector '{raw}': {e:?}");
            None
        }
    }
}
