// src/pipeline/mod.rs

//! Page-processing pipeline stages.
//!
//! - `extract`: selector-based record extraction
//! - `digest`: whole-page hash fallback
//! - `normalize`: identity derivation and display form
//! - `filter`: keyword inclusion rules

pub mod digest;
pub mod extract;
pub mod filter;
pub mod normalize;

pub use digest::digest_page;
pub use extract::extract_records;
pub use filter::passes_keywords;
pub use normalize::normalize;
