// src/services/monitor.rs

//! Site monitoring service.
//!
//! Drives the per-site pipeline: fetch → extract (falling back to the
//! whole-page digest) → normalize → filter → diff against the novelty
//! store → persist → emit the new-record delta. A failure in one site
//! never aborts the others.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::Client;
use scraper::Html;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{CleaningConfig, Config, Extraction, NormalizedRecord, SiteConfig};
use crate::pipeline::{digest_page, extract_records, normalize, passes_keywords};
use crate::store::{self, NoveltyStore};
use crate::utils::http;

/// Terminal outcome of one site's check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteStatus {
    /// The pipeline ran to completion
    Success,

    /// The site is disabled
    Skipped,

    /// The check failed; `error_reason` says why
    Failed,
}

/// Result of checking one site.
#[derive(Debug, Clone, Serialize)]
pub struct SiteReport {
    /// Site name from the configuration
    pub site: String,

    /// Terminal status
    pub status: SiteStatus,

    /// Records not seen in any previous run
    pub new_records: Vec<NormalizedRecord>,

    /// Failure reason, or a warning on an otherwise successful check
    pub error_reason: Option<String>,
}

impl SiteReport {
    fn skipped(site: &SiteConfig) -> Self {
        Self {
            site: site.name.clone(),
            status: SiteStatus::Skipped,
            new_records: Vec::new(),
            error_reason: None,
        }
    }

    fn failed(site: &SiteConfig, reason: String) -> Self {
        Self {
            site: site.name.clone(),
            status: SiteStatus::Failed,
            new_records: Vec::new(),
            error_reason: Some(reason),
        }
    }
}

/// Results for a whole run, in configuration order.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub sites: Vec<SiteReport>,
}

impl RunReport {
    /// Look up one site's report by name.
    pub fn get(&self, site_name: &str) -> Option<&SiteReport> {
        self.sites.iter().find(|r| r.site == site_name)
    }

    /// Number of sites that produced new records.
    pub fn update_count(&self) -> usize {
        self.sites
            .iter()
            .filter(|r| !r.new_records.is_empty())
            .count()
    }

    /// Number of sites that failed their check.
    pub fn failure_count(&self) -> usize {
        self.sites
            .iter()
            .filter(|r| r.status == SiteStatus::Failed)
            .count()
    }

    /// Whether any site produced new records.
    pub fn has_updates(&self) -> bool {
        self.update_count() > 0
    }
}

/// Service for checking all configured sites.
pub struct SiteMonitor {
    config: Arc<Config>,
    client: Client,
    store: Arc<dyn NoveltyStore>,
}

impl SiteMonitor {
    /// Create a new monitor with the given configuration and store.
    pub fn new(config: Arc<Config>, store: Arc<dyn NoveltyStore>) -> Result<Self> {
        let client = http::create_client(&config.monitor)?;
        Ok(Self {
            config,
            client,
            store,
        })
    }

    /// Check every configured site with bounded concurrency.
    ///
    /// Reports come back in configuration order. Each site's pipeline
    /// stages run as a strict sequence; only distinct sites overlap.
    pub async fn run(&self) -> RunReport {
        let concurrency = self.config.monitor.max_concurrent.max(1);
        let delay = Duration::from_millis(self.config.monitor.request_delay_ms);

        let mut checks = stream::iter(&self.config.sites)
            .map(|site| self.check_site(site))
            .buffered(concurrency);

        let mut report = RunReport::default();
        while let Some(site_report) = checks.next().await {
            match site_report.status {
                SiteStatus::Success => log::info!(
                    "{}: {} new record(s)",
                    site_report.site,
                    site_report.new_records.len()
                ),
                SiteStatus::Skipped => log::debug!("{}: disabled, skipped", site_report.site),
                SiteStatus::Failed => log::warn!(
                    "{}: check failed: {}",
                    site_report.site,
                    site_report.error_reason.as_deref().unwrap_or("unknown")
                ),
            }
            report.sites.push(site_report);

            if delay.as_millis() > 0 {
                tokio::time::sleep(delay).await;
            }
        }
        report
    }

    /// Check a single site, converting any pipeline error into a Failed
    /// status so the remaining sites keep running.
    pub async fn check_site(&self, site: &SiteConfig) -> SiteReport {
        if !site.enabled {
            return SiteReport::skipped(site);
        }

        match self.fetch_and_process(site).await {
            Ok((new_records, warning)) => SiteReport {
                site: site.name.clone(),
                status: SiteStatus::Success,
                new_records,
                error_reason: warning,
            },
            Err(e) => SiteReport::failed(site, e.to_string()),
        }
    }

    async fn fetch_and_process(
        &self,
        site: &SiteConfig,
    ) -> Result<(Vec<NormalizedRecord>, Option<String>)> {
        let html = http::fetch_page(&self.client, &site.url)
            .await
            .map_err(|e| AppError::fetch(&site.name, e))?;
        self.process_page(site, &html).await
    }

    /// Run the post-fetch stages for one page.
    ///
    /// A persist failure does not discard the delta: the new records are
    /// still returned, with the failure surfaced as a warning.
    async fn process_page(
        &self,
        site: &SiteConfig,
        html: &str,
    ) -> Result<(Vec<NormalizedRecord>, Option<String>)> {
        let candidates = scan_page(site, &self.config.cleaning, html)?;

        // Diffing against a falsely empty state would re-report every
        // record, so a load failure fails the site instead.
        let state = self
            .store
            .load(&site.name)
            .await
            .map_err(|e| AppError::persistence(&site.name, format!("state load failed: {e}")))?;

        let (fresh, updated) =
            store::diff(&state, &candidates, self.config.state.max_keys_per_site);

        let warning = match self.store.persist(&site.name, &updated).await {
            Ok(()) => None,
            Err(e) => {
                log::error!("State persist failed for {}: {e}", site.name);
                Some(format!("state persist failed: {e}"))
            }
        };

        Ok((fresh, warning))
    }
}

/// Extract, normalize and keyword-filter the candidates from one page.
///
/// Pure with respect to storage: the same page and site rules always
/// produce the same candidate set.
pub fn scan_page(
    site: &SiteConfig,
    cleaning: &CleaningConfig,
    html: &str,
) -> Result<Vec<NormalizedRecord>> {
    let document = Html::parse_document(html);
    let base_url =
        url::Url::parse(&site.url).map_err(|e| AppError::extraction(&site.name, e))?;

    let records = extract_records(&document, &site.selectors, &base_url, cleaning);
    let extraction = if records.is_empty() {
        log::debug!("{}: no containers matched, using page digest", site.name);
        digest_page(&document, &site.url)
    } else {
        Extraction::Structured(records)
    };

    let candidates = normalize(&extraction)
        .into_iter()
        .filter(|record| passes_keywords(record, &site.keywords, site.keyword_mode))
        .collect();
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldSelectors, KeywordMode};
    use crate::pipeline::digest::SNAPSHOT_TITLE;
    use crate::store::{LocalStore, SeenState};
    use async_trait::async_trait;
    use tempfile::TempDir;

    const PAGE_RUN1: &str = r#"
        <div class="event"><h3><a href="/e/1">T1</a></h3></div>
        <div class="event"><h3><a href="/e/2">T2</a></h3></div>
        <div class="event"><h3><a href="/e/3">T3</a></h3></div>"#;

    const PAGE_RUN2: &str = r#"
        <div class="event"><h3><a href="/e/1">T1</a></h3></div>
        <div class="event"><h3><a href="/e/2">T2</a></h3></div>
        <div class="event"><h3><a href="/e/4">T4</a></h3></div>"#;

    fn site(name: &str) -> SiteConfig {
        SiteConfig {
            name: name.to_string(),
            url: "https://example.com/events".to_string(),
            enabled: true,
            selectors: FieldSelectors {
                container: vec![".event".to_string()],
                title: vec!["a".to_string()],
                date: vec![],
                description: vec![],
                link: vec!["a".to_string()],
                link_attr: "href".to_string(),
            },
            keywords: Vec::new(),
            keyword_mode: KeywordMode::Any,
        }
    }

    fn config_with(sites: Vec<SiteConfig>) -> Arc<Config> {
        Arc::new(Config {
            sites,
            ..Config::default()
        })
    }

    fn monitor(sites: Vec<SiteConfig>, store: Arc<dyn NoveltyStore>) -> SiteMonitor {
        SiteMonitor::new(config_with(sites), store).unwrap()
    }

    #[test]
    fn scan_page_extracts_and_normalizes() {
        let candidates = scan_page(&site("a"), &CleaningConfig::default(), PAGE_RUN1).unwrap();
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].title, "T1");
        assert_eq!(candidates[0].link, "https://example.com/e/1");
    }

    #[test]
    fn unmatched_page_yields_exactly_one_digest_record() {
        let candidates = scan_page(
            &site("a"),
            &CleaningConfig::default(),
            "<p>totally different markup</p>",
        )
        .unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, SNAPSHOT_TITLE);
    }

    #[tokio::test]
    async fn second_identical_run_reports_nothing() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(LocalStore::new(tmp.path()));
        let m = monitor(vec![site("a")], store);

        let (fresh, _) = m.process_page(&site("a"), PAGE_RUN1).await.unwrap();
        assert_eq!(fresh.len(), 3);

        let (fresh, _) = m.process_page(&site("a"), PAGE_RUN1).await.unwrap();
        assert!(fresh.is_empty());
    }

    #[tokio::test]
    async fn only_unseen_records_are_reported_across_runs() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(LocalStore::new(tmp.path()));
        let m = monitor(vec![site("a")], store);

        let (fresh, _) = m.process_page(&site("a"), PAGE_RUN1).await.unwrap();
        assert_eq!(fresh.len(), 3);

        let (fresh, _) = m.process_page(&site("a"), PAGE_RUN2).await.unwrap();
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].title, "T4");
    }

    #[tokio::test]
    async fn filtered_records_are_not_marked_seen() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(LocalStore::new(tmp.path()));

        let mut filtered = site("a");
        filtered.keywords = vec!["bake sale".to_string()];
        let m = monitor(vec![filtered.clone()], store);

        // Run 1: the keyword drops every record before the diff.
        let (fresh, _) = m.process_page(&filtered, PAGE_RUN1).await.unwrap();
        assert!(fresh.is_empty());

        // Run 2 without keywords: the records were never marked seen,
        // so they surface now.
        let (fresh, _) = m.process_page(&site("a"), PAGE_RUN1).await.unwrap();
        assert_eq!(fresh.len(), 3);
    }

    #[tokio::test]
    async fn disabled_site_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(LocalStore::new(tmp.path()));
        let mut disabled = site("a");
        disabled.enabled = false;
        let m = monitor(vec![disabled.clone()], store);

        let report = m.check_site(&disabled).await;
        assert_eq!(report.status, SiteStatus::Skipped);
        assert!(report.new_records.is_empty());
    }

    /// Store that rejects persists for one site but serves the rest.
    struct FlakyStore {
        inner: LocalStore,
        fail_site: String,
    }

    #[async_trait]
    impl NoveltyStore for FlakyStore {
        async fn load(&self, site_name: &str) -> crate::error::Result<SeenState> {
            self.inner.load(site_name).await
        }

        async fn persist(
            &self,
            site_name: &str,
            state: &SeenState,
        ) -> crate::error::Result<()> {
            if site_name == self.fail_site {
                return Err(AppError::persistence(site_name, "disk full"));
            }
            self.inner.persist(site_name, state).await
        }
    }

    #[tokio::test]
    async fn persist_failure_keeps_delta_and_other_sites() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(FlakyStore {
            inner: LocalStore::new(tmp.path()),
            fail_site: "site-a".to_string(),
        });
        let m = monitor(vec![site("site-a"), site("site-b")], store.clone());

        // Site A: persist fails, but the delta is still returned and the
        // failure is surfaced.
        let (fresh, warning) = m.process_page(&site("site-a"), PAGE_RUN1).await.unwrap();
        assert_eq!(fresh.len(), 3);
        assert!(warning.unwrap().contains("persist failed"));

        // Site B is unaffected and persists normally.
        let (fresh, warning) = m.process_page(&site("site-b"), PAGE_RUN1).await.unwrap();
        assert_eq!(fresh.len(), 3);
        assert!(warning.is_none());
        assert_eq!(store.load("site-b").await.unwrap().keys.len(), 3);
    }
}
