// src/report.rs

//! Markdown rendering of run results.
//!
//! Failed checks get their own section: a broken site must never read
//! as "nothing new".

use chrono::Utc;

use crate::pipeline::normalize::NO_DESCRIPTION;
use crate::services::{RunReport, SiteStatus};
use crate::utils::truncate_chars;

/// Longest description carried into the report, in characters.
const DESCRIPTION_PREVIEW_CHARS: usize = 150;

/// Render a run's results as a markdown document.
pub fn render_markdown(report: &RunReport) -> String {
    let mut out = String::new();
    let checked_at = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

    if report.has_updates() {
        out.push_str("# Site event updates\n\n");
        out.push_str(&format!("Checked at: {checked_at}\n\n"));
        out.push_str(&format!(
            "Found updates on **{}** site(s)\n\n---\n\n",
            report.update_count()
        ));

        for site in report
            .sites
            .iter()
            .filter(|s| !s.new_records.is_empty())
        {
            out.push_str(&format!("## {}\n\n", site.site));
            for record in &site.new_records {
                out.push_str(&record.format("- **{title}** ({date})\n"));
                if record.description != NO_DESCRIPTION && !record.description.is_empty() {
                    out.push_str(&format!(
                        "  {}\n",
                        truncate_chars(&record.description, DESCRIPTION_PREVIEW_CHARS)
                    ));
                }
                if !record.link.is_empty() {
                    out.push_str(&format!("  [view]({})\n", record.link));
                }
            }
            out.push('\n');
        }
    } else {
        out.push_str("# No new events\n\n");
        out.push_str(&format!("Checked at: {checked_at}\n\n"));
        out.push_str("No monitored site reported new records.\n\n");
    }

    let warnings: Vec<_> = report
        .sites
        .iter()
        .filter(|s| s.status == SiteStatus::Success && s.error_reason.is_some())
        .collect();
    if !warnings.is_empty() {
        out.push_str("## Warnings\n\n");
        for site in warnings {
            out.push_str(&format!(
                "- {}: {}\n",
                site.site,
                site.error_reason.as_deref().unwrap_or("")
            ));
        }
        out.push('\n');
    }

    let failures: Vec<_> = report
        .sites
        .iter()
        .filter(|s| s.status == SiteStatus::Failed)
        .collect();
    if !failures.is_empty() {
        out.push_str("## Failed checks\n\n");
        for site in failures {
            out.push_str(&format!(
                "- {}: {}\n",
                site.site,
                site.error_reason.as_deref().unwrap_or("unknown error")
            ));
        }
        out.push('\n');
    }

    out
}
