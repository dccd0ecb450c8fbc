//! Markdown run report
//!
//! This module writes a human-readable report of a crawl run: counters,
//! where each saved document came from, and why the others failed.

use crate::output::traits::OutputResult;
use crate::state::CrawlOutcome;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown report of a crawl run
///
/// # Arguments
///
/// * `outcome` - The finished crawl outcome
/// * `config_hash` - Fingerprint of the configuration used for the run
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_report(
    outcome: &CrawlOutcome,
    config_hash: &str,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_report(outcome, config_hash);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl outcome as markdown
pub fn format_markdown_report(outcome: &CrawlOutcome, config_hash: &str) -> String {
    let mut md = String::new();

    md.push_str("# Folio Run Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", outcome.started_at.to_rfc3339()));
    if let Some(finished) = &outcome.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = outcome.duration_seconds() {
        md.push_str(&format!("- **Duration**: {} seconds\n", duration));
    }
    md.push_str(&format!("- **Config Hash**: {}\n\n", config_hash));

    // Counters
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Documents Attempted**: {}\n", outcome.attempted));
    md.push_str(&format!("- **Documents Saved**: {}\n", outcome.succeeded));
    md.push_str(&format!(
        "- **Failed Saves**: {}\n",
        outcome.persistence_failures
    ));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        outcome.success_rate()
    ));

    // Per-document table
    if !outcome.reports.is_empty() {
        md.push_str("## Documents\n\n");
        md.push_str("| Identifier | Name | Status | Source | Attempts |\n");
        md.push_str("|------------|------|--------|--------|----------|\n");
        for report in &outcome.reports {
            let source = report
                .saved_from
                .as_ref()
                .map(|u| u.to_string())
                .unwrap_or_else(|| "-".to_string());
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                report.identifier,
                escape_cell(&report.display_name),
                report.status,
                source,
                report.attempts.len()
            ));
        }
        md.push('\n');
    }

    // Failure details
    let failed: Vec<_> = outcome.failed().collect();
    if !failed.is_empty() {
        md.push_str("## Failures\n\n");
        for report in failed {
            md.push_str(&format!("### {}\n\n", report.display_name));
            for attempt in &report.attempts {
                md.push_str(&format!("- `{}`: {}\n", attempt.url, attempt.outcome));
            }
            md.push('\n');
        }
    }

    md
}

/// Keeps table cells on one row
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
