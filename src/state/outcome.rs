use crate::state::{AttemptOutcome, TargetStatus};
use chrono::{DateTime, Utc};
use url::Url;

/// One candidate URL and what came of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub url: Url,
    pub outcome: AttemptOutcome,
}

/// Everything that happened to one document during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    pub identifier: String,
    pub display_name: String,
    pub status: TargetStatus,

    /// The candidate whose text was saved
    pub saved_from: Option<Url>,

    /// Attempts in the order they were made
    pub attempts: Vec<Attempt>,
}

impl TargetReport {
    /// Number of attempts whose save failed
    pub fn persistence_failures(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| matches!(a.outcome, AttemptOutcome::PersistenceFailed { .. }))
            .count()
    }
}

/// Aggregate result of a crawl run
///
/// Created when a run starts, updated once per document after all of that
/// document's attempts are done, and read at the end for the summary.
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Documents processed
    pub attempted: usize,

    /// Documents saved
    pub succeeded: usize,

    /// Saves that failed, across all documents
    pub persistence_failures: usize,

    /// Per-document reports, in processing order
    pub reports: Vec<TargetReport>,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Default for CrawlOutcome {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlOutcome {
    /// Creates an empty outcome stamped with the current time
    pub fn new() -> Self {
        Self {
            attempted: 0,
            succeeded: 0,
            persistence_failures: 0,
            reports: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Folds a finished document into the counters
    pub fn record(&mut self, report: TargetReport) {
        self.attempted += 1;
        if report.status.is_success() {
            self.succeeded += 1;
        }
        self.persistence_failures += report.persistence_failures();
        self.reports.push(report);
    }

    /// Marks the run as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Documents that were not saved
    pub fn failed(&self) -> impl Iterator<Item = &TargetReport> {
        self.reports.iter().filter(|r| !r.status.is_success())
    }

    /// Returns the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            return 0.0;
        }
        (self.succeeded as f64 / self.attempted as f64) * 100.0
    }

    /// Wall-clock duration of a finished run
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}
