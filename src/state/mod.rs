//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `DocumentTarget`: a logical document and its candidate URLs
//! - `TargetStatus` / `AttemptOutcome`: terminal status of a document and of each attempt
//! - `CrawlOutcome`: aggregate counters and per-document reports for a run

mod outcome;
mod target;
mod target_status;

pub use outcome::{Attempt, CrawlOutcome, TargetReport};
pub use target::DocumentTarget;
pub use target_status::{AttemptOutcome, TargetStatus};
