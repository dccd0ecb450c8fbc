//! Crawler module for fetching and saving documents
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a single `Unavailable` failure value
//! - Document link discovery on the index page
//! - Request pacing
//! - Overall crawl coordination

mod coordinator;
mod discovery;
mod fetcher;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator};
pub use discovery::{DiscoveredLink, LinkDiscoverer};
pub use fetcher::{build_http_client, FetchResult, Fetcher};
pub use scheduler::RateLimiter;
