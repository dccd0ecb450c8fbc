//! Request pacing
//!
//! The crawler talks to a single remote source and keeps a fixed minimum gap
//! between the end of one request and the start of the next. The limiter is
//! an explicit value owned by the coordinator rather than process-wide state.

use std::time::{Duration, Instant};

/// Enforces a minimum pause after each request
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// Minimum time between the end of a request and the start of the next
    interval: Duration,

    /// When the last request finished
    last_completion: Option<Instant>,

    /// Requests let through so far
    request_count: u64,
}

impl RateLimiter {
    /// Creates a limiter; the first request is never delayed
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_completion: None,
            request_count: 0,
        }
    }

    /// Creates a limiter from a millisecond delay
    pub fn from_millis(delay_ms: u64) -> Self {
        Self::new(Duration::from_millis(delay_ms))
    }

    /// How long a request starting at `now` would have to wait
    pub fn wait_time(&self, now: Instant) -> Duration {
        match self.last_completion {
            Some(last) => self.interval.saturating_sub(now.duration_since(last)),
            None => Duration::ZERO,
        }
    }

    /// Waits until the next request may start
    ///
    /// The caller reports the end of the request with `record_completion`.
    pub async fn acquire(&mut self) {
        let wait = self.wait_time(Instant::now());
        if !wait.is_zero() {
            tracing::debug!("Rate limiter: waiting {:?} before next request", wait);
            tokio::time::sleep(wait).await;
        }
        self.request_count += 1;
    }

    /// Records that a request finished at `at`, successful or not
    pub fn record_completion(&mut self, at: Instant) {
        self.last_completion = Some(at);
    }

    /// Number of requests let through
    pub fn request_count(&self) -> u64 {
        self.request_count
    }
}
