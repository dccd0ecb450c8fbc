//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties the other parts together:
//! - Resolving the work list from the index page or the configured targets
//! - Pacing every request through the rate limiter
//! - Trying each document's candidate URLs in order until one is saved
//! - Recording what happened to each document in the crawl outcome

use crate::config::Config;
use crate::crawler::discovery::{DiscoveredLink, LinkDiscoverer};
use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::crawler::scheduler::RateLimiter;
use crate::extract::Extractor;
use crate::output::{open_sink, DocumentSink};
use crate::state::{
    Attempt, AttemptOutcome, CrawlOutcome, DocumentTarget, TargetReport, TargetStatus,
};
use crate::FolioError;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    fetcher: Fetcher,
    extractor: Extractor,
    discoverer: LinkDiscoverer,
    sink: Box<dyn DocumentSink>,
    limiter: RateLimiter,
    min_accept_length: usize,
}

impl Coordinator {
    /// Creates a coordinator from the configuration and an output sink
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to resolve targets and run
    /// * `Err(FolioError)` - The HTTP client or a link pattern could not be built
    pub fn new(config: &Config, sink: Box<dyn DocumentSink>) -> Result<Self, FolioError> {
        let fetcher = Fetcher::new(
            &config.user_agent,
            Duration::from_secs(config.crawler.timeout_secs),
        )?;

        Ok(Self::with_parts(
            fetcher,
            Extractor::new(&config.extraction),
            LinkDiscoverer::from_config(&config.discovery)?,
            sink,
            RateLimiter::from_millis(config.crawler.delay_ms),
            config.crawler.min_accept_length,
        ))
    }

    /// Assembles a coordinator from already built parts
    pub fn with_parts(
        fetcher: Fetcher,
        extractor: Extractor,
        discoverer: LinkDiscoverer,
        sink: Box<dyn DocumentSink>,
        limiter: RateLimiter,
        min_accept_length: usize,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            discoverer,
            sink,
            limiter,
            min_accept_length,
        }
    }

    /// Number of requests made so far, index page included
    pub fn requests_made(&self) -> u64 {
        self.limiter.request_count()
    }

    /// Builds the work list for a run
    ///
    /// With discovery enabled the index page is fetched and its links become
    /// single-candidate targets. When discovery is off or finds nothing, the
    /// configured targets are used. Identifiers are made unique.
    pub async fn resolve_targets(
        &mut self,
        config: &Config,
    ) -> Result<Vec<DocumentTarget>, FolioError> {
        let fixed = config
            .targets
            .iter()
            .map(DocumentTarget::from_entry)
            .collect::<Result<Vec<_>, _>>()?;

        let mut targets = Vec::new();
        if config.crawler.discover {
            let base_url = Url::parse(&config.crawler.base_url)?;
            targets = self
                .discover_links(&base_url)
                .await
                .iter()
                .map(DocumentTarget::from_link)
                .collect();

            if targets.is_empty() {
                tracing::warn!(
                    "No document links found on {}, using {} configured targets",
                    base_url,
                    fixed.len()
                );
            }
        }

        if targets.is_empty() {
            targets = fixed;
        }

        if targets.is_empty() {
            return Err(FolioError::NoTargets(format!(
                "nothing discovered on {} and no [[target]] entries configured",
                config.crawler.base_url
            )));
        }

        Ok(make_identifiers_unique(targets))
    }

    /// Fetches the index page and lists the document links on it
    ///
    /// An unreachable index page yields an empty list; the caller decides
    /// what to fall back to.
    pub async fn discover_links(&mut self, index_url: &Url) -> Vec<DiscoveredLink> {
        tracing::info!("Fetching index page {}", index_url);
        self.limiter.acquire().await;
        let fetched = self.fetcher.fetch(index_url).await;
        self.limiter.record_completion(Instant::now());

        match fetched {
            FetchResult::Success { body, .. } => {
                let links = self.discoverer.discover(&body, index_url);
                tracing::info!("Discovered {} document links", links.len());
                links
            }
            FetchResult::Unavailable { cause } => {
                tracing::warn!("Index page {} unavailable: {}", index_url, cause);
                Vec::new()
            }
        }
    }

    /// Processes every target in order
    ///
    /// A document that cannot be saved from any candidate is recorded as
    /// failed and the run moves on; only an empty work list is an error.
    pub async fn run(&mut self, targets: &[DocumentTarget]) -> Result<CrawlOutcome, FolioError> {
        if targets.is_empty() {
            return Err(FolioError::NoTargets("empty work list".to_string()));
        }

        tracing::info!(
            "Starting crawl of {} documents into {}",
            targets.len(),
            self.sink.location()
        );

        let mut outcome = CrawlOutcome::new();
        for (index, target) in targets.iter().enumerate() {
            tracing::info!(
                "[{}/{}] {}",
                index + 1,
                targets.len(),
                target.display_name()
            );
            let report = self.process_target(target).await;
            outcome.record(report);
        }
        outcome.finish();

        tracing::info!(
            "Crawl completed: {}/{} documents saved",
            outcome.succeeded,
            outcome.attempted
        );

        Ok(outcome)
    }

    /// Tries a target's candidates until one is fetched, long enough and saved
    async fn process_target(&mut self, target: &DocumentTarget) -> TargetReport {
        let mut attempts = Vec::new();

        for url in target.candidate_urls() {
            self.limiter.acquire().await;
            let outcome = self.attempt(target, url).await;
            self.limiter.record_completion(Instant::now());
            let accepted = outcome.is_accepted();
            attempts.push(Attempt {
                url: url.clone(),
                outcome,
            });

            if accepted {
                return TargetReport {
                    identifier: target.identifier().to_string(),
                    display_name: target.display_name().to_string(),
                    status: TargetStatus::Saved,
                    saved_from: Some(url.clone()),
                    attempts,
                };
            }
        }

        tracing::warn!(
            "Could not save {} from any of {} candidates",
            target.display_name(),
            target.candidate_urls().len()
        );

        TargetReport {
            identifier: target.identifier().to_string(),
            display_name: target.display_name().to_string(),
            status: TargetStatus::AllCandidatesFailed,
            saved_from: None,
            attempts,
        }
    }

    /// Fetches, extracts and saves a single candidate
    async fn attempt(&self, target: &DocumentTarget, url: &Url) -> AttemptOutcome {
        let body = match self.fetcher.fetch(url).await {
            FetchResult::Success { body, .. } => body,
            FetchResult::Unavailable { cause } => {
                tracing::warn!("{} unavailable: {}", url, cause);
                return AttemptOutcome::Unavailable { cause };
            }
        };

        let text = self.extractor.extract(&body);
        if text.length < self.min_accept_length {
            tracing::warn!(
                "Text from {} too short ({} chars, need {})",
                url,
                text.length,
                self.min_accept_length
            );
            return AttemptOutcome::TooShort {
                length: text.length,
                minimum: self.min_accept_length,
            };
        }

        match self.sink.save(target.identifier(), &text.body) {
            Ok(()) => {
                tracing::info!(
                    "Saved {} from {} ({} chars)",
                    target.identifier(),
                    url,
                    text.length
                );
                AttemptOutcome::Accepted {
                    length: text.length,
                }
            }
            Err(e) => {
                tracing::warn!("Failed to save {}: {}", target.identifier(), e);
                AttemptOutcome::PersistenceFailed {
                    cause: e.to_string(),
                }
            }
        }
    }
}

/// Appends `_2`, `_3`, ... to identifiers already used by an earlier target
fn make_identifiers_unique(targets: Vec<DocumentTarget>) -> Vec<DocumentTarget> {
    let mut used = HashSet::new();

    targets
        .into_iter()
        .map(|target| {
            if used.insert(target.identifier().to_string()) {
                return target;
            }

            let mut n = 2;
            let unique = loop {
                let candidate = format!("{}_{}", target.identifier(), n);
                if !used.contains(&candidate) {
                    break candidate;
                }
                n += 1;
            };
            tracing::debug!("Renaming duplicate {} to {}", target.identifier(), unique);
            used.insert(unique.clone());
            target.with_identifier(unique)
        })
        .collect()
}

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the configured output sink
/// 2. Build the HTTP client
/// 3. Resolve the work list from the index page or the configured targets
/// 4. Fetch, extract and save every document
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - What happened to every document
/// * `Err(FolioError)` - The run could not start
pub async fn run_crawl(config: Config) -> Result<CrawlOutcome, FolioError> {
    let sink = open_sink(&config.output)?;
    let mut coordinator = Coordinator::new(&config, sink)?;

    let targets = coordinator.resolve_targets(&config).await?;
    coordinator.run(&targets).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::output::{OutputError, OutputResult};
    use std::sync::{Arc, Mutex};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    type Saved = Arc<Mutex<Vec<(String, String)>>>;

    /// Records saves in memory; optionally fails every save
    struct RecordingSink {
        saved: Saved,
        fail: bool,
    }

    impl DocumentSink for RecordingSink {
        fn save(&self, identifier: &str, body: &str) -> OutputResult<()> {
            if self.fail {
                return Err(OutputError::Write("disk full".to_string()));
            }
            self.saved
                .lock()
                .unwrap()
                .push((identifier.to_string(), body.to_string()));
            Ok(())
        }

        fn location(&self) -> String {
            "memory".to_string()
        }
    }

    fn coordinator(fail: bool) -> (Coordinator, Saved) {
        coordinator_with_delay(fail, 0)
    }

    fn coordinator_with_delay(fail: bool, delay_ms: u64) -> (Coordinator, Saved) {
        let saved: Saved = Arc::new(Mutex::new(Vec::new()));
        let sink = RecordingSink {
            saved: Arc::clone(&saved),
            fail,
        };
        let fetcher =
            Fetcher::new(&Default::default(), Duration::from_secs(5)).unwrap();
        let coordinator = Coordinator::with_parts(
            fetcher,
            Extractor::default(),
            LinkDiscoverer::default(),
            Box::new(sink),
            RateLimiter::from_millis(delay_ms),
            1000,
        );
        (coordinator, saved)
    }

    async fn serve(server: &MockServer, p: &str, status: u16, body: String) {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    fn target(server: &MockServer, id: &str, paths: &[&str]) -> DocumentTarget {
        let urls = paths
            .iter()
            .map(|p| Url::parse(&format!("{}{}", server.uri(), p)).unwrap())
            .collect();
        DocumentTarget::new(id, id, urls).unwrap()
    }

    fn config_for(server: &MockServer, discover: bool, targets: &str) -> Config {
        parse_config(&format!(
            r#"
[crawler]
base-url = "{}/"
delay-ms = 0
discover = {}

[output]
directory = "works"

{}
"#,
            server.uri(),
            discover,
            targets
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_falls_back_to_next_candidate() {
        let server = MockServer::start().await;
        serve(&server, "/a", 404, String::new()).await;
        serve(&server, "/b", 200, "y".repeat(1500)).await;

        let (mut coordinator, saved) = coordinator(false);
        let outcome = coordinator
            .run(&[target(&server, "hamlet", &["/a", "/b"])])
            .await
            .unwrap();

        let saved = saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, "hamlet");
        assert_eq!(saved[0].1.len(), 1500);

        let report = &outcome.reports[0];
        assert_eq!(report.status, TargetStatus::Saved);
        assert_eq!(report.attempts.len(), 2);
        assert!(report.saved_from.as_ref().unwrap().as_str().ends_with("/b"));
        assert_eq!(outcome.attempted, 1);
        assert_eq!(outcome.succeeded, 1);
    }

    #[tokio::test]
    async fn test_all_candidates_unavailable() {
        let server = MockServer::start().await;
        serve(&server, "/a", 500, String::new()).await;
        serve(&server, "/b", 404, String::new()).await;

        let (mut coordinator, saved) = coordinator(false);
        let outcome = coordinator
            .run(&[target(&server, "lear", &["/a", "/b"])])
            .await
            .unwrap();

        assert!(saved.lock().unwrap().is_empty());
        assert_eq!(outcome.reports[0].status, TargetStatus::AllCandidatesFailed);
        assert_eq!(outcome.attempted, 1);
        assert_eq!(outcome.succeeded, 0);
    }

    #[tokio::test]
    async fn test_acceptance_threshold_is_inclusive() {
        let server = MockServer::start().await;
        serve(&server, "/short", 200, "x".repeat(999)).await;
        serve(&server, "/exact", 200, "x".repeat(1000)).await;

        let (mut coordinator, saved) = coordinator(false);
        let outcome = coordinator
            .run(&[target(&server, "tempest", &["/short", "/exact"])])
            .await
            .unwrap();

        let report = &outcome.reports[0];
        assert_eq!(
            report.attempts[0].outcome,
            AttemptOutcome::TooShort {
                length: 999,
                minimum: 1000
            }
        );
        assert_eq!(
            report.attempts[1].outcome,
            AttemptOutcome::Accepted { length: 1000 }
        );
        assert_eq!(saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_persistence_failure_does_not_abort_run() {
        let server = MockServer::start().await;
        serve(&server, "/one", 200, "z".repeat(1200)).await;
        serve(&server, "/two", 200, "z".repeat(1200)).await;

        let (mut coordinator, _saved) = coordinator(true);
        let outcome = coordinator
            .run(&[
                target(&server, "one", &["/one"]),
                target(&server, "two", &["/two"]),
            ])
            .await
            .unwrap();

        assert_eq!(outcome.attempted, 2);
        assert_eq!(outcome.succeeded, 0);
        assert_eq!(outcome.persistence_failures, 2);
        assert!(matches!(
            outcome.reports[1].attempts[0].outcome,
            AttemptOutcome::PersistenceFailed { .. }
        ));
    }

    #[tokio::test]
    async fn test_delay_follows_slow_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(404).set_delay(Duration::from_millis(400)))
            .mount(&server)
            .await;
        serve(&server, "/fast", 404, String::new()).await;

        let (mut coordinator, _saved) = coordinator_with_delay(false, 300);
        let start = std::time::Instant::now();
        let outcome = coordinator
            .run(&[target(&server, "othello", &["/slow", "/fast"])])
            .await
            .unwrap();

        // 400ms for the slow response, then the full 300ms pause
        assert!(start.elapsed() >= Duration::from_millis(700));
        assert_eq!(outcome.reports[0].attempts.len(), 2);
        assert_eq!(coordinator.requests_made(), 2);
    }

    #[tokio::test]
    async fn test_empty_work_list_is_error() {
        let (mut coordinator, _saved) = coordinator(false);
        assert!(matches!(
            coordinator.run(&[]).await,
            Err(FolioError::NoTargets(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_targets_from_index() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/",
            200,
            r#"<a href="hamlet/full.html">Hamlet</a><a href="lear/index.html">Lear</a>"#
                .to_string(),
        )
        .await;

        let config = config_for(&server, true, "");
        let (mut coordinator, _saved) = coordinator(false);
        let targets = coordinator.resolve_targets(&config).await.unwrap();

        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].identifier(), "Hamlet");
        assert_eq!(coordinator.requests_made(), 1);
    }

    #[tokio::test]
    async fn test_resolve_targets_falls_back_to_configured() {
        let server = MockServer::start().await;
        serve(&server, "/", 503, String::new()).await;

        let config = config_for(
            &server,
            true,
            r#"
[[target]]
name = "Macbeth"
urls = ["https://example.com/macbeth/full.html"]
"#,
        );
        let (mut coordinator, _saved) = coordinator(false);
        let targets = coordinator.resolve_targets(&config).await.unwrap();

        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].identifier(), "Macbeth");
    }

    #[tokio::test]
    async fn test_resolve_targets_nothing_found() {
        let server = MockServer::start().await;
        serve(&server, "/", 200, "<p>no links</p>".to_string()).await;

        let config = config_for(&server, true, "");
        let (mut coordinator, _saved) = coordinator(false);
        assert!(matches!(
            coordinator.resolve_targets(&config).await,
            Err(FolioError::NoTargets(_))
        ));
    }

    #[test]
    fn test_duplicate_identifiers_are_renamed() {
        let url = Url::parse("https://example.com/").unwrap();
        let targets = vec![
            DocumentTarget::new("poems", "Poems", vec![url.clone()]).unwrap(),
            DocumentTarget::new("poems", "Poems", vec![url.clone()]).unwrap(),
            DocumentTarget::new("poems_2", "Poems 2", vec![url.clone()]).unwrap(),
            DocumentTarget::new("poems", "Poems", vec![url]).unwrap(),
        ];

        let ids: Vec<String> = make_identifiers_unique(targets)
            .iter()
            .map(|t| t.identifier().to_string())
            .collect();
        assert_eq!(ids, vec!["poems", "poems_2", "poems_2_2", "poems_3"]);
    }
}
