use crate::address::PageAddress;
use crate::classifier::LinkClassifier;
use crate::error::{Result, ScanError};
use crate::extractor::{RawLink, extract_links};
use crate::result::{CrawlState, CrawlStatus};
use crate::session::{PageSession, ReadyOutcome};
use rand::Rng;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Snapshot handed to the progress callback before each page is visited.
#[derive(Debug, Clone)]
pub struct CrawlProgress {
    pub page: PageAddress,
    pub visited: usize,
    pub pending: usize,
    pub edges: usize,
}

pub type ProgressCallback = Arc<dyn Fn(CrawlProgress) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NavigationTimeout,
    NavigationError(String),
    NotReady,
    ExtractionTimeout,
    ExtractionFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NavigationTimeout => write!(f, "navigation timed out"),
            SkipReason::NavigationError(e) => write!(f, "navigation failed: {}", e),
            SkipReason::NotReady => write!(f, "page never became ready"),
            SkipReason::ExtractionTimeout => write!(f, "link extraction timed out"),
            SkipReason::ExtractionFailed(e) => write!(f, "link extraction failed: {}", e),
        }
    }
}

/// Pause taken before each page load after the first, drawn uniformly from
/// `median ± jitter`. A jitter wider than the median lifts the median to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolitenessDelay {
    pub median: Duration,
    pub jitter: Duration,
}

impl PolitenessDelay {
    pub fn new(median: Duration, jitter: Duration) -> Self {
        Self { median, jitter }
    }

    pub fn sample(&self) -> Duration {
        let jitter = self.jitter.as_millis() as u64;
        let median = (self.median.as_millis() as u64).max(jitter);
        if jitter == 0 {
            return Duration::from_millis(median);
        }
        let ms = rand::thread_rng().gen_range(median - jitter..=median + jitter);
        Duration::from_millis(ms)
    }
}

enum PageVisit {
    Loaded(Vec<RawLink>),
    Skipped(SkipReason),
}

/// Breadth-first link-graph crawler.
///
/// Pages are visited one at a time through a single [`PageSession`], oldest
/// discovery first. Every link found is recorded in the graph; only links the
/// [`LinkClassifier`] accepts are added to the frontier.
pub struct Crawler {
    page_timeout: Duration,
    max_pages: Option<usize>,
    strict_host: bool,
    delay: Option<PolitenessDelay>,
    progress_callback: Option<ProgressCallback>,
    cancellation: Option<CancellationToken>,
}

impl Crawler {
    pub fn new() -> Self {
        Self {
            page_timeout: DEFAULT_PAGE_TIMEOUT,
            max_pages: None,
            strict_host: false,
            delay: None,
            progress_callback: None,
            cancellation: None,
        }
    }

    /// Bound on navigate plus ready-wait, and separately on link extraction.
    pub fn with_page_timeout(mut self, page_timeout: Duration) -> Self {
        self.page_timeout = page_timeout;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    pub fn with_strict_host(mut self, strict_host: bool) -> Self {
        self.strict_host = strict_host;
        self
    }

    pub fn with_politeness_delay(mut self, delay: PolitenessDelay) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Crawl from the given seeds. The origin is the host of the first seed.
    ///
    /// Fails only if the seeds are unusable or the first seed cannot be navigated to.
    pub async fn crawl<S>(&self, seeds: &[String], session: &mut S) -> Result<CrawlState>
    where
        S: PageSession + ?Sized,
    {
        let seeds = seeds
            .iter()
            .map(|s| PageAddress::parse(s))
            .collect::<Result<Vec<_>>>()?;

        let origin_host = seeds
            .first()
            .ok_or(ScanError::NoSeeds)?
            .host()
            .ok_or_else(|| ScanError::InvalidUrl(format!("{} has no host", seeds[0])))?
            .to_ascii_lowercase();

        info!("Starting crawl of {} from {} seed(s)", origin_host, seeds.len());
        let state = CrawlState::new(seeds, origin_host, self.strict_host);
        self.run(state, session).await
    }

    /// Continue a crawl that was interrupted or stopped at the page limit.
    pub async fn resume<S>(&self, state: CrawlState, session: &mut S) -> Result<CrawlState>
    where
        S: PageSession + ?Sized,
    {
        info!(
            "Resuming crawl of {} ({} visited, {} pending)",
            state.origin_host,
            state.frontier.visited_count(),
            state.frontier.pending_count()
        );
        self.run(state, session).await
    }

    async fn run<S>(&self, mut state: CrawlState, session: &mut S) -> Result<CrawlState>
    where
        S: PageSession + ?Sized,
    {
        let classifier = state.classifier();
        let mut processed_this_run = 0;

        loop {
            if self.is_cancelled() {
                info!("Crawl interrupted with {} page(s) pending", state.frontier.pending_count());
                state.status = CrawlStatus::Interrupted;
                return Ok(state);
            }

            let Some(page) = state.frontier.next_unvisited().cloned() else {
                state.status = CrawlStatus::Complete;
                break;
            };

            if let Some(max_pages) = self.max_pages
                && processed_this_run >= max_pages
            {
                info!("Page limit of {} reached", max_pages);
                state.status = CrawlStatus::PageLimitReached;
                break;
            }

            if let Some(ref callback) = self.progress_callback {
                callback(CrawlProgress {
                    page: page.clone(),
                    visited: state.frontier.visited_count(),
                    pending: state.frontier.pending_count(),
                    edges: state.graph.len(),
                });
            }

            let pause = match self.delay {
                Some(ref delay) if processed_this_run > 0 => delay.sample(),
                _ => Duration::ZERO,
            };
            let step = async {
                if !pause.is_zero() {
                    debug!("Waiting {}ms before {}", pause.as_millis(), page);
                    tokio::time::sleep(pause).await;
                }
                self.visit(session, &page).await
            };

            let visit = match self.cancellation {
                Some(ref token) => tokio::select! {
                    biased;
                    _ = token.cancelled() => None,
                    visit = step => Some(visit),
                },
                None => Some(step.await),
            };

            // Cancelled mid-page: leave it pending so a resume retries it
            let Some(visit) = visit else {
                info!("Crawl interrupted while loading {}", page);
                state.status = CrawlStatus::Interrupted;
                return Ok(state);
            };

            let is_first_seed = state.pages_processed == 0 && state.seeds.first() == Some(&page);
            state.frontier.mark_visited(&page);
            state.pages_processed += 1;
            processed_this_run += 1;

            match visit {
                PageVisit::Loaded(links) => {
                    info!("Visited {} ({} unique links)", page, links.len());
                    fold_links(&mut state, &classifier, &page, links);
                }
                // Nothing to build a graph from
                PageVisit::Skipped(
                    reason @ (SkipReason::NavigationError(_) | SkipReason::NavigationTimeout),
                ) if is_first_seed => {
                    warn!("Could not load first seed {}: {}", page, reason);
                    return Err(ScanError::SeedNavigation {
                        url: page.to_string(),
                        reason: reason.to_string(),
                    });
                }
                PageVisit::Skipped(reason) => {
                    warn!("Skipping {}: {}", page, reason);
                    state.pages_skipped += 1;
                }
            }
        }

        info!(
            "Crawl of {} finished: {} pages visited, {} edges",
            state.origin_host,
            state.frontier.visited_count(),
            state.graph.len()
        );
        Ok(state)
    }

    async fn visit<S>(&self, session: &mut S, page: &PageAddress) -> PageVisit
    where
        S: PageSession + ?Sized,
    {
        let started = Instant::now();

        match timeout(self.page_timeout, session.navigate(page.as_str())).await {
            Err(_) => return PageVisit::Skipped(SkipReason::NavigationTimeout),
            Ok(Err(e)) => return PageVisit::Skipped(SkipReason::NavigationError(e.to_string())),
            Ok(Ok(())) => {}
        }

        let remaining = self.page_timeout.saturating_sub(started.elapsed());
        match timeout(remaining, session.wait_ready(remaining)).await {
            Ok(Ok(ReadyOutcome::Ready)) => {}
            Ok(Ok(ReadyOutcome::TimedOut)) | Err(_) => {
                return PageVisit::Skipped(SkipReason::NotReady);
            }
            Ok(Err(e)) => return PageVisit::Skipped(SkipReason::NavigationError(e.to_string())),
        }

        match timeout(self.page_timeout, extract_links(session, page)).await {
            Err(_) => PageVisit::Skipped(SkipReason::ExtractionTimeout),
            Ok(Err(e)) => PageVisit::Skipped(SkipReason::ExtractionFailed(e.to_string())),
            Ok(Ok(links)) => PageVisit::Loaded(links),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .map(|token| token.is_cancelled())
            .unwrap_or(false)
    }
}

impl Default for Crawler {
    fn default() -> Self {
        Self::new()
    }
}

fn fold_links(
    state: &mut CrawlState,
    classifier: &LinkClassifier,
    page: &PageAddress,
    links: Vec<RawLink>,
) {
    for link in links {
        let target = classifier.classify(&link.href);
        match target {
            Ok(ref address) => {
                if state.frontier.insert(address.clone()) {
                    debug!("Queued {}", address);
                }
            }
            Err(reason) => debug!("Recorded {} without queuing ({})", link.href, reason),
        }
        state.graph.merge(page, link);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::RawObservation;
    use crate::session::MemorySession;
    use async_trait::async_trait;
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    fn obs(href: &str, context: &str, text: &str) -> RawObservation {
        RawObservation::new(href, context, text)
    }

    fn seeds(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|u| u.to_string()).collect()
    }

    fn addr(url: &str) -> PageAddress {
        PageAddress::parse(url).unwrap()
    }

    #[tokio::test]
    async fn test_home_about_pdf_scenario() {
        let mut session = MemorySession::new()
            .with_page(
                "https://ex.edu/",
                vec![
                    obs("https://ex.edu/about/", "NAV", "About"),
                    obs("https://ex.edu/about/", "FOOTER", "About"),
                    obs("https://ex.edu/doc.pdf", "", "Annual report"),
                ],
            )
            .with_page("https://ex.edu/about/", Vec::new());

        let state = Crawler::new()
            .crawl(&seeds(&["https://ex.edu/"]), &mut session)
            .await
            .unwrap();

        assert_eq!(state.status, CrawlStatus::Complete);

        let about = state.graph.get("https://ex.edu/about/").unwrap();
        assert_eq!(about.instances, 2);
        assert_eq!(about.contexts.len(), 2);
        assert_eq!(
            about.locations.iter().collect::<Vec<_>>(),
            vec![&addr("https://ex.edu/")]
        );

        let pdf = state.graph.get("https://ex.edu/doc.pdf").unwrap();
        assert_eq!(pdf.instances, 1);

        let entries: Vec<(String, bool)> = state
            .frontier
            .entries()
            .map(|(a, v)| (a.to_string(), v))
            .collect();
        assert_eq!(
            entries,
            vec![
                ("https://ex.edu/".to_string(), true),
                ("https://ex.edu/about/".to_string(), true),
            ]
        );
        assert_eq!(
            session.navigations(),
            &["https://ex.edu/".to_string(), "https://ex.edu/about/".to_string()]
        );
    }

    #[tokio::test]
    async fn test_each_page_visited_once() {
        let mut session = MemorySession::new()
            .with_page(
                "https://ex.edu/",
                vec![
                    obs("https://ex.edu/a", "", "A"),
                    obs("https://ex.edu/b", "", "B"),
                    obs("https://ex.edu/a?from=home", "", "A again"),
                ],
            )
            .with_page(
                "https://ex.edu/a",
                vec![obs("https://ex.edu/", "", "Home"), obs("https://ex.edu/b#x", "", "B")],
            )
            .with_page("https://ex.edu/b", vec![obs("https://ex.edu/a", "", "A")]);

        let state = Crawler::new()
            .crawl(&seeds(&["https://ex.edu/"]), &mut session)
            .await
            .unwrap();

        assert_eq!(session.navigations().len(), 3);
        assert_eq!(state.frontier.len(), 3);
        assert_eq!(state.frontier.visited_count(), 3);
        // raw hrefs stay distinct edges even when they share a page
        assert!(state.graph.contains("https://ex.edu/a?from=home"));
        assert!(state.graph.contains("https://ex.edu/b#x"));
        assert_eq!(state.graph.get("https://ex.edu/a").unwrap().locations.len(), 2);
    }

    #[tokio::test]
    async fn test_cross_origin_recorded_not_crawled() {
        let mut session = MemorySession::new()
            .with_page(
                "https://same.example/",
                vec![
                    obs("https://other.example/", "", "Other"),
                    obs("https://same.example/x", "", "X"),
                ],
            )
            .with_page("https://same.example/x", Vec::new())
            .with_page("https://other.example/", vec![obs("https://other.example/deep", "", "")]);

        let state = Crawler::new()
            .crawl(&seeds(&["https://same.example/"]), &mut session)
            .await
            .unwrap();

        assert!(state.graph.contains("https://other.example/"));
        assert!(state.graph.contains("https://same.example/x"));
        assert!(!state.frontier.contains(&addr("https://other.example/")));
        assert!(state.frontier.is_visited(&addr("https://same.example/x")));
        assert!(!session.navigations().iter().any(|u| u.contains("other.example")));
    }

    #[tokio::test]
    async fn test_accumulation_across_pages() {
        let mut session = MemorySession::new()
            .with_page(
                "https://ex.edu/a",
                vec![
                    obs("https://ex.edu/h", "NAV", "H"),
                    obs("https://ex.edu/b", "", "B"),
                    obs("https://ex.edu/h", "FOOTER", "H"),
                ],
            )
            .with_page("https://ex.edu/b", vec![obs("https://ex.edu/h", "", "Home")])
            .with_page("https://ex.edu/h", Vec::new());

        let state = Crawler::new()
            .crawl(&seeds(&["https://ex.edu/a"]), &mut session)
            .await
            .unwrap();

        let edge = state.graph.get("https://ex.edu/h").unwrap();
        assert_eq!(edge.instances, 3);
        assert_eq!(
            edge.locations,
            [addr("https://ex.edu/a"), addr("https://ex.edu/b")]
                .into_iter()
                .collect::<BTreeSet<_>>()
        );
        assert!(edge.contexts.contains("NAV"));
        assert!(edge.contexts.contains("FOOTER"));
    }

    #[tokio::test]
    async fn test_first_seed_navigation_error_is_fatal() {
        let mut session = MemorySession::new().with_broken_page("https://ex.edu/", "dns failure");
        let err = Crawler::new()
            .crawl(&seeds(&["https://ex.edu/"]), &mut session)
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::SeedNavigation { .. }));
    }

    #[tokio::test]
    async fn test_later_failures_are_skipped() {
        let mut session = MemorySession::new()
            .with_page(
                "https://ex.edu/",
                vec![
                    obs("https://ex.edu/broken", "", ""),
                    obs("https://ex.edu/slow", "", ""),
                    obs("https://ex.edu/ok", "", ""),
                ],
            )
            .with_broken_page("https://ex.edu/broken", "500")
            .with_slow_page("https://ex.edu/slow")
            .with_page("https://ex.edu/ok", Vec::new());

        let state = Crawler::new()
            .crawl(&seeds(&["https://ex.edu/"]), &mut session)
            .await
            .unwrap();

        assert!(state.is_complete());
        assert_eq!(state.frontier.visited_count(), 4);
        assert_eq!(state.pages_skipped, 2);
        assert_eq!(session.navigations().len(), 4);
    }

    #[tokio::test]
    async fn test_second_seed_failure_is_not_fatal() {
        let mut session = MemorySession::new().with_page("https://ex.edu/", Vec::new());
        let state = Crawler::new()
            .crawl(&seeds(&["https://ex.edu/", "https://ex.edu/missing"]), &mut session)
            .await
            .unwrap();
        assert_eq!(state.frontier.visited_count(), 2);
        assert_eq!(state.pages_skipped, 1);
    }

    #[tokio::test]
    async fn test_no_seeds() {
        let mut session = MemorySession::new();
        let err = Crawler::new().crawl(&[], &mut session).await.unwrap_err();
        assert!(matches!(err, ScanError::NoSeeds));

        let err = Crawler::new()
            .crawl(&seeds(&["not a url"]), &mut session)
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::InvalidUrl(_)));
    }

    fn chain_site(len: usize) -> MemorySession {
        let mut session = MemorySession::new();
        for i in 0..len {
            let next = format!("https://ex.edu/p{}", i + 1);
            session = session.with_page(&format!("https://ex.edu/p{}", i), vec![obs(&next, "", "")]);
        }
        session
    }

    #[tokio::test]
    async fn test_page_limit_and_resume() {
        let mut session = chain_site(5).with_page("https://ex.edu/p5", Vec::new());
        let crawler = Crawler::new().with_max_pages(2);

        let state = crawler
            .crawl(&seeds(&["https://ex.edu/p0"]), &mut session)
            .await
            .unwrap();
        assert_eq!(state.status, CrawlStatus::PageLimitReached);
        assert_eq!(state.frontier.visited_count(), 2);
        assert!(state.frontier.has_unvisited());

        let state = Crawler::new().resume(state, &mut session).await.unwrap();
        assert!(state.is_complete());
        assert_eq!(state.frontier.visited_count(), 6);
        assert_eq!(state.pages_processed, 6);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_returns_state() {
        let token = CancellationToken::new();
        token.cancel();
        let mut session = chain_site(3);

        let state = Crawler::new()
            .with_cancellation(token)
            .crawl(&seeds(&["https://ex.edu/p0"]), &mut session)
            .await
            .unwrap();

        assert_eq!(state.status, CrawlStatus::Interrupted);
        assert_eq!(state.frontier.pending_count(), 1);
        assert!(session.navigations().is_empty());
    }

    #[tokio::test]
    async fn test_progress_callback_cancels_mid_crawl() {
        let token = CancellationToken::new();
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let token_clone = token.clone();

        let mut session = chain_site(5);
        let state = Crawler::new()
            .with_cancellation(token)
            .with_progress_callback(Arc::new(move |progress: CrawlProgress| {
                let mut seen = seen_clone.lock().unwrap();
                seen.push(progress.page.to_string());
                if seen.len() == 3 {
                    token_clone.cancel();
                }
            }))
            .crawl(&seeds(&["https://ex.edu/p0"]), &mut session)
            .await
            .unwrap();

        assert_eq!(state.status, CrawlStatus::Interrupted);
        // third page was announced but the cancellation won the race
        assert_eq!(state.frontier.visited_count(), 2);
        assert!(state.frontier.contains(&addr("https://ex.edu/p2")));
        assert!(!state.frontier.is_visited(&addr("https://ex.edu/p2")));
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    /// Memory session whose navigation to one URL never completes.
    struct HangingSession {
        inner: MemorySession,
        hang_on: &'static str,
    }

    #[async_trait]
    impl PageSession for HangingSession {
        async fn navigate(&mut self, url: &str) -> Result<()> {
            if url == self.hang_on {
                std::future::pending::<()>().await;
            }
            self.inner.navigate(url).await
        }

        async fn wait_ready(&mut self, timeout: Duration) -> Result<ReadyOutcome> {
            self.inner.wait_ready(timeout).await
        }

        async fn extract_raw_links(&mut self) -> Result<Vec<RawObservation>> {
            self.inner.extract_raw_links().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_seed_navigation_timeout_is_fatal() {
        let mut session = HangingSession {
            inner: MemorySession::new().with_page("https://ex.edu/", Vec::new()),
            hang_on: "https://ex.edu/",
        };
        let err = Crawler::new()
            .with_page_timeout(Duration::from_secs(5))
            .crawl(&seeds(&["https://ex.edu/"]), &mut session)
            .await
            .unwrap_err();

        match err {
            ScanError::SeedNavigation { url, reason } => {
                assert_eq!(url, "https://ex.edu/");
                assert_eq!(reason, "navigation timed out");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigation_timeout_skips_later_page() {
        let mut session = HangingSession {
            inner: MemorySession::new()
                .with_page(
                    "https://ex.edu/",
                    vec![obs("https://ex.edu/stuck", "", ""), obs("https://ex.edu/ok", "", "")],
                )
                .with_page("https://ex.edu/stuck", Vec::new())
                .with_page("https://ex.edu/ok", Vec::new()),
            hang_on: "https://ex.edu/stuck",
        };
        let state = Crawler::new()
            .with_page_timeout(Duration::from_secs(5))
            .crawl(&seeds(&["https://ex.edu/"]), &mut session)
            .await
            .unwrap();

        assert!(state.is_complete());
        assert_eq!(state.pages_skipped, 1);
        assert_eq!(state.frontier.visited_count(), 3);
        assert!(state.frontier.is_visited(&addr("https://ex.edu/ok")));
    }

    #[tokio::test]
    async fn test_extraction_failure_skips_page() {
        let mut session = MemorySession::new()
            .with_page(
                "https://ex.edu/",
                vec![obs("https://ex.edu/bad", "", ""), obs("https://ex.edu/next", "", "")],
            )
            .with_failing_extraction("https://ex.edu/bad", "detached frame")
            .with_page("https://ex.edu/next", vec![obs("https://ex.edu/last", "", "")])
            .with_page("https://ex.edu/last", Vec::new());

        let state = Crawler::new()
            .crawl(&seeds(&["https://ex.edu/"]), &mut session)
            .await
            .unwrap();

        assert!(state.is_complete());
        assert_eq!(state.pages_skipped, 1);
        assert!(state.frontier.is_visited(&addr("https://ex.edu/bad")));
        assert!(state.frontier.is_visited(&addr("https://ex.edu/last")));
        assert!(
            state
                .graph
                .edges()
                .all(|edge| !edge.locations.contains(&addr("https://ex.edu/bad")))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_extraction_timeout_skips_page() {
        let mut session = MemorySession::new()
            .with_page(
                "https://ex.edu/",
                vec![obs("https://ex.edu/huge", "", ""), obs("https://ex.edu/next", "", "")],
            )
            .with_hanging_extraction("https://ex.edu/huge")
            .with_page("https://ex.edu/next", Vec::new());

        let state = Crawler::new()
            .with_page_timeout(Duration::from_secs(5))
            .crawl(&seeds(&["https://ex.edu/"]), &mut session)
            .await
            .unwrap();

        assert!(state.is_complete());
        assert_eq!(state.pages_skipped, 1);
        assert_eq!(state.frontier.visited_count(), 3);
        assert_eq!(state.graph.len(), 2);
        assert!(
            state
                .graph
                .edges()
                .all(|edge| !edge.locations.contains(&addr("https://ex.edu/huge")))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_politeness_delay_between_pages() {
        let mut session = chain_site(2).with_page("https://ex.edu/p2", Vec::new());
        let started = Instant::now();

        let state = Crawler::new()
            .with_politeness_delay(PolitenessDelay::new(Duration::from_secs(2), Duration::ZERO))
            .crawl(&seeds(&["https://ex.edu/p0"]), &mut session)
            .await
            .unwrap();

        assert_eq!(state.frontier.visited_count(), 3);
        // no pause before the first page
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(4) && elapsed < Duration::from_secs(5));
    }

    #[test]
    fn test_politeness_delay_sample_range() {
        let delay = PolitenessDelay::new(Duration::from_millis(100), Duration::from_millis(50));
        for _ in 0..50 {
            let pause = delay.sample();
            assert!(pause >= Duration::from_millis(50) && pause <= Duration::from_millis(150));
        }

        // jitter wider than the median never goes negative
        let delay = PolitenessDelay::new(Duration::from_millis(10), Duration::from_millis(50));
        for _ in 0..50 {
            assert!(delay.sample() <= Duration::from_millis(100));
        }
    }

    #[tokio::test]
    async fn test_boxed_session() {
        let mut session: Box<dyn PageSession> =
            Box::new(MemorySession::new().with_page("https://ex.edu/", Vec::new()));
        let state = Crawler::new()
            .crawl(&seeds(&["https://ex.edu/"]), &mut session)
            .await
            .unwrap();
        assert!(state.is_complete());
    }
}
