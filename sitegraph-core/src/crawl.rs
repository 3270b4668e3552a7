use indicatif::{ProgressBar, ProgressStyle};
use sitegraph_scanner::crawler::DEFAULT_PAGE_TIMEOUT;
use sitegraph_scanner::http_session::{DEFAULT_READY_SELECTOR, DEFAULT_USER_AGENT};
use sitegraph_scanner::{
    CrawlProgress, CrawlState, CrawlStatus, Crawler, HttpPageSession, HttpSessionOptions,
    PolitenessDelay,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

/// Options for configuring a crawl operation
pub struct CrawlOptions {
    pub urls: Vec<String>,
    pub page_timeout: Duration,
    pub max_pages: Option<usize>,
    pub strict_host: bool,
    /// Pause between page loads on the same host
    pub delay: Option<PolitenessDelay>,
    pub ready_selector: String,
    pub user_agent: String,
    pub show_progress_bars: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            page_timeout: DEFAULT_PAGE_TIMEOUT,
            max_pages: None,
            strict_host: false,
            delay: None,
            ready_selector: DEFAULT_READY_SELECTOR.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            show_progress_bars: false,
        }
    }
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

/// Group seeds into one crawl per host, keeping first-seen order.
///
/// A crawl has a single origin, so seeds on different hosts become separate crawls.
pub fn group_seeds_by_host(urls: &[String]) -> Vec<(String, Vec<String>)> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();

    for url in urls {
        let host = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
            .unwrap_or_else(|| url.clone());

        match groups.iter_mut().find(|(h, _)| *h == host) {
            Some((_, seeds)) => seeds.push(url.clone()),
            None => groups.push((host, vec![url.clone()])),
        }
    }

    groups
}

/// Execute a crawl with the given options
/// Returns one state per crawled host
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
    cancellation: CancellationToken,
) -> Result<Vec<CrawlState>, String> {
    let CrawlOptions {
        urls,
        page_timeout,
        max_pages,
        strict_host,
        delay,
        ready_selector,
        user_agent,
        show_progress_bars,
    } = options;

    if urls.is_empty() {
        return Err("No URLs to crawl".to_string());
    }

    // Set up single progress bar for overall crawl progress (only if enabled)
    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .map_err(|e| format!("Invalid progress template: {}", e))?;
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        Some(pb)
    } else {
        None
    };

    let groups = group_seeds_by_host(&urls);
    let mut states = Vec::new();

    for (idx, (host, seeds)) in groups.iter().enumerate() {
        if cancellation.is_cancelled() {
            break;
        }

        if let Some(ref callback) = progress_callback
            && groups.len() > 1
        {
            callback(format!("Crawling host {}/{}: {}", idx + 1, groups.len(), host));
        }

        let mut session = HttpPageSession::new(HttpSessionOptions {
            user_agent: user_agent.clone(),
            request_timeout: page_timeout,
            ready_selector: ready_selector.clone(),
            ..Default::default()
        })
        .map_err(|e| e.to_string())?;

        let mut crawler = Crawler::new()
            .with_page_timeout(page_timeout)
            .with_strict_host(strict_host)
            .with_cancellation(cancellation.clone());

        if let Some(max_pages) = max_pages {
            crawler = crawler.with_max_pages(max_pages);
        }
        if let Some(delay) = delay {
            crawler = crawler.with_politeness_delay(delay);
        }

        if let Some(ref pb) = progress_bar {
            let pb = pb.clone();
            crawler = crawler.with_progress_callback(Arc::new(move |p: CrawlProgress| {
                pb.set_message(format!(
                    "Crawling... {} visited, {} queued, {} links | {}",
                    p.visited,
                    p.pending,
                    p.edges,
                    extract_url_path(p.page.as_str())
                ));
            }));
        }

        match crawler.crawl(seeds, &mut session).await {
            Ok(state) => {
                debug!("{} finished with status {:?}", host, state.status);
                let interrupted = state.status == CrawlStatus::Interrupted;
                states.push(state);
                if interrupted {
                    break;
                }
            }
            Err(e) => {
                if let Some(ref callback) = progress_callback {
                    callback(format!("[!]  Failed to crawl {}: {}", host, e));
                }
            }
        }
    }

    // Finish progress bar (only if enabled)
    if let Some(ref pb) = progress_bar {
        let pages: usize = states.iter().map(|s| s.frontier.visited_count()).sum();
        let edges: usize = states.iter().map(|s| s.graph.len()).sum();
        if cancellation.is_cancelled() {
            pb.finish_with_message(format!(
                "Crawl interrupted! {} pages visited, {} links recorded",
                pages, edges
            ));
        } else {
            pb.finish_with_message(format!(
                "Crawl complete! {} pages visited, {} links recorded",
                pages, edges
            ));
        }
    }

    Ok(states)
}
