use crate::context::{ElementDescriptor, context_of};
use crate::error::{Result, ScanError};
use crate::extractor::RawObservation;
use crate::session::{PageSession, ReadyOutcome};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "sitegraph/0.1 (+https://github.com/sitegraph/sitegraph)";
pub const DEFAULT_READY_SELECTOR: &str = "body";

#[derive(Debug, Clone)]
pub struct HttpSessionOptions {
    pub user_agent: String,
    pub request_timeout: Duration,
    /// CSS selector that marks a page as ready
    pub ready_selector: String,
    /// Delay between reloads while waiting for the ready marker
    pub poll_interval: Duration,
}

impl Default for HttpSessionOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(30),
            ready_selector: DEFAULT_READY_SELECTOR.to_string(),
            poll_interval: Duration::from_millis(500),
        }
    }
}

struct LoadedPage {
    /// Final URL after redirects, used as the base for relative hrefs
    url: Url,
    body: String,
    is_html: bool,
}

/// Page session over plain HTTP. Pages are fetched with reqwest and their static
/// markup parsed with scraper; relative hrefs are resolved against `<base href>` or
/// the final URL the way a browser reports `a.href`.
pub struct HttpPageSession {
    client: Client,
    options: HttpSessionOptions,
    current: Option<LoadedPage>,
}

impl HttpPageSession {
    pub fn new(options: HttpSessionOptions) -> Result<Self> {
        Selector::parse(&options.ready_selector).map_err(|e| {
            ScanError::Other(format!("Invalid ready selector '{}': {}", options.ready_selector, e))
        })?;

        let client = Client::builder()
            .user_agent(options.user_agent.clone())
            .timeout(options.request_timeout)
            .connect_timeout(options.request_timeout / 2)
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            options,
            current: None,
        })
    }

    async fn load(&self, url: &str) -> Result<LoadedPage> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScanError::Navigation(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            // A browser still renders error pages, so they stay loadable
            warn!("{} answered {}", url, status);
        }

        let final_url = response.url().clone();
        let is_html = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("text/html") || ct.contains("application/xhtml"))
            // Untyped responses are sniffed as markup
            .unwrap_or(true);

        let body = response
            .text()
            .await
            .map_err(|e| ScanError::Navigation(format!("{}: {}", url, e)))?;

        Ok(LoadedPage {
            url: final_url,
            body,
            is_html,
        })
    }

    fn loaded(&self) -> Result<&LoadedPage> {
        self.current
            .as_ref()
            .ok_or_else(|| ScanError::Navigation("no page loaded".to_string()))
    }
}

#[async_trait]
impl PageSession for HttpPageSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);
        self.current = None;
        let page = self.load(url).await?;
        self.current = Some(page);
        Ok(())
    }

    async fn wait_ready(&mut self, timeout: Duration) -> Result<ReadyOutcome> {
        let deadline = Instant::now() + timeout;

        loop {
            let page = self.loaded()?;
            if !page.is_html || has_marker(&page.body, &self.options.ready_selector)? {
                return Ok(ReadyOutcome::Ready);
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(ReadyOutcome::TimedOut);
            }

            tokio::time::sleep(self.options.poll_interval.min(deadline - now)).await;
            if Instant::now() >= deadline {
                return Ok(ReadyOutcome::TimedOut);
            }

            let url = page.url.to_string();
            debug!("Ready marker missing on {}, reloading", url);
            // The page did load once; a failed reload just means it never became ready
            match self.load(&url).await {
                Ok(reloaded) => self.current = Some(reloaded),
                Err(e) => {
                    warn!("Reload of {} failed while waiting for it: {}", url, e);
                    return Ok(ReadyOutcome::TimedOut);
                }
            }
        }
    }

    async fn extract_raw_links(&mut self) -> Result<Vec<RawObservation>> {
        let page = self.loaded()?;
        if !page.is_html {
            return Ok(Vec::new());
        }
        extract_anchors(&page.body, &page.url)
    }
}

fn has_marker(body: &str, selector: &str) -> Result<bool> {
    let selector = Selector::parse(selector)
        .map_err(|e| ScanError::Other(format!("Invalid ready selector '{}': {}", selector, e)))?;
    let document = Html::parse_document(body);
    Ok(document.select(&selector).next().is_some())
}

/// Every `a[href]` in the document with its resolved href, context trail and text.
///
/// Relative hrefs resolve against the document's first `<base href>` when it has
/// one, otherwise against `page_url`.
pub fn extract_anchors(body: &str, page_url: &Url) -> Result<Vec<RawObservation>> {
    let document = Html::parse_document(body);
    let base = document_base(&document, page_url)?;
    let link_selector = Selector::parse("a[href]")
        .map_err(|e| ScanError::Extraction(format!("anchor selector: {}", e)))?;

    let mut observations = Vec::new();
    for element in document.select(&link_selector) {
        let Some(raw_href) = element.value().attr("href") else {
            continue;
        };
        let href = resolve_href(&base, raw_href);

        let ancestors: Vec<ElementDescriptor> = element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .map(|el| describe(&el))
            .collect();

        let text: String = element.text().collect();
        observations.push(RawObservation::new(href, context_of(&ancestors), text));
    }

    Ok(observations)
}

fn document_base(document: &Html, page_url: &Url) -> Result<Url> {
    let base_selector = Selector::parse("base[href]")
        .map_err(|e| ScanError::Extraction(format!("base selector: {}", e)))?;

    let base = document
        .select(&base_selector)
        .next()
        .and_then(|el| el.value().attr("href"))
        .and_then(|href| page_url.join(href.trim()).ok())
        .unwrap_or_else(|| page_url.clone());
    Ok(base)
}

/// Absolute form of an href attribute. Hrefs that can't be resolved are kept as
/// written, which is what a browser reports for them too.
pub fn resolve_href(base: &Url, raw_href: &str) -> String {
    let trimmed = raw_href.trim();
    base.join(trimmed)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| trimmed.to_string())
}

fn describe(element: &ElementRef<'_>) -> ElementDescriptor {
    let value = element.value();
    let mut descriptor = ElementDescriptor::new(value.name()).with_classes(value.classes());
    if let Some(id) = value.id() {
        descriptor = descriptor.with_id(id);
    }
    descriptor
}
