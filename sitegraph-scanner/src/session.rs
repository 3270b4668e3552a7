use crate::error::{Result, ScanError};
use crate::extractor::RawObservation;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyOutcome {
    Ready,
    /// The ready marker never appeared. Not an error; the page is skipped.
    TimedOut,
}

/// A single browser-like tab. Only one page is loaded at a time, and navigating
/// replaces whatever was loaded before.
#[async_trait]
pub trait PageSession: Send {
    async fn navigate(&mut self, url: &str) -> Result<()>;

    async fn wait_ready(&mut self, timeout: Duration) -> Result<ReadyOutcome>;

    /// Anchors of the loaded page. Hrefs are absolute; repeats are allowed.
    async fn extract_raw_links(&mut self) -> Result<Vec<RawObservation>>;
}

#[async_trait]
impl<S: PageSession + ?Sized> PageSession for Box<S> {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        (**self).navigate(url).await
    }

    async fn wait_ready(&mut self, timeout: Duration) -> Result<ReadyOutcome> {
        (**self).wait_ready(timeout).await
    }

    async fn extract_raw_links(&mut self) -> Result<Vec<RawObservation>> {
        (**self).extract_raw_links().await
    }
}

#[derive(Debug, Clone)]
enum MemoryPage {
    Links(Vec<RawObservation>),
    NeverReady,
    Broken(String),
    ExtractionFails(String),
    ExtractionHangs,
}

/// In-memory session over a fixed set of pages. Unknown URLs fail to navigate.
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
    pages: HashMap<String, MemoryPage>,
    current: Option<String>,
    navigations: Vec<String>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, links: Vec<RawObservation>) -> Self {
        self.pages.insert(url.to_string(), MemoryPage::Links(links));
        self
    }

    pub fn with_slow_page(mut self, url: &str) -> Self {
        self.pages.insert(url.to_string(), MemoryPage::NeverReady);
        self
    }

    pub fn with_broken_page(mut self, url: &str, reason: &str) -> Self {
        self.pages
            .insert(url.to_string(), MemoryPage::Broken(reason.to_string()));
        self
    }

    /// Loads and becomes ready, but reading its links fails.
    pub fn with_failing_extraction(mut self, url: &str, reason: &str) -> Self {
        self.pages
            .insert(url.to_string(), MemoryPage::ExtractionFails(reason.to_string()));
        self
    }

    /// Loads and becomes ready, but reading its links never finishes.
    pub fn with_hanging_extraction(mut self, url: &str) -> Self {
        self.pages.insert(url.to_string(), MemoryPage::ExtractionHangs);
        self
    }

    /// Every URL passed to `navigate`, in call order.
    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    fn current_page(&self) -> Result<&MemoryPage> {
        self.current
            .as_ref()
            .and_then(|url| self.pages.get(url))
            .ok_or_else(|| ScanError::Navigation("no page loaded".to_string()))
    }
}

#[async_trait]
impl PageSession for MemorySession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.navigations.push(url.to_string());
        self.current = None;
        match self.pages.get(url) {
            None => Err(ScanError::Navigation(format!("{}: not found", url))),
            Some(MemoryPage::Broken(reason)) => {
                Err(ScanError::Navigation(format!("{}: {}", url, reason)))
            }
            Some(_) => {
                self.current = Some(url.to_string());
                Ok(())
            }
        }
    }

    async fn wait_ready(&mut self, _timeout: Duration) -> Result<ReadyOutcome> {
        match self.current_page()? {
            MemoryPage::NeverReady => Ok(ReadyOutcome::TimedOut),
            _ => Ok(ReadyOutcome::Ready),
        }
    }

    async fn extract_raw_links(&mut self) -> Result<Vec<RawObservation>> {
        match self.current_page()? {
            MemoryPage::Links(links) => Ok(links.clone()),
            MemoryPage::ExtractionFails(reason) => Err(ScanError::Extraction(reason.clone())),
            MemoryPage::ExtractionHangs => std::future::pending().await,
            _ => Ok(Vec::new()),
        }
    }
}
