use crate::address::PageAddress;
use crate::classifier::{LinkClassifier, Rejection};
use crate::frontier::Frontier;
use crate::graph::SiteLinkGraph;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlStatus {
    /// Not run yet
    Pending,
    /// The frontier has no unvisited addresses left
    Complete,
    /// Stopped at the configured page limit; pending addresses remain
    PageLimitReached,
    /// Cancelled; pending addresses remain and the crawl can be resumed
    Interrupted,
}

/// Frontier and graph of one crawl, plus what is needed to resume it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlState {
    pub status: CrawlStatus,
    pub seeds: Vec<PageAddress>,
    pub origin_host: String,
    pub strict_host: bool,
    pub frontier: Frontier,
    pub graph: SiteLinkGraph,
    pub pages_processed: usize,
    pub pages_skipped: usize,
}

impl CrawlState {
    pub fn new(seeds: Vec<PageAddress>, origin_host: String, strict_host: bool) -> Self {
        let frontier = Frontier::with_seeds(seeds.iter().cloned());
        Self {
            status: CrawlStatus::Pending,
            seeds,
            origin_host,
            strict_host,
            frontier,
            graph: SiteLinkGraph::new(),
            pages_processed: 0,
            pages_skipped: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == CrawlStatus::Complete
    }

    /// Classifier matching the one the crawl used for this origin.
    pub fn classifier(&self) -> LinkClassifier {
        LinkClassifier::new(self.origin_host.clone()).with_strict_host(self.strict_host)
    }

    /// Whether an href points at a page or file on this crawl's origin.
    pub fn is_internal(&self, href: &str) -> bool {
        match self.classifier().classify(href) {
            Ok(_) => true,
            Err(Rejection::FileDownload | Rejection::NoisyUi) => true,
            Err(_) => false,
        }
    }
}
