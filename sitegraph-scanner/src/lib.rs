pub mod address;
pub mod classifier;
pub mod context;
pub mod crawler;
pub mod error;
pub mod extractor;
pub mod frontier;
pub mod graph;
pub mod http_session;
pub mod result;
pub mod session;

pub use address::{PageAddress, canonicalize};
pub use classifier::{LinkClassifier, Rejection};
pub use crawler::{CrawlProgress, Crawler, PolitenessDelay, ProgressCallback};
pub use error::ScanError;
pub use frontier::Frontier;
pub use graph::{LinkEdge, SiteLinkGraph};
pub use http_session::{HttpPageSession, HttpSessionOptions};
pub use result::{CrawlState, CrawlStatus};
pub use session::{MemorySession, PageSession, ReadyOutcome};
