use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("No seed URLs were supplied")]
    NoSeeds,

    #[error("Could not load seed page {url}: {reason}")]
    SeedNavigation { url: String, reason: String },

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Link extraction failed: {0}")]
    Extraction(String),

    #[error("Other error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
