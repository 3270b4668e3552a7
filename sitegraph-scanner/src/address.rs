use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Canonical identity of a page in the frontier.
///
/// Scheme, host, optional non-default port and path. Query string, fragment and any
/// userinfo are dropped, so `https://ex.edu/a?x=1#top` and `https://ex.edu/a` are the
/// same node. The raw href is still what the graph is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageAddress(String);

impl PageAddress {
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw.trim())
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", raw, e)))?;
        Ok(Self::from_url(&url))
    }

    pub fn from_url(url: &Url) -> Self {
        let mut canonical = url.clone();
        canonical.set_query(None);
        canonical.set_fragment(None);
        // Only fails for cannot-be-a-base URLs, which never reach here as pages
        let _ = canonical.set_username("");
        let _ = canonical.set_password(None);
        Self(canonical.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_url(&self) -> Option<Url> {
        Url::parse(&self.0).ok()
    }

    pub fn host(&self) -> Option<String> {
        self.to_url()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
    }

    pub fn path(&self) -> String {
        self.to_url()
            .map(|u| u.path().to_string())
            .unwrap_or_default()
    }
}

impl fmt::Display for PageAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PageAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonical frontier form of an href, or `None` if it doesn't parse.
pub fn canonicalize(href: &str) -> Option<PageAddress> {
    Url::parse(href).ok().map(|u| PageAddress::from_url(&u))
}
