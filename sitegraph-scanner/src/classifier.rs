use crate::address::PageAddress;
use std::fmt;
use tracing::debug;
use url::Url;

/// File types that are downloads rather than pages.
pub const FILE_EXTENSIONS: &[&str] = &[
    // images
    "jpg", "jpeg", "png", "gif", "bmp", "svg", "webp", "ico", "tif", "tiff", "heic",
    // audio and video
    "mp3", "wav", "ogg", "m4a", "aac", "flac", "mp4", "m4v", "mov", "avi", "wmv", "webm", "mkv",
    // documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "odp", "rtf", "csv",
    // archives
    "zip", "tar", "gz", "tgz", "bz2", "rar", "7z",
];

/// Calendar widget navigation paths. Every month/day/list view is a distinct URL,
/// so following them walks an unbounded calendar.
pub const NOISY_PATH_FRAGMENTS: &[&str] = &[
    "/events/month/",
    "/events/week/",
    "/events/day/",
    "/events/list/",
    "/events/photo/",
    "/events/today/",
    "/events/upcoming/",
    "/events/past/",
    "/events/ical/",
    "/calendar/action~",
];

/// Why an href was not queued. The edge is still recorded in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Malformed,
    UnsupportedScheme,
    CrossOrigin,
    FileDownload,
    NoisyUi,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::Malformed => "malformed href",
            Rejection::UnsupportedScheme => "not http(s)",
            Rejection::CrossOrigin => "cross-origin",
            Rejection::FileDownload => "file download",
            Rejection::NoisyUi => "calendar widget navigation",
        };
        f.write_str(reason)
    }
}

/// Decides which discovered hrefs join the frontier.
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    origin_host: String,
    strict_host: bool,
}

impl LinkClassifier {
    pub fn new(origin_host: impl Into<String>) -> Self {
        Self {
            origin_host: origin_host.into().to_ascii_lowercase(),
            strict_host: false,
        }
    }

    /// Classifier for the origin of the given address.
    pub fn for_address(address: &PageAddress) -> Option<Self> {
        address.host().map(Self::new)
    }

    /// With strict matching `www.ex.edu` and `ex.edu` are different origins.
    pub fn with_strict_host(mut self, strict: bool) -> Self {
        self.strict_host = strict;
        self
    }

    pub fn origin_host(&self) -> &str {
        &self.origin_host
    }

    /// Apply the rules in order; the first failing rule wins.
    pub fn classify(&self, href: &str) -> Result<PageAddress, Rejection> {
        let url = Url::parse(href).map_err(|_| Rejection::Malformed)?;
        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host,
            _ => return Err(Rejection::Malformed),
        };

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Rejection::UnsupportedScheme);
        }

        if !self.is_same_host(host) {
            return Err(Rejection::CrossOrigin);
        }

        let path = url.path();
        if has_file_extension(path) {
            return Err(Rejection::FileDownload);
        }

        if is_noisy_path(path) {
            return Err(Rejection::NoisyUi);
        }

        Ok(PageAddress::from_url(&url))
    }

    pub fn should_enqueue(&self, href: &str) -> bool {
        match self.classify(href) {
            Ok(_) => true,
            Err(reason) => {
                debug!("Not queuing {} ({})", href, reason);
                false
            }
        }
    }

    fn is_same_host(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        if self.strict_host {
            return host == self.origin_host;
        }
        strip_www(&host) == strip_www(&self.origin_host)
    }
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

fn has_file_extension(path: &str) -> bool {
    let last_segment = path.rsplit('/').next().unwrap_or("");
    match last_segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            let ext = ext.to_ascii_lowercase();
            FILE_EXTENSIONS.contains(&ext.as_str())
        }
        _ => false,
    }
}

fn is_noisy_path(path: &str) -> bool {
    let path = path.to_ascii_lowercase();
    NOISY_PATH_FRAGMENTS
        .iter()
        .any(|fragment| path.contains(fragment))
}
