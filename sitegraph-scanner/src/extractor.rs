use crate::address::PageAddress;
use crate::error::Result;
use crate::session::PageSession;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// One anchor as seen in the rendered page, before per-page deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObservation {
    /// Absolute href as resolved by the page session
    pub href: String,
    pub context: String,
    pub text: String,
}

impl RawObservation {
    pub fn new(
        href: impl Into<String>,
        context: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            href: href.into(),
            context: context.into(),
            text: text.into(),
        }
    }
}

/// All observations of one href on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLink {
    pub href: String,
    pub contexts: BTreeSet<String>,
    pub texts: BTreeSet<String>,
    pub instances: usize,
}

impl RawLink {
    fn new(href: String) -> Self {
        Self {
            href,
            contexts: BTreeSet::new(),
            texts: BTreeSet::new(),
            instances: 0,
        }
    }

    fn absorb(&mut self, observation: RawObservation) {
        self.contexts.insert(observation.context);
        let text = normalize_text(&observation.text);
        if !text.is_empty() {
            self.texts.insert(text);
        }
        self.instances += 1;
    }
}

/// Collapse runs of whitespace and trim, the way visible text reads.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fold a page's observations into one `RawLink` per href, in first-seen order.
pub fn dedupe_observations(observations: Vec<RawObservation>) -> Vec<RawLink> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut links: Vec<RawLink> = Vec::new();

    for observation in observations {
        let slot = match index.get(&observation.href) {
            Some(&slot) => slot,
            None => {
                index.insert(observation.href.clone(), links.len());
                links.push(RawLink::new(observation.href.clone()));
                links.len() - 1
            }
        };
        links[slot].absorb(observation);
    }

    links
}

/// Pull the links of the page currently loaded in `session`.
///
/// Navigation and the ready wait have already happened; this only reads the DOM.
pub async fn extract_links<S>(session: &mut S, page: &PageAddress) -> Result<Vec<RawLink>>
where
    S: PageSession + ?Sized,
{
    let observations = session.extract_raw_links().await?;
    let total = observations.len();
    let links = dedupe_observations(observations);
    debug!("{}: {} anchors, {} unique hrefs", page, total, links.len());
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeats_merge_into_one_link() {
        let links = dedupe_observations(vec![
            RawObservation::new("https://ex.edu/about/", "NAV", "About"),
            RawObservation::new("https://ex.edu/news/", "", "News"),
            RawObservation::new("https://ex.edu/about/", "FOOTER", "About us"),
        ]);

        assert_eq!(links.len(), 2);
        let about = &links[0];
        assert_eq!(about.href, "https://ex.edu/about/");
        assert_eq!(about.instances, 2);
        assert_eq!(
            about.contexts.iter().cloned().collect::<Vec<_>>(),
            vec!["FOOTER".to_string(), "NAV".to_string()]
        );
        assert_eq!(about.texts.len(), 2);
        assert_eq!(links[1].href, "https://ex.edu/news/");
    }

    #[test]
    fn test_same_context_and_text_still_count() {
        let links = dedupe_observations(vec![
            RawObservation::new("https://ex.edu/", "", "Home"),
            RawObservation::new("https://ex.edu/", "", "Home"),
            RawObservation::new("https://ex.edu/", "", "Home"),
        ]);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].instances, 3);
        assert_eq!(links[0].contexts.len(), 1);
        assert_eq!(links[0].texts.len(), 1);
    }

    #[test]
    fn test_text_is_normalised_and_blank_text_dropped() {
        let links = dedupe_observations(vec![
            RawObservation::new("https://ex.edu/a", "", "  Apply\n   now "),
            RawObservation::new("https://ex.edu/a", "", "   "),
        ]);
        assert_eq!(links[0].texts.iter().next().map(String::as_str), Some("Apply now"));
        assert_eq!(links[0].texts.len(), 1);
        assert_eq!(links[0].instances, 2);
    }

    #[test]
    fn test_hrefs_differing_only_in_fragment_stay_distinct() {
        let links = dedupe_observations(vec![
            RawObservation::new("https://ex.edu/a", "", ""),
            RawObservation::new("https://ex.edu/a#top", "", ""),
        ]);
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn test_empty_page() {
        assert!(dedupe_observations(Vec::new()).is_empty());
    }
}
