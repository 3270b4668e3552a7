use crate::address::PageAddress;
use crate::extractor::RawLink;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Everything observed about one href across the crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEdge {
    pub href: String,
    /// Pages the href was found on
    pub locations: BTreeSet<PageAddress>,
    pub contexts: BTreeSet<String>,
    pub texts: BTreeSet<String>,
    /// Raw occurrences, repeats on the same page included
    pub instances: usize,
}

impl LinkEdge {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            locations: BTreeSet::new(),
            contexts: BTreeSet::new(),
            texts: BTreeSet::new(),
            instances: 0,
        }
    }
}

/// Map from the raw href to its edge. Only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteLinkGraph {
    edges: BTreeMap<String, LinkEdge>,
}

impl SiteLinkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one page's link into the edge for its href.
    pub fn merge(&mut self, page: &PageAddress, link: RawLink) {
        let edge = self
            .edges
            .entry(link.href.clone())
            .or_insert_with(|| LinkEdge::new(link.href));
        edge.locations.insert(page.clone());
        edge.contexts.extend(link.contexts);
        edge.texts.extend(link.texts);
        edge.instances += link.instances;
    }

    pub fn get(&self, href: &str) -> Option<&LinkEdge> {
        self.edges.get(href)
    }

    pub fn contains(&self, href: &str) -> bool {
        self.edges.contains_key(href)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Edges ordered by href.
    pub fn edges(&self) -> impl Iterator<Item = &LinkEdge> {
        self.edges.values()
    }

    pub fn total_instances(&self) -> usize {
        self.edges.values().map(|e| e.instances).sum()
    }
}

impl<'a> IntoIterator for &'a SiteLinkGraph {
    type Item = (&'a String, &'a LinkEdge);
    type IntoIter = std::collections::btree_map::Iter<'a, String, LinkEdge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}
