use crate::address::PageAddress;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Discovered pages: a FIFO of pending addresses plus the set already visited.
///
/// An address is inserted at most once for the lifetime of the frontier, no matter
/// how often it is rediscovered, so each page is processed at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frontier {
    order: Vec<PageAddress>,
    known: HashSet<PageAddress>,
    pending: VecDeque<PageAddress>,
    visited: HashSet<PageAddress>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seeds<I>(seeds: I) -> Self
    where
        I: IntoIterator<Item = PageAddress>,
    {
        let mut frontier = Self::new();
        for seed in seeds {
            frontier.insert(seed);
        }
        frontier
    }

    /// Insert-if-absent. Returns true when the address was new.
    pub fn insert(&mut self, address: PageAddress) -> bool {
        if !self.known.insert(address.clone()) {
            return false;
        }
        self.order.push(address.clone());
        self.pending.push_back(address);
        true
    }

    /// Earliest-inserted address not yet visited.
    pub fn next_unvisited(&self) -> Option<&PageAddress> {
        self.pending.front()
    }

    pub fn mark_visited(&mut self, address: &PageAddress) {
        if !self.known.contains(address) || !self.visited.insert(address.clone()) {
            return;
        }
        if self.pending.front() == Some(address) {
            self.pending.pop_front();
        } else {
            self.pending.retain(|pending| pending != address);
        }
    }

    pub fn has_unvisited(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn contains(&self, address: &PageAddress) -> bool {
        self.known.contains(address)
    }

    pub fn is_visited(&self, address: &PageAddress) -> bool {
        self.visited.contains(address)
    }

    /// Every known address in insertion order, with its visited flag.
    pub fn entries(&self) -> impl Iterator<Item = (&PageAddress, bool)> {
        self.order
            .iter()
            .map(|address| (address, self.visited.contains(address)))
    }

    pub fn visited(&self) -> impl Iterator<Item = &PageAddress> {
        self.order.iter().filter(|a| self.visited.contains(*a))
    }

    pub fn pending(&self) -> impl Iterator<Item = &PageAddress> {
        self.pending.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
