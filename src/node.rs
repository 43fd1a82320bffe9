//! Trie node: an edge table plus the word flag and its importance counter.

use crate::edge_table::{Edge, EdgeTable};
use crate::error::Result;

/// A node of the [`CompressedTrie`](crate::CompressedTrie).
///
/// The importance counter is owned by the ingestion side: the trie only
/// creates nodes with a zero counter and never lowers it.
#[derive(Clone, Debug, Default)]
pub struct TrieNode {
    edges: EdgeTable,
    end_of_word: bool,
    importance: u64,
}

impl TrieNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh node that terminates a word.
    pub(crate) fn word_end() -> Self {
        Self {
            end_of_word: true,
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_end_of_word(&self) -> bool {
        self.end_of_word
    }

    /// Returns `true` if the flag was not already set.
    pub(crate) fn mark_end_of_word(&mut self) -> bool {
        !std::mem::replace(&mut self.end_of_word, true)
    }

    #[inline]
    pub fn importance(&self) -> u64 {
        self.importance
    }

    pub fn increment_importance(&mut self) {
        self.add_importance(1);
    }

    pub fn add_importance(&mut self, amount: u64) {
        self.importance = self.importance.saturating_add(amount);
    }

    /// Attach an outgoing edge. Fails on an empty label.
    pub(crate) fn insert_edge(&mut self, edge: Edge) -> Result<bool> {
        self.edges.insert(edge)
    }

    /// The outgoing edge whose label starts with `c`.
    pub fn edge(&self, c: char) -> Option<&Edge> {
        u8::try_from(c).ok().and_then(|b| self.edges.get(b))
    }

    #[inline]
    pub(crate) fn edge_at(&self, first: u8) -> Option<&Edge> {
        self.edges.get(first)
    }

    #[inline]
    pub(crate) fn edge_at_mut(&mut self, first: u8) -> Option<&mut Edge> {
        self.edges.get_mut(first)
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub(crate) fn edges_mut(&mut self) -> impl Iterator<Item = &mut Edge> {
        self.edges.iter_mut()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge_table(&self) -> &EdgeTable {
        &self.edges
    }
}
