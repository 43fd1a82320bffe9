//! # radix-suggest
//!
//! An in-memory autocomplete engine on a compressed trie (radix tree).
//!
//! Words are stored lowercased along labelled edges; every word node carries
//! an importance counter that the ingestion side bumps as it sees the word in
//! text. Queries resolve the node for a prefix and scan its subtree:
//! top-k suggestions, average importance, and next-letter prediction.
//!
//! ## Example
//!
//! ```rust
//! use radix_suggest::{CompressedTrie, WordFrequency};
//!
//! let mut trie = CompressedTrie::new();
//! for word in ["apple", "application", "appetite"] {
//!     trie.insert(word).unwrap();
//! }
//! trie.node_mut("apple").unwrap().add_importance(5);
//! trie.node_mut("appetite").unwrap().add_importance(7);
//!
//! assert!(trie.search("APPLE"));
//! assert_eq!(
//!     trie.top_k("app", 2),
//!     vec![WordFrequency::new("appetite", 7), WordFrequency::new("apple", 5)]
//! );
//! assert_eq!(trie.predict_next_letter("app"), Some('e'));
//! ```

pub mod config;
pub mod edge_table;
pub mod error;
pub mod heap;
pub mod node;
pub mod sort;
pub mod stack;

pub use config::Config;
pub use edge_table::{Edge, EdgeTable};
pub use error::{Result, TrieError};
pub use heap::{BoundedMinHeap, WordFrequency};
pub use node::TrieNode;
pub use stack::ChunkedStack;

use log::trace;

/// Returned by [`CompressedTrie::average_frequency`] for a prefix that can
/// never be stored (characters outside `a..=z`).
pub const INVALID_AVERAGE: f64 = -1.0;

// =============================================================================
// Prefix resolution
// =============================================================================

#[inline]
fn common_prefix_len(a: &str, b: &str) -> usize {
    a.bytes().zip(b.bytes()).take_while(|(x, y)| x == y).count()
}

fn first_invalid_char(word: &str) -> Option<char> {
    word.chars().find(|c| !c.is_ascii_lowercase())
}

/// Where a prefix ends inside the trie.
enum Position<'a> {
    /// Exactly on a node.
    Node(&'a TrieNode),
    /// Strictly inside `edge`'s label, after `offset` bytes of it.
    InsideEdge { edge: &'a Edge, offset: usize },
}

struct Located<'a> {
    position: Position<'a>,
    /// Full label path from the root to the anchor node. For a prefix ending
    /// inside an edge this runs to the end of that edge.
    path: String,
}

impl<'a> Located<'a> {
    /// The node standing for everything under the prefix.
    fn anchor(&self) -> &'a TrieNode {
        match self.position {
            Position::Node(node) => node,
            Position::InsideEdge { edge, .. } => edge.child(),
        }
    }
}

// =============================================================================
// CompressedTrie
// =============================================================================

/// Compressed trie of lowercase ASCII words with per-word importance.
///
/// Outgoing edges of a node start with pairwise distinct letters, and the
/// labels along a root-to-node path spell the string the node represents.
/// Nodes are never removed.
#[derive(Clone)]
pub struct CompressedTrie {
    root: TrieNode,
    len: usize,
    config: Config,
}

impl CompressedTrie {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            root: TrieNode::new(),
            len: 0,
            config,
        }
    }

    /// Number of distinct words stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Insert `word`, lowercased.
    ///
    /// Returns `Ok(true)` if the word was new. An empty word is ignored.
    /// Words with characters outside ASCII letters are rejected before the
    /// trie is touched.
    pub fn insert(&mut self, word: &str) -> Result<bool> {
        if word.is_empty() {
            return Ok(false);
        }
        let word = word.to_ascii_lowercase();
        if let Some(ch) = first_invalid_char(&word) {
            trace!("rejecting {:?}: invalid character {:?}", word, ch);
            return Err(TrieError::invalid_character(word, ch));
        }

        let added = Self::insert_at(&mut self.root, &word)?;
        if added {
            self.len += 1;
        }
        Ok(added)
    }

    fn insert_at(node: &mut TrieNode, word: &str) -> Result<bool> {
        let Some(&first) = word.as_bytes().first() else {
            return Ok(node.mark_end_of_word());
        };

        let Some(edge) = node.edge_at_mut(first) else {
            node.insert_edge(Edge::new(word, TrieNode::word_end()))?;
            return Ok(true);
        };

        let label_len = edge.label.len();
        let common = common_prefix_len(&edge.label, word);
        debug_assert!(common > 0);

        if common == label_len {
            if common == word.len() {
                return Ok(edge.child.mark_end_of_word());
            }
            return Self::insert_at(edge.child_mut(), &word[common..]);
        }

        trace!("splitting edge {:?} at {}", edge.label, common);
        let remainder = edge.label.split_off(common);

        if common == word.len() {
            // The word ends inside the label: the split point becomes the word.
            let old_child = std::mem::replace(&mut edge.child, Box::new(TrieNode::word_end()));
            edge.child.insert_edge(Edge::boxed(remainder, old_child))?;
            return Ok(true);
        }

        // Word and label diverge: the split point branches in two.
        let old_child = std::mem::replace(&mut edge.child, Box::new(TrieNode::new()));
        edge.child.insert_edge(Edge::boxed(remainder, old_child))?;
        edge.child
            .insert_edge(Edge::new(&word[common..], TrieNode::word_end()))?;
        Ok(true)
    }

    /// Exact, case-insensitive membership.
    pub fn search(&self, word: &str) -> bool {
        let word = word.to_ascii_lowercase();
        matches!(
            self.locate(&word),
            Some(Located { position: Position::Node(node), .. }) if node.is_end_of_word()
        )
    }

    fn locate(&self, prefix: &str) -> Option<Located<'_>> {
        let mut node = &self.root;
        let mut rest = prefix;
        let mut path = String::with_capacity(prefix.len());

        loop {
            let Some(&first) = rest.as_bytes().first() else {
                return Some(Located {
                    position: Position::Node(node),
                    path,
                });
            };
            let edge = node.edge_at(first)?;
            let label = edge.label();
            let common = common_prefix_len(label, rest);

            if common == rest.len() {
                path.push_str(label);
                let position = if common == label.len() {
                    Position::Node(edge.child())
                } else {
                    Position::InsideEdge {
                        edge,
                        offset: common,
                    }
                };
                return Some(Located { position, path });
            }
            if common < label.len() {
                return None;
            }

            path.push_str(label);
            rest = &rest[common..];
            node = edge.child();
        }
    }

    /// The anchor node for `prefix`.
    ///
    /// A prefix ending inside an edge label resolves to that edge's child.
    pub fn node(&self, prefix: &str) -> Option<&TrieNode> {
        let prefix = prefix.to_ascii_lowercase();
        self.locate(&prefix).map(|located| located.anchor())
    }

    /// Mutable anchor node for `prefix`, the handle used to bump importance.
    ///
    /// Resolution is the same as [`node`](Self::node), so for a prefix that
    /// is not itself a word the returned node belongs to a longer string.
    ///
    /// The handle can only touch importance; edges stay crate-private:
    ///
    /// ```compile_fail
    /// use radix_suggest::{CompressedTrie, Edge, TrieNode};
    ///
    /// let mut trie = CompressedTrie::new();
    /// trie.insert("apple").unwrap();
    /// let node = trie.node_mut("appl").unwrap();
    /// node.insert_edge(Edge::new("ex", TrieNode::new())).unwrap();
    /// ```
    pub fn node_mut(&mut self, prefix: &str) -> Option<&mut TrieNode> {
        let prefix = prefix.to_ascii_lowercase();
        self.descend_mut(&prefix, true)
    }

    fn descend_mut(&mut self, prefix: &str, inside_edge: bool) -> Option<&mut TrieNode> {
        let mut node = &mut self.root;
        let mut rest = prefix;

        loop {
            let Some(&first) = rest.as_bytes().first() else {
                return Some(node);
            };
            let edge = node.edge_at_mut(first)?;
            let common = common_prefix_len(&edge.label, rest);

            if common == rest.len() {
                if common == edge.label.len() || inside_edge {
                    return Some(edge.child_mut());
                }
                return None;
            }
            if common < edge.label.len() {
                return None;
            }

            rest = &rest[common..];
            node = edge.child_mut();
        }
    }

    /// Bump the importance of `word` if it is stored. Returns whether it was.
    pub fn record_occurrence(&mut self, word: &str) -> bool {
        let word = word.to_ascii_lowercase();
        match self.descend_mut(&word, false) {
            Some(node) if node.is_end_of_word() => {
                node.increment_importance();
                true
            }
            _ => false,
        }
    }

    /// Up to `k` words under `prefix`, by descending importance with ties
    /// in ascending word order.
    pub fn top_k(&self, prefix: &str, k: usize) -> Vec<WordFrequency> {
        if k == 0 {
            return Vec::new();
        }
        let prefix = prefix.to_ascii_lowercase();
        let Some(located) = self.locate(&prefix) else {
            return Vec::new();
        };

        let mut heap = BoundedMinHeap::new(k);
        for (word, importance) in self.iter_from(located.anchor(), located.path) {
            heap.offer(WordFrequency::new(word, importance));
        }

        let mut ranked = heap.into_vec();
        sort::sort_descending(&mut ranked);
        ranked
    }

    /// Mean importance of the words under `prefix`.
    ///
    /// `0.0` when nothing matches, which is indistinguishable from a subtree
    /// whose words all have zero importance; use
    /// [`average_frequency_checked`](Self::average_frequency_checked) to tell
    /// them apart. [`INVALID_AVERAGE`] for a prefix that cannot be stored.
    pub fn average_frequency(&self, prefix: &str) -> f64 {
        let prefix = prefix.to_ascii_lowercase();
        if let Some(ch) = first_invalid_char(&prefix) {
            trace!("average of {:?}: invalid character {:?}", prefix, ch);
            return INVALID_AVERAGE;
        }
        self.average_frequency_checked(&prefix).unwrap_or(0.0)
    }

    /// `None` when no node matches `prefix`.
    pub fn average_frequency_checked(&self, prefix: &str) -> Option<f64> {
        let prefix = prefix.to_ascii_lowercase();
        let located = self.locate(&prefix)?;
        Some(self.subtree_average(located.anchor()))
    }

    /// The most promising next letter after `prefix`.
    ///
    /// At a node, every outgoing edge is scored by the mean importance of
    /// its subtree and the first edge (in table order) with the highest
    /// score wins. Inside an edge label the next label character is the only
    /// continuation.
    pub fn predict_next_letter(&self, prefix: &str) -> Option<char> {
        let prefix = prefix.to_ascii_lowercase();
        let located = self.locate(&prefix)?;

        match located.position {
            Position::InsideEdge { edge, offset } => {
                edge.label().as_bytes().get(offset).copied().map(char::from)
            }
            Position::Node(node) => {
                let mut best = None;
                let mut best_avg = -1.0;
                for edge in node.edges() {
                    let avg = self.subtree_average(edge.child());
                    if avg > best_avg {
                        best_avg = avg;
                        best = edge.first_char();
                    }
                }
                best
            }
        }
    }

    fn subtree_average(&self, start: &TrieNode) -> f64 {
        let mut total: u128 = 0;
        let mut count: u64 = 0;

        let mut stack = ChunkedStack::new(self.config.chunk_size());
        stack.push(start);
        while let Some(node) = stack.pop() {
            if node.is_end_of_word() {
                total += u128::from(node.importance());
                count += 1;
            }
            for edge in node.edges() {
                stack.push(edge.child());
            }
        }

        if count == 0 {
            return 0.0;
        }
        total as f64 / count as f64
    }

    /// All stored words with their importance, in traversal order.
    pub fn iter(&self) -> Iter<'_> {
        self.iter_from(&self.root, String::new())
    }

    fn iter_from<'a>(&self, start: &'a TrieNode, path: String) -> Iter<'a> {
        let mut stack = ChunkedStack::new(self.config.chunk_size());
        stack.push((start, path));
        Iter { stack }
    }

    /// Approximate heap footprint in bytes: node tables, labels and boxed
    /// children.
    pub fn memory_usage(&self) -> usize {
        let mut bytes = std::mem::size_of::<Self>();
        let mut stack = ChunkedStack::new(self.config.chunk_size());
        stack.push(&self.root);
        while let Some(node) = stack.pop() {
            bytes += node.edge_table().heap_bytes();
            for edge in node.edges() {
                stack.push(edge.child());
            }
        }
        bytes
    }

    /// Release spare label capacity left over from edge splits.
    pub fn shrink_to_fit(&mut self) {
        let mut stack: ChunkedStack<&mut TrieNode> = ChunkedStack::new(self.config.chunk_size());
        stack.push(&mut self.root);
        while let Some(node) = stack.pop() {
            for edge in node.edges_mut() {
                edge.label.shrink_to_fit();
                stack.push(edge.child_mut());
            }
        }
    }
}

impl Default for CompressedTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CompressedTrie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over `(word, importance)` pairs of a subtree.
pub struct Iter<'a> {
    stack: ChunkedStack<(&'a TrieNode, String)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (String, u64);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, word)) = self.stack.pop() {
            for edge in node.edges() {
                let mut next = String::with_capacity(word.len() + edge.label().len());
                next.push_str(&word);
                next.push_str(edge.label());
                self.stack.push((edge.child(), next));
            }
            if node.is_end_of_word() {
                return Some((word, node.importance()));
            }
        }
        None
    }
}


#[cfg(test)]
mod proptests;
