//! Per-node edge table: Robin-Hood open addressing over prime capacities.
//!
//! Slots are keyed by the first byte of the edge label
//! (`home = (byte - b'a') % capacity`), so only labels starting with an
//! ASCII lowercase letter can be stored. Growth walks a fixed prime ladder
//! and stops at the last rung; with at most 26 distinct first letters per
//! node the last rung (29) always keeps a free slot.

use log::{debug, warn};

use crate::error::{Result, TrieError};
use crate::node::TrieNode;

// =============================================================================
// Configuration
// =============================================================================

/// Capacity ladder. The table starts at the first prime.
pub const PRIMES: [usize; 6] = [3, 7, 11, 17, 23, 29];

/// Grow once `(len + 1) / capacity` would exceed `LOAD_NUM / LOAD_DEN`.
const LOAD_NUM: usize = 9;
const LOAD_DEN: usize = 10;

#[inline]
fn home_slot(first: u8, capacity: usize) -> usize {
    debug_assert!(first.is_ascii_lowercase());
    (first - b'a') as usize % capacity
}

// =============================================================================
// Edge
// =============================================================================

/// A labelled arc from a node to the child it owns.
#[derive(Clone, Debug)]
pub struct Edge {
    pub(crate) label: String,
    pub(crate) child: Box<TrieNode>,
}

impl Edge {
    pub(crate) fn new(label: impl Into<String>, child: TrieNode) -> Self {
        Self::boxed(label.into(), Box::new(child))
    }

    pub(crate) fn boxed(label: String, child: Box<TrieNode>) -> Self {
        Self { label, child }
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// First character of the label, `None` only for an unlabelled edge.
    #[inline]
    pub fn first_char(&self) -> Option<char> {
        self.label.bytes().next().map(char::from)
    }

    #[inline]
    pub fn child(&self) -> &TrieNode {
        &self.child
    }

    #[inline]
    pub(crate) fn child_mut(&mut self) -> &mut TrieNode {
        &mut self.child
    }

    #[inline]
    fn first_byte(&self) -> u8 {
        self.label.as_bytes()[0]
    }
}

// =============================================================================
// EdgeTable
// =============================================================================

/// Open-addressing table of the outgoing edges of one node.
#[derive(Clone, Debug)]
pub struct EdgeTable {
    slots: Vec<Option<Edge>>,
    /// Index of the current capacity in [`PRIMES`].
    rung: usize,
    len: usize,
    /// Largest distance from home of any stored edge.
    max_probe: usize,
}

impl EdgeTable {
    pub fn new() -> Self {
        Self::with_rung(0)
    }

    fn with_rung(rung: usize) -> Self {
        let mut slots = Vec::with_capacity(PRIMES[rung]);
        slots.resize_with(PRIMES[rung], || None);
        Self {
            slots,
            rung,
            len: 0,
            max_probe: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn max_probe_length(&self) -> usize {
        self.max_probe
    }

    /// Insert an edge.
    ///
    /// Returns `Ok(false)` without touching the table when an edge with the
    /// same label is already stored.
    pub(crate) fn insert(&mut self, edge: Edge) -> Result<bool> {
        let Some(&first) = edge.label.as_bytes().first() else {
            return Err(TrieError::EmptyLabel);
        };
        if !first.is_ascii_lowercase() {
            return Err(TrieError::invalid_character(
                edge.label.clone(),
                char::from(first),
            ));
        }
        if self.contains_label(&edge.label) {
            return Ok(false);
        }

        if (self.len + 1) * LOAD_DEN > self.capacity() * LOAD_NUM {
            self.grow();
        }
        if self.len == self.capacity() {
            return Err(TrieError::TableFull {
                capacity: self.capacity(),
            });
        }

        self.place(edge);
        Ok(true)
    }

    /// Robin-Hood placement. The carried edge steals any slot whose resident
    /// sits closer to its own home than the carried edge does.
    fn place(&mut self, mut edge: Edge) {
        let capacity = self.capacity();
        let mut idx = home_slot(edge.first_byte(), capacity);
        let mut dist = 0usize;

        loop {
            let slot = &mut self.slots[idx];
            match slot {
                None => {
                    *slot = Some(edge);
                    self.len += 1;
                    self.max_probe = self.max_probe.max(dist);
                    return;
                }
                Some(resident) => {
                    let resident_home = home_slot(resident.first_byte(), capacity);
                    let resident_dist = (idx + capacity - resident_home) % capacity;
                    if dist > resident_dist {
                        std::mem::swap(resident, &mut edge);
                        // The stolen slot now holds an edge `dist` away from home.
                        self.max_probe = self.max_probe.max(dist);
                        dist = resident_dist;
                    }
                }
            }
            idx = (idx + 1) % capacity;
            dist += 1;
        }
    }

    fn grow(&mut self) {
        let next = self.rung + 1;
        if next >= PRIMES.len() {
            warn!(
                "edge table at maximum capacity {} with {} edges; probes will lengthen",
                self.capacity(),
                self.len
            );
            return;
        }

        debug!(
            "edge table growing {} -> {} slots ({} edges)",
            PRIMES[self.rung], PRIMES[next], self.len
        );
        let old = std::mem::replace(self, Self::with_rung(next));
        for edge in old.slots.into_iter().flatten() {
            self.place(edge);
        }
    }

    /// Exact-label lookup bounded by the longest probe sequence ever used.
    pub fn contains_label(&self, label: &str) -> bool {
        self.find_label(label).is_some()
    }

    fn find_label(&self, label: &str) -> Option<usize> {
        let first = *label.as_bytes().first()?;
        if !first.is_ascii_lowercase() {
            return None;
        }
        let capacity = self.capacity();
        let home = home_slot(first, capacity);
        for offset in 0..=self.max_probe {
            let idx = (home + offset) % capacity;
            match &self.slots[idx] {
                // Nothing is ever stored past an empty slot of its probe run.
                None => return None,
                Some(edge) if edge.label == label => return Some(idx),
                Some(_) => {}
            }
        }
        None
    }

    /// The edge whose label starts with `first`. Scans every slot.
    pub fn get(&self, first: u8) -> Option<&Edge> {
        self.slots
            .iter()
            .flatten()
            .find(|edge| edge.label.as_bytes().first() == Some(&first))
    }

    pub(crate) fn get_mut(&mut self, first: u8) -> Option<&mut Edge> {
        self.slots
            .iter_mut()
            .flatten()
            .find(|edge| edge.label.as_bytes().first() == Some(&first))
    }

    /// Occupied edges in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.slots.iter().flatten()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Edge> {
        self.slots.iter_mut().flatten()
    }

    /// Heap bytes owned directly by this table: the slot array, the labels
    /// and the boxed children (not their own tables).
    pub(crate) fn heap_bytes(&self) -> usize {
        self.slots.capacity() * std::mem::size_of::<Option<Edge>>()
            + self
                .iter()
                .map(|edge| edge.label.capacity() + std::mem::size_of::<TrieNode>())
                .sum::<usize>()
    }
}

impl Default for EdgeTable {
    fn default() -> Self {
        Self::new()
    }
}
