//! Tunables for [`CompressedTrie`](crate::CompressedTrie).

/// Configuration for a [`CompressedTrie`](crate::CompressedTrie).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Frames per chunk of the traversal stack used by subtree scans.
    /// Zero is treated as one.
    pub stack_chunk_size: usize,
}

impl Config {
    pub(crate) fn chunk_size(&self) -> usize {
        self.stack_chunk_size.max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stack_chunk_size: 50,
        }
    }
}
