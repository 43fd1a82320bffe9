//! Error type for trie mutation.
//!
//! Queries never fail: a missing prefix is reported through `Option`,
//! an empty `Vec` or a sentinel value. Only mutation can be rejected.

use thiserror::Error;

/// Errors raised while inserting words or edges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrieError {
    /// The word contains a character the edge tables cannot hash.
    #[error("invalid character {ch:?} in {word:?}: only ASCII letters are accepted")]
    InvalidCharacter {
        /// The offending word, after lowercasing
        word: String,
        /// First character outside `a..=z`
        ch: char,
    },

    /// An edge was handed over without a label.
    #[error("edge label must not be empty")]
    EmptyLabel,

    /// The edge table is at its largest capacity and has no free slot.
    #[error("edge table full at capacity {capacity}")]
    TableFull {
        /// Capacity of the exhausted table
        capacity: usize,
    },
}

impl TrieError {
    /// Create an invalid character error
    pub fn invalid_character<S: Into<String>>(word: S, ch: char) -> Self {
        Self::InvalidCharacter {
            word: word.into(),
            ch,
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, TrieError>;
