//! Error types for verse lookup and reveal.

use thiserror::Error;

/// Errors produced while fetching and revealing a verse
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport-level failure reaching the content API
    #[error("Network error: {0}")]
    Network(String),

    /// The endpoint answered without a verse payload
    #[error("Empty response for chapter {chapter}, verse {verse}")]
    EmptyResponse {
        /// Requested chapter
        chapter: u32,
        /// Requested verse index
        verse: u32,
    },

    /// The payload did not match the verse schema (includes pairs that do not exist)
    #[error("Could not decode verse: {0}")]
    Decode(String),

    /// Every attempt in the retry budget failed or hit an already revealed verse
    #[error("No unrevealed verse found after {attempts} attempts")]
    Exhausted {
        /// Number of lookups performed
        attempts: u32,
    },

    /// The verse was accepted but the revealed set could not be written
    #[error("Failed to save revealed verses: {0}")]
    Storage(String),
}

impl FetchError {
    /// Whether this failure consumes one unit of retry budget and triggers a fresh attempt
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::EmptyResponse { .. } | Self::Decode(_)
        )
    }
}
