//! Error taxonomy for Trellis operations.
//!
//! All variants are local, synchronous caller errors; the core never retries.
//! Absence (missing key on search/delete, missing checkpoint id) is a normal
//! `None`/`false` result, not an error; callers branch on it.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrieError {
    /// Empty key on any keyed operation.
    #[error("key cannot be empty")]
    InvalidKey,

    /// Null payload on insert.
    #[error("value cannot be null")]
    InvalidValue,

    /// Out-of-range argument (zero autocomplete limit, zero checkpoint capacity).
    #[error("invalid argument: {detail}")]
    InvalidArgument { detail: String },

    /// Strict bulk delete found a key missing during the precheck.
    #[error("key not found: '{key}'")]
    KeyNotFound { key: String },
}

impl TrieError {
    pub fn invalid_argument(detail: impl Into<String>) -> Self {
        TrieError::InvalidArgument {
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrieError>;
