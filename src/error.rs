//! Error types for Dishfinder

use thiserror::Error;

/// Result type alias for Dishfinder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Dishfinder
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("catalog build failed at line {line}: {reason}")]
    Catalog { line: usize, reason: String },

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check whether the error is attributable to the caller.
    ///
    /// User-caused errors are reported back with their message; everything
    /// else surfaces to a peer as a generic failure only.
    pub fn is_user_caused(&self) -> bool {
        matches!(self, Error::InvalidQuery(_))
    }
}
