//! Error types for cache operations.

use std::path::PathBuf;

/// Errors from cache store operations.
///
/// Reads are fail-safe and never return these: a missing, corrupt, or
/// unreadable entry is a miss. Writes propagate them so the compile
/// pipeline can surface a warning without losing the fresh artifact.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O failure while writing an artifact file.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A header serialization failure.
    #[error("cache serialization error: {reason}")]
    Serialization {
        /// Description of the failure.
        reason: String,
    },
}
