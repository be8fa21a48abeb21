//! Error and result types for capture export.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced while encoding or writing a screenshot.
#[derive(Debug, Error)]
pub enum Error {
    /// PNG encoding failed.
    #[error("png encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
    /// The output file could not be created or written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Destination that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Convenience result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;
