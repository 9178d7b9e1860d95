//! Graft error types.
//!
//! `GraftError` covers hard failures only: I/O, encoding, malformed input
//! files, and span bounds that indicate a caller bug. Expected per-proposal
//! conditions (snippet not found, ambiguous, overlapping) are represented as
//! [`crate::plan::FailureReason`] data inside the apply outcome, never as
//! errors.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for graft operations.
#[derive(Error, Debug)]
pub enum GraftError {
    /// I/O error during file operations.
    #[error("I/O error for path {path}: {source}")]
    Io {
        /// The file path that caused the I/O error.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid UTF-8.
    #[error("File {path} is not valid UTF-8")]
    InvalidEncoding {
        /// The file that failed to decode.
        path: PathBuf,
    },

    /// Byte span is out of bounds or off a character boundary.
    #[error("Invalid span ({start}, {end}) for text of {len} bytes")]
    InvalidSpan {
        /// Start byte offset.
        start: usize,
        /// End byte offset.
        end: usize,
        /// Length of the text the span was applied to.
        len: usize,
    },

    /// Proposal file failed schema validation.
    #[error("Invalid proposal file: {message}")]
    InvalidProposalFile {
        /// The schema validation error message.
        message: String,
    },

    /// Checkpoint creation or restore failed.
    #[error("Checkpoint error: {message}")]
    Checkpoint {
        /// What went wrong.
        message: String,
    },

    /// Generic error with context.
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for GraftError {
    fn from(err: std::io::Error) -> Self {
        GraftError::Io {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

/// Result type alias for graft operations.
pub type Result<T> = std::result::Result<T, GraftError>;
