//! Error handling for the Bambufy pre-print processor.
//!
//! Fatal conditions (an unreadable input file, a malformed numeric field, a
//! failed swap of the rewritten file) propagate to the binary and terminate
//! the run with a non-zero status. Side-channel write failures are handled
//! locally at the call site and never surface through these types.
//!
//! All error types use `thiserror` for ergonomic error handling.

use std::io;
use thiserror::Error;

/// Errors that can occur while processing a G-code file.
#[derive(Error, Debug)]
pub enum PreprintError {
    /// A field that must be numeric failed to parse.
    #[error("Invalid numeric value '{token}' in {context}")]
    InvalidNumber {
        /// The token that failed to parse.
        token: String,
        /// The metadata field or G-code word the token belongs to.
        context: String,
    },

    /// The rewritten file could not replace the original.
    ///
    /// The original file is untouched when this occurs.
    #[error("Failed to replace {path}: {reason}")]
    ReplaceFailed {
        /// Path of the file being rewritten.
        path: String,
        /// The reason the atomic swap failed.
        reason: String,
    },

    /// I/O error while reading or writing the target file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for pre-print operations.
pub type Result<T> = std::result::Result<T, PreprintError>;
