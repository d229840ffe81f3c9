//! Error types for filebase operations
//!
//! Every failure here is non-fatal to the process: the shell prints the
//! message and re-displays the prompt. Operations that fail leave the
//! in-memory index unchanged, except persistence failures, which keep the
//! in-memory state and are reported through `tracing` by the engine.

use std::io;
use thiserror::Error;

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by index mutation and query operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A document could not be opened for reading. The index is not updated.
    #[error("cannot open {path}: index not updated")]
    DocumentUnreadable {
        /// Name of the document as given by the caller.
        path: String,
        #[source]
        source: io::Error,
    },

    /// Add of a name that is already in the document table.
    #[error("{0} is already in the filebase")]
    DuplicateDocument(String),

    /// Remove of a name that is not in the document table.
    #[error("{0} is not in the filebase")]
    UnknownDocument(String),

    /// Remove with a document id outside the table. No document is removed.
    #[error("illegal document id {0}: no document removed")]
    IdOutOfRange(usize),

    /// Remove against an empty document table.
    #[error("filebase empty")]
    EmptyFilebase,

    /// The transient query document could not be written; the search is
    /// abandoned before the index is touched.
    #[error("could not create temporary search document: unable to search")]
    TransientDocument(#[source] io::Error),

    /// Any other I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}
