//! Errors raised by the axiom store.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing an axiom document.
#[derive(Debug, Error)]
pub enum OntologyError {
    /// The document file could not be read or written.
    #[error("failed to access axiom document {path}: {source}")]
    Io {
        /// Path of the document.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON for the axiom schema.
    #[error("malformed axiom document: {0}")]
    Json(#[from] serde_json::Error),
}
