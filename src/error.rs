// In: src/error.rs

//! This module defines the single, unified error type for the entire symmap library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SymmapError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    /// The serialized mapping table violates the tiny grammar. The message
    /// carries the offending line number or token.
    #[error("Malformed mapping table: {0}")]
    Format(String),

    /// A caller asked for a namespace the table does not declare.
    #[error("Namespace '{namespace}' not found in mapping table (available: {available})")]
    NamespaceNotFound {
        namespace: String,
        available: String,
    },

    /// A transformation stage reported an unrecoverable error. The remaining
    /// chain is aborted and no cache entry is produced.
    #[error("Mapping stage '{stage}' failed: {source}")]
    Stage {
        stage: String,
        #[source]
        source: Box<SymmapError>,
    },

    #[error("Internal logic error (this is a bug): {0}")]
    Internal(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the underlying I/O subsystem (e.g., file not found).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An I/O failure carrying the path it happened on, so the caller can
    /// locate the faulty input without guessing.
    #[error("I/O error on {path}: {source}")]
    IoAt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An error from the Serde JSON library, typically while serializing a
    /// stage's parameter fingerprint.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl SymmapError {
    /// Attaches a path to a bare I/O error; other variants pass through untouched.
    pub(crate) fn at_path(self, path: &std::path::Path) -> Self {
        match self {
            SymmapError::Io(source) => SymmapError::IoAt {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        }
    }
}
