//! Error taxonomy for ingestion and external services.
//!
//! Ingestion errors are scoped to a single file: the assembler reports them
//! and moves on to the next path. Service errors surface to the caller of a
//! query and end that query without an answer.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Per-file ingestion failures.
#[derive(Error, Debug)]
pub enum IngestError {
    /// File extension has no extractor
    #[error("unsupported format '{extension}' for {}", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// Extractor rejected the file contents
    #[error("failed to extract {}: {reason}", path.display())]
    ExtractionFailure { path: PathBuf, reason: String },

    /// File could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    pub fn extraction(path: &Path, reason: impl ToString) -> Self {
        IngestError::ExtractionFailure {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        IngestError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Path of the file the error belongs to.
    pub fn path(&self) -> &Path {
        match self {
            IngestError::UnsupportedFormat { path, .. }
            | IngestError::ExtractionFailure { path, .. }
            | IngestError::Io { path, .. } => path,
        }
    }
}

/// Failures of the embedding or generation backends.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("embedding service error: {0}")]
    Embedding(String),

    #[error("generation service error: {0}")]
    Generation(String),
}
