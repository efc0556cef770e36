//! Error types for persistence, uploads and wizard mutations

use std::path::PathBuf;
use thiserror::Error;

/// Failures reading or writing the local snapshot store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access snapshot at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Reasons a document is rejected before it reaches the upload tracker
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("File size should not exceed {}MB", .limit / (1024 * 1024))]
    TooLarge { size: u64, limit: u64 },
    #[error("Unsupported file type '{0}'. Please choose a PDF, JPG or PNG file")]
    UnsupportedType(String),
    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Rejected mutations of the reserved loan parameters
#[derive(Debug, Error, PartialEq)]
pub enum WizardError {
    #[error("{field} must be {requirement}")]
    InvalidValue {
        field: &'static str,
        requirement: &'static str,
    },
}
