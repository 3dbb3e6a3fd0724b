//! Error types for ordkv
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using OrdError
pub type Result<T> = std::result::Result<T, OrdError>;

/// Unified error type for ordkv operations
#[derive(Debug, Error)]
pub enum OrdError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    /// Persistence failed (disk full, permission denied, ...).
    /// Surfaced to the caller of the mutating operation, never retried.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("Store not found at {0} (create_if_missing is false)")]
    NotFound(PathBuf),

    #[error("Store already exists at {0} (error_if_exists is true)")]
    AlreadyExists(PathBuf),

    #[error("Store is closed")]
    Closed,

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Snapshot corruption detected: {0}")]
    Corrupt(String),

    #[error("Storage error: {0}")]
    Storage(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for OrdError {
    fn from(err: bincode::Error) -> Self {
        OrdError::Serialization(err.to_string())
    }
}
