//! Error types for dsregistry
//!
//! Provides a unified error type for all registry operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using RegistryError
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Unified error type for registry operations
#[derive(Debug, Error)]
pub enum RegistryError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Root Directory Errors
    // -------------------------------------------------------------------------
    #[error("Provided path '{}' is not a valid directory", .0.display())]
    InvalidRootDirectory(PathBuf),

    // -------------------------------------------------------------------------
    // Input Errors
    // -------------------------------------------------------------------------
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // -------------------------------------------------------------------------
    // Record Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Data source {0} does not exist")]
    NotFound(u64),

    #[error("Metadata file not found for data source {0}")]
    MetadataMissing(u64),

    #[error("Corrupt metadata for data source {id}: {reason}")]
    CorruptRecord { id: u64, reason: String },

    // -------------------------------------------------------------------------
    // ID Space Errors
    // -------------------------------------------------------------------------
    #[error("Directory name '{0}' is numeric but does not fit a data source ID")]
    IdOutOfRange(String),

    #[error("No data source IDs left after {last}")]
    IdSpaceExhausted { last: u64 },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Serialization(err.to_string())
    }
}
