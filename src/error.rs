//! Error types for FlatKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using FlatError
pub type Result<T> = std::result::Result<T, FlatError>;

/// Unified error type for FlatKV operations
#[derive(Debug, Error)]
pub enum FlatError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // -------------------------------------------------------------------------
    // Format Errors
    // -------------------------------------------------------------------------
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FlatError {
    /// True for `DuplicateKey`
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, FlatError::DuplicateKey(_))
    }

    /// True for `NotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(self, FlatError::NotFound(_))
    }

    /// True for `MalformedRecord`
    pub fn is_malformed(&self) -> bool {
        matches!(self, FlatError::MalformedRecord(_))
    }
}
