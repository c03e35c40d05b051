//! Custom error types for checkwriter
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for checkwriter operations
#[derive(Error, Debug)]
pub enum CheckwriterError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models and pending items
    ///
    /// In the batch pipeline these cause the item to be skipped silently;
    /// they never pause the batch and never count against `failed`.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Print adapter failures (device offline, dialog cancelled, bad path)
    #[error("Print error: {0}")]
    Print(String),

    /// Batch processing errors
    #[error("Batch error: {0}")]
    Batch(String),

    /// Import errors (batch queue files)
    #[error("Import error: {0}")]
    Import(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CheckwriterError {
    /// Create a "not found" error for ledgers
    pub fn ledger_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Ledger",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for CheckwriterError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CheckwriterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for checkwriter operations
pub type CheckwriterResult<T> = Result<T, CheckwriterError>;
