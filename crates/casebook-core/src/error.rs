//! Error types for Casebook core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages and exit codes.

use thiserror::Error;

use crate::store::Collection;

/// Result type alias for Casebook operations.
pub type Result<T> = std::result::Result<T, CasebookError>;

/// Core error type for Casebook operations.
#[derive(Debug, Error)]
pub enum CasebookError {
    /// Missing or invalid required field
    #[error("Validation error: {0}")]
    Validation(String),

    /// A perpetrator file with the same name already exists
    #[error("Duplicate name: a perpetrator file named '{0}' already exists")]
    DuplicateName(String),

    /// A catalog entry with the same key already exists
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A document exists on disk but could not be parsed
    #[error("Corrupt data in {collection}: {message}")]
    CorruptData {
        collection: Collection,
        message: String,
    },

    /// Writing or reading a document failed
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl CasebookError {
    /// True for errors caused by user input (no state was changed).
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CasebookError::Validation(_)
                | CasebookError::DuplicateName(_)
                | CasebookError::Duplicate(_)
        )
    }
}

impl From<std::io::Error> for CasebookError {
    fn from(err: std::io::Error) -> Self {
        CasebookError::Persistence(err.to_string())
    }
}
