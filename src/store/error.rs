//! Record store error types
//!
//! Defines all errors that can surface from the persistence layer.

use thiserror::Error;

/// Errors that can occur in the record store
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record with the given id exists in the collection
    #[error("record not found: '{id}' in collection '{collection}'")]
    NotFound { collection: String, id: String },

    /// The underlying key-value medium is inaccessible
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The stored blob exists but cannot be parsed
    #[error("corrupt collection '{collection}': {error}")]
    Corrupt { collection: String, error: String },
}

impl StoreError {
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    pub fn corrupt(collection: impl Into<String>, error: impl ToString) -> Self {
        StoreError::Corrupt {
            collection: collection.into(),
            error: error.to_string(),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
