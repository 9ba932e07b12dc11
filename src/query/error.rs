//! Query engine error types

use crate::store::StoreError;
use thiserror::Error;

/// Errors that can occur while querying or mutating locations
#[derive(Error, Debug)]
pub enum QueryError {
    /// Store failures propagate unchanged
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Malformed input rejected at the service boundary
    /// (rate out of range, invalid filter pattern, non-finite coordinates)
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for query and service operations
pub type QueryResult<T> = Result<T, QueryError>;
