//! Locstash record store
//!
//! Durable persistence for location records:
//!
//! - **types**: Core data structures (Loc, Geo, Position)
//! - **medium**: Key-value medium trait with file and in-memory backends
//! - **records**: Collection-level CRUD (query/get/post/put/remove)
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//!   Loc → serialize collection → temp file → rename
//!
//! Read Path:
//!   load blob → deserialize collection → find/filter
//! ```
//!
//! Every operation is full-collection read-modify-write; the single-caller
//! execution model makes that sufficient.

pub mod error;
pub mod medium;
pub mod records;
pub mod types;

// Re-export commonly used types
pub use error::{StoreError, StoreResult};
pub use medium::{FileMedium, KeyValueMedium, MemoryMedium};
pub use records::{RecordStore, StoredRecord};
pub use types::{now_millis, Geo, Loc, Position, MAX_RATE, MIN_RATE};
