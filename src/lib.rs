//! # Locstash
//!
//! A location records engine: durable storage for pinned places with
//! ratings, plus the query/aggregation layer a locations manager needs.
//!
//! ## Features
//!
//! - **Durable record store**: Full-collection JSON write-back over a
//!   pluggable key-value medium (file-backed or in-memory)
//! - **Query pipeline**: text/rating filtering, stable sorting, optional
//!   pagination, per-record distance annotation
//! - **Statistics**: rating and update-recency breakdowns for
//!   proportional charts
//! - **Geo utilities**: haversine distance, short ids, relative time
//!
//! ## Modules
//!
//! - [`store`]: Record persistence (types, medium, collection CRUD)
//! - [`geo`]: Distance and id/time helpers
//! - [`query`]: Query context, pipeline, and breakdowns
//! - [`service`]: The orchestrating location service
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use locstash::service::LocService;
//! use locstash::store::{FileMedium, Position, RecordStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let medium = Arc::new(FileMedium::open("./locstash_data")?);
//!     let service = LocService::new(RecordStore::new(medium), "locs");
//!
//!     service.seed_demo_if_empty().await?;
//!
//!     // Query, annotated with distance from the user position
//!     let here = Position::new(32.0853, 34.7818);
//!     let locs = service.query(Some(here)).await?;
//!     println!("Found {} locations", locs.len());
//!
//!     // Aggregate statistics
//!     let by_rate = service.count_by_rate().await?;
//!     println!("{} highly rated", by_rate.high);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod geo;
pub mod query;
pub mod service;
pub mod store;

// Re-export top-level types for convenience
pub use store::{
    FileMedium, Geo, KeyValueMedium, Loc, MemoryMedium, Position, RecordStore, StoreError,
    StoreResult, StoredRecord,
};

pub use geo::{distance, elapsed_time, make_id, DistanceUnit};

pub use query::{
    FilterBy, FilterPatch, QueryContext, QueryEngine, QueryError, QueryResult, RateBreakdown,
    SortBy, SortDir, SortKey, UpdatedBreakdown,
};

pub use service::LocService;

pub use config::{Config, ConfigError, LoggingConfig, QueryConfig, StorageConfig};
