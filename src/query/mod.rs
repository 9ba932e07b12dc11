//! Locstash query engine
//!
//! Filtering, sorting, pagination, distance annotation, and statistical
//! grouping over the location collection:
//!
//! - **context**: The explicit query-context object (filter/sort/page)
//! - **engine**: The query pipeline and breakdown aggregations
//! - **error**: Error types
//!
//! # Execution Pipeline
//!
//! ```text
//! Load → Annotate Distance → Filter (txt, min_rate) → Page → Sort
//! ```

pub mod context;
pub mod engine;
pub mod error;

// Re-export commonly used types
pub use context::{FilterBy, FilterPatch, QueryContext, SortBy, SortDir, SortKey, DEFAULT_PAGE_SIZE};
pub use engine::{QueryEngine, RateBreakdown, UpdatedBreakdown};
pub use error::{QueryError, QueryResult};
