//! Query Engine
//!
//! Executes location queries against the record store:
//! 1. Load the full collection
//! 2. Annotate per-record distance from the reference position
//! 3. Filter by text and minimum rating
//! 4. Optional pagination slice
//! 5. Stable sort by exactly one key
//!
//! plus the two statistical groupings that drive the proportional
//! breakdown charts (by rating bucket, by update recency).

use crate::geo::{self, DistanceUnit};
use crate::query::context::{compile_pattern, QueryContext, SortBy, SortDir, SortKey};
use crate::query::error::QueryResult;
use crate::store::types::{Loc, Position};
use crate::store::RecordStore;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Record counts partitioned by rating bucket
///
/// `rate > 4` is high, `3 <= rate <= 4` is medium, `rate < 3` is low.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct RateBreakdown {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub total: usize,
}

/// Record counts partitioned by update recency (UTC date portion)
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct UpdatedBreakdown {
    pub today: usize,
    pub past: usize,
    pub never: usize,
    pub total: usize,
}

/// Query engine bound to one collection in a record store
#[derive(Clone)]
pub struct QueryEngine {
    store: RecordStore,
    collection: String,
    unit: DistanceUnit,
}

impl QueryEngine {
    pub fn new(store: RecordStore, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            unit: DistanceUnit::default(),
        }
    }

    /// Builder: report distances in this unit
    pub fn unit(mut self, unit: DistanceUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Run the full query pipeline under the given context
    pub async fn query(
        &self,
        ctx: &QueryContext,
        reference: Option<Position>,
    ) -> QueryResult<Vec<Loc>> {
        let mut locs: Vec<Loc> = self.store.query(&self.collection).await?;
        let loaded = locs.len();

        annotate_distance(&mut locs, reference, self.unit);

        if !ctx.filter_by.txt.is_empty() {
            let pattern = compile_pattern(&ctx.filter_by.txt)?;
            locs.retain(|loc| pattern.is_match(&loc.name) || pattern.is_match(&loc.geo.address));
        }
        if ctx.filter_by.min_rate > 0 {
            let min_rate = ctx.filter_by.min_rate;
            locs.retain(|loc| loc.rate >= min_rate);
        }

        if let Some(page) = ctx.page {
            locs = page_slice(locs, page, ctx.page_size);
        }

        if let Some(sort_by) = ctx.sort_by {
            sort_locs(&mut locs, sort_by);
        }

        tracing::debug!(loaded, returned = locs.len(), "query executed");
        Ok(locs)
    }

    /// Count all records by rating bucket
    pub async fn count_by_rate(&self) -> QueryResult<RateBreakdown> {
        let locs: Vec<Loc> = self.store.query(&self.collection).await?;
        Ok(rate_breakdown(&locs))
    }

    /// Count all records by update recency, relative to the current day
    pub async fn count_by_updated(&self) -> QueryResult<UpdatedBreakdown> {
        let locs: Vec<Loc> = self.store.query(&self.collection).await?;
        Ok(updated_breakdown(&locs, Utc::now()))
    }
}

/// Annotate each record with its distance from the reference position.
/// An invalid or missing reference clears every distance.
pub fn annotate_distance(locs: &mut [Loc], reference: Option<Position>, unit: DistanceUnit) {
    let reference = reference.filter(Position::is_valid);
    for loc in locs {
        loc.distance = match reference {
            Some(from) if loc.geo.has_coords() => Some(geo::distance(from, loc.geo.position(), unit)),
            _ => None,
        };
    }
}

/// Slice out the given zero-based page; out-of-range pages are empty
fn page_slice(locs: Vec<Loc>, page: usize, page_size: usize) -> Vec<Loc> {
    locs.into_iter()
        .skip(page * page_size)
        .take(page_size)
        .collect()
}

/// Stable sort by one key; ties keep their original relative order
pub fn sort_locs(locs: &mut [Loc], sort_by: SortBy) {
    locs.sort_by(|a, b| {
        let ord = match sort_by.key {
            SortKey::Rate => a.rate.cmp(&b.rate),
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        match sort_by.dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    });
}

/// Partition records into low/medium/high rating buckets
pub fn rate_breakdown(locs: &[Loc]) -> RateBreakdown {
    let mut map = RateBreakdown {
        total: locs.len(),
        ..Default::default()
    };
    for loc in locs {
        if loc.rate > 4 {
            map.high += 1;
        } else if loc.rate >= 3 {
            map.medium += 1;
        } else {
            map.low += 1;
        }
    }
    map
}

/// Partition records by when they were last updated, comparing UTC date
/// portions (time of day stripped). A future `updated_at` counts as past:
/// clock skew gets no bucket of its own.
pub fn updated_breakdown(locs: &[Loc], now: DateTime<Utc>) -> UpdatedBreakdown {
    let today = now.date_naive();
    let mut map = UpdatedBreakdown {
        total: locs.len(),
        ..Default::default()
    };
    for loc in locs {
        match loc
            .updated_at
            .and_then(DateTime::<Utc>::from_timestamp_millis)
        {
            None => map.never += 1,
            Some(updated) if updated.date_naive() == today => map.today += 1,
            Some(_) => map.past += 1,
        }
    }
    map
}
