//! Location Service
//!
//! The orchestrator composing record store, geo utilities, and query
//! engine behind a single query/save/remove API. The service owns the
//! query context: callers mutate it through explicit setters and every
//! query call reads the current criteria.
//!
//! Execution model: one logical caller at a time. The context lock exists
//! only so the service can be shared through an `Arc`, not to arbitrate
//! concurrent writers.

use crate::geo;
use crate::query::context::{FilterBy, FilterPatch, QueryContext, SortBy};
use crate::query::engine::{QueryEngine, RateBreakdown, UpdatedBreakdown};
use crate::query::error::{QueryError, QueryResult};
use crate::store::types::{now_millis, Geo, Loc, Position, MAX_RATE, MIN_RATE};
use crate::store::RecordStore;
use tokio::sync::RwLock;

/// The locations manager service
pub struct LocService {
    store: RecordStore,
    engine: QueryEngine,
    collection: String,
    ctx: RwLock<QueryContext>,
}

impl LocService {
    pub fn new(store: RecordStore, collection: impl Into<String>) -> Self {
        let collection = collection.into();
        Self {
            engine: QueryEngine::new(store.clone(), collection.clone()),
            store,
            collection,
            ctx: RwLock::new(QueryContext::default()),
        }
    }

    /// Builder: report distances in this unit
    pub fn unit(mut self, unit: crate::geo::DistanceUnit) -> Self {
        self.engine = self.engine.unit(unit);
        self
    }

    /// Builder: records per page when pagination is on
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.ctx.get_mut().page_size = page_size;
        self
    }

    /// Query all locations under the current context, annotated with
    /// distance from `reference` when it is a valid position
    pub async fn query(&self, reference: Option<Position>) -> QueryResult<Vec<Loc>> {
        let ctx = self.ctx.read().await.clone();
        self.engine.query(&ctx, reference).await
    }

    /// Fetch a single location by id
    pub async fn get(&self, id: &str) -> QueryResult<Loc> {
        Ok(self.store.get(&self.collection, id).await?)
    }

    /// Persist a location record
    ///
    /// An empty id means creation: a new id is assigned, `created_at` is
    /// set to now, and `updated_at` stays unset. A non-empty id means
    /// update: `updated_at` is set to now and `created_at` is preserved.
    pub async fn save(&self, mut loc: Loc) -> QueryResult<Loc> {
        validate(&loc)?;

        if loc.is_saved() {
            loc.updated_at = Some(now_millis());
            let saved = self.store.put(&self.collection, loc).await?;
            tracing::info!(id = %saved.id, name = %saved.name, "location updated");
            Ok(saved)
        } else {
            loc.id = geo::make_id();
            loc.created_at = now_millis();
            loc.updated_at = None;
            let saved = self.store.post(&self.collection, loc).await?;
            tracing::info!(id = %saved.id, name = %saved.name, "location created");
            Ok(saved)
        }
    }

    /// Delete a location by id
    pub async fn remove(&self, id: &str) -> QueryResult<()> {
        self.store.remove::<Loc>(&self.collection, id).await?;
        tracing::info!(id, "location removed");
        Ok(())
    }

    /// Merge a partial filter update; returns the resulting filter
    pub async fn set_filter_by(&self, patch: FilterPatch) -> QueryResult<FilterBy> {
        self.ctx.write().await.apply_filter_patch(patch)
    }

    /// Replace the sort criterion wholesale
    pub async fn set_sort_by(&self, sort_by: Option<SortBy>) {
        self.ctx.write().await.set_sort_by(sort_by);
    }

    /// Switch pagination on (zero-based page index) or off
    pub async fn set_page(&self, page: Option<usize>) {
        self.ctx.write().await.page = page;
    }

    /// Snapshot of the current filter criteria
    pub async fn filter_by(&self) -> FilterBy {
        self.ctx.read().await.filter_by.clone()
    }

    /// Count all locations by rating bucket
    pub async fn count_by_rate(&self) -> QueryResult<RateBreakdown> {
        self.engine.count_by_rate().await
    }

    /// Count all locations by update recency
    pub async fn count_by_updated(&self) -> QueryResult<UpdatedBreakdown> {
        self.engine.count_by_updated().await
    }

    /// Seed the demo locations when the collection is empty
    ///
    /// Demo records get a random past `created_at` with `updated_at`
    /// equal to it, matching a freshly installed manager.
    pub async fn seed_demo_if_empty(&self) -> QueryResult<usize> {
        let existing: Vec<Loc> = self.store.query(&self.collection).await?;
        if !existing.is_empty() {
            return Ok(0);
        }

        let demos = demo_locs();
        let count = demos.len();
        self.store.replace_all(&self.collection, &demos).await?;
        tracing::info!(count, "seeded demo locations");
        Ok(count)
    }
}

/// Boundary validation: rating in range, coordinates finite
fn validate(loc: &Loc) -> QueryResult<()> {
    if !loc.rate_in_range() {
        return Err(QueryError::InvalidInput(format!(
            "rate must be {MIN_RATE}-{MAX_RATE}, got {}",
            loc.rate
        )));
    }
    if !loc.geo.has_coords() {
        return Err(QueryError::InvalidInput(format!(
            "geo coordinates must be finite numbers ({}, {})",
            loc.geo.lat, loc.geo.lng
        )));
    }
    Ok(())
}

/// The three demo locations a fresh store is seeded with
fn demo_locs() -> Vec<Loc> {
    let drafts = [
        (
            "Ben Gurion Airport",
            2,
            Geo::new("Ben Gurion Airport, 7015001, Israel", 32.0004465, 34.8706095, 12),
        ),
        (
            "Dekel Beach",
            4,
            Geo::new("Derekh Mitsrayim 1, Eilat, 88000, Israel", 29.5393848, 34.9457792, 15),
        ),
        (
            "Dahab, Egypt",
            5,
            Geo::new("Dahab, South Sinai, Egypt", 28.5096676, 34.5165187, 11),
        ),
    ];

    drafts
        .into_iter()
        .map(|(name, rate, geo)| {
            let mut loc = Loc::new(name, rate, geo);
            loc.id = geo::make_id();
            loc.created_at = random_past_millis();
            loc.updated_at = Some(loc.created_at);
            loc
        })
        .collect()
}

/// A pseudo-random timestamp within the last ~90 days
fn random_past_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as i64)
        .unwrap_or(0);
    let ninety_days = 90 * 86_400_000i64;
    now_millis() - (nanos * 8_999) % ninety_days
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryMedium, StoreError};
    use std::sync::Arc;

    fn service() -> LocService {
        LocService::new(RecordStore::new(Arc::new(MemoryMedium::new())), "locs")
    }

    fn draft(name: &str, rate: u8) -> Loc {
        Loc::new(name, rate, Geo::new(name, 28.5, 34.5, 11))
    }

    #[tokio::test]
    async fn test_save_then_get_round_trip() {
        let svc = service();
        let saved = svc.save(draft("Dahab, Egypt", 5)).await.unwrap();

        assert!(saved.is_saved());
        assert!(saved.created_at > 0);
        assert_eq!(saved.updated_at, None);

        let fetched = svc.get(&saved.id).await.unwrap();
        assert_eq!(fetched.name, saved.name);
        assert_eq!(fetched.rate, saved.rate);
        assert_eq!(fetched.geo, saved.geo);
        assert_eq!(fetched.created_at, saved.created_at);
    }

    #[tokio::test]
    async fn test_update_preserves_created_at() {
        let svc = service();
        let mut saved = svc.save(draft("Dekel Beach", 3)).await.unwrap();
        let created_at = saved.created_at;

        saved.rate = 4;
        let updated = svc.save(saved).await.unwrap();

        assert_eq!(updated.created_at, created_at);
        assert!(updated.updated_at.unwrap() >= created_at);
        assert_eq!(svc.get(&updated.id).await.unwrap().rate, 4);
    }

    #[tokio::test]
    async fn test_save_rejects_bad_input() {
        let svc = service();

        let res = svc.save(draft("zero stars", 0)).await;
        assert!(matches!(res, Err(QueryError::InvalidInput(_))));

        let res = svc.save(draft("six stars", 6)).await;
        assert!(matches!(res, Err(QueryError::InvalidInput(_))));

        let mut nan_geo = draft("nowhere", 3);
        nan_geo.geo.lat = f64::NAN;
        let res = svc.save(nan_geo).await;
        assert!(matches!(res, Err(QueryError::InvalidInput(_))));

        // Nothing was persisted by the rejected saves
        assert!(svc.query(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_is_not_found() {
        let svc = service();
        let res = svc.remove("nope").await;
        assert!(matches!(
            res,
            Err(QueryError::Store(StoreError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_remove_then_query() {
        let svc = service();
        let a = svc.save(draft("keep", 3)).await.unwrap();
        let b = svc.save(draft("drop", 3)).await.unwrap();

        svc.remove(&b.id).await.unwrap();

        let locs = svc.query(None).await.unwrap();
        assert_eq!(locs.len(), 1);
        assert_eq!(locs[0].id, a.id);
    }

    #[tokio::test]
    async fn test_seed_demo_once() {
        let svc = service();
        assert_eq!(svc.seed_demo_if_empty().await.unwrap(), 3);
        assert_eq!(svc.seed_demo_if_empty().await.unwrap(), 0);

        let locs = svc.query(None).await.unwrap();
        assert_eq!(locs.len(), 3);
        // Seeded records carry matching timestamps, so none count as updated
        assert!(locs.iter().all(|l| !l.was_updated()));

        let map = svc.count_by_rate().await.unwrap();
        assert_eq!((map.low, map.medium, map.high, map.total), (1, 1, 1, 3));
    }

    #[tokio::test]
    async fn test_filter_and_sort_through_service() {
        let svc = service();
        svc.seed_demo_if_empty().await.unwrap();

        let filter = svc
            .set_filter_by(FilterPatch {
                txt: Some("Dahab".into()),
                min_rate: None,
            })
            .await
            .unwrap();
        assert_eq!(filter.txt, "Dahab");

        let locs = svc.query(None).await.unwrap();
        assert_eq!(locs.len(), 1);
        assert_eq!(locs[0].name, "Dahab, Egypt");
    }

    #[tokio::test]
    async fn test_counts_sum_to_total() {
        let svc = service();
        svc.seed_demo_if_empty().await.unwrap();
        svc.save(draft("extra", 1)).await.unwrap();

        let by_rate = svc.count_by_rate().await.unwrap();
        assert_eq!(by_rate.low + by_rate.medium + by_rate.high, by_rate.total);
        assert_eq!(by_rate.total, 4);

        let by_updated = svc.count_by_updated().await.unwrap();
        assert_eq!(
            by_updated.today + by_updated.past + by_updated.never,
            by_updated.total
        );
        assert_eq!(by_updated.total, 4);
        // The fresh save was never updated
        assert!(by_updated.never >= 1);
    }
}
