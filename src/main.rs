//! Locstash demo binary
//!
//! Opens (or creates) a file-backed store, seeds the demo locations, and
//! walks through the query and statistics API.

use locstash::config::Config;
use locstash::service::LocService;
use locstash::store::{FileMedium, Position, RecordStore};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "locstash=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Locstash v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load_default();
    tracing::info!("Data directory: {}", config.storage.data_dir);

    let medium = Arc::new(FileMedium::open(&config.storage.data_dir)?);
    let service = Arc::new(
        LocService::new(RecordStore::new(medium), &config.storage.collection)
            .unit(config.distance_unit())
            .page_size(config.query.page_size),
    );

    if config.storage.seed_demo {
        let seeded = service.seed_demo_if_empty().await?;
        if seeded > 0 {
            tracing::info!("Seeded {} demo locations", seeded);
        }
    }

    demo_query(&service).await?;
    demo_stats(&service).await?;

    Ok(())
}

async fn demo_query(service: &LocService) -> locstash::QueryResult<()> {
    // Somewhere in Tel Aviv as the reference position
    let here = Position::new(32.0853, 34.7818);
    let locs = service.query(Some(here)).await?;

    tracing::info!("{} locations (sorted by rating, descending):", locs.len());
    for loc in &locs {
        let distance = loc
            .distance
            .map(|d| format!("{d} km away"))
            .unwrap_or_else(|| "distance unknown".to_string());
        tracing::info!(
            "  {} [{}★] {} - created {}",
            loc.name,
            loc.rate,
            distance,
            locstash::geo::elapsed_time(loc.created_at)
        );
    }

    Ok(())
}

async fn demo_stats(service: &LocService) -> locstash::QueryResult<()> {
    let by_rate = service.count_by_rate().await?;
    tracing::info!(
        "By rating: {} low / {} medium / {} high (total {})",
        by_rate.low,
        by_rate.medium,
        by_rate.high,
        by_rate.total
    );

    let by_updated = service.count_by_updated().await?;
    tracing::info!(
        "By recency: {} today / {} past / {} never (total {})",
        by_updated.today,
        by_updated.past,
        by_updated.never,
        by_updated.total
    );

    Ok(())
}
