//! Locstash CLI
//!
//! Terminal front-end for the location service:
//! - List locations (with filter/sort/page options)
//! - Add, re-rate, and remove locations
//! - Show a single location
//! - Rating and recency statistics

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use locstash::config::{generate_default_config, Config};
use locstash::query::{FilterPatch, SortBy, SortDir, SortKey};
use locstash::service::LocService;
use locstash::store::{FileMedium, Geo, Loc, Position, RecordStore};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "locstash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Manage your pinned locations from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (default: from config)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortField {
    Rate,
    Name,
    Created,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List locations
    List {
        /// Filter by text (matches name or address, case-insensitive)
        #[arg(short, long)]
        txt: Option<String>,
        /// Keep only locations rated at least this much
        #[arg(short, long)]
        min_rate: Option<u8>,
        /// Sort field
        #[arg(short, long, value_enum)]
        sort: Option<SortField>,
        /// Sort descending
        #[arg(short = 'd', long)]
        desc: bool,
        /// Page index (pagination stays off without this)
        #[arg(short, long)]
        page: Option<usize>,
        /// Annotate distance from this position, as "lat,lng"
        #[arg(long)]
        from: Option<String>,
    },

    /// Add a location
    Add {
        /// Display name
        name: String,
        /// Rating (1-5)
        #[arg(short, long, default_value = "3")]
        rate: u8,
        /// Latitude
        #[arg(long)]
        lat: f64,
        /// Longitude
        #[arg(long)]
        lng: f64,
        /// Address text
        #[arg(short, long, default_value = "")]
        address: String,
        /// Map zoom level
        #[arg(short, long, default_value = "11")]
        zoom: u8,
    },

    /// Change the rating of an existing location
    Rate {
        /// Location id
        id: String,
        /// New rating (1-5)
        rate: u8,
    },

    /// Remove a location
    Remove {
        /// Location id
        id: String,
    },

    /// Show a single location
    Show {
        /// Location id
        id: String,
    },

    /// Show rating and recency statistics
    Stats,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_default();
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = dir.to_string_lossy().to_string();
    }

    let medium = Arc::new(FileMedium::open(&config.storage.data_dir)?);
    let service = LocService::new(RecordStore::new(medium), &config.storage.collection)
        .unit(config.distance_unit())
        .page_size(config.query.page_size);

    if config.storage.seed_demo {
        service.seed_demo_if_empty().await?;
    }

    let json = cli.format == "json";

    match cli.command {
        Commands::List {
            txt,
            min_rate,
            sort,
            desc,
            page,
            from,
        } => {
            service
                .set_filter_by(FilterPatch { txt, min_rate })
                .await?;
            if let Some(field) = sort {
                let key = match field {
                    SortField::Rate => SortKey::Rate,
                    SortField::Name => SortKey::Name,
                    SortField::Created => SortKey::CreatedAt,
                };
                let dir = if desc { SortDir::Desc } else { SortDir::Asc };
                service.set_sort_by(Some(SortBy::new(key, dir))).await;
            }
            service.set_page(page).await;

            let reference = from.map(|s| parse_position(&s)).transpose()?;
            let locs = service.query(reference).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&locs)?);
            } else if locs.is_empty() {
                println!("No locations to show");
            } else {
                for loc in &locs {
                    print_loc(loc);
                }
            }
        }

        Commands::Add {
            name,
            rate,
            lat,
            lng,
            address,
            zoom,
        } => {
            let loc = Loc::new(name, rate, Geo::new(address, lat, lng, zoom));
            let saved = service.save(loc).await?;
            println!("Added {} (id: {})", saved.name, saved.id);
        }

        Commands::Rate { id, rate } => {
            let mut loc = service.get(&id).await?;
            loc.rate = rate;
            let saved = service.save(loc).await?;
            println!("Rate of {} set to {}", saved.name, saved.rate);
        }

        Commands::Remove { id } => {
            service.remove(&id).await?;
            println!("Removed {id}");
        }

        Commands::Show { id } => {
            let loc = service.get(&id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&loc)?);
            } else {
                print_loc(&loc);
            }
        }

        Commands::Stats => {
            let by_rate = service.count_by_rate().await?;
            let by_updated = service.count_by_updated().await?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "by_rate": by_rate,
                        "by_updated": by_updated,
                    }))?
                );
            } else {
                println!(
                    "By rating:  low {} | medium {} | high {} | total {}",
                    by_rate.low, by_rate.medium, by_rate.high, by_rate.total
                );
                println!(
                    "By recency: today {} | past {} | never {} | total {}",
                    by_updated.today, by_updated.past, by_updated.never, by_updated.total
                );
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("write config to {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{content}"),
            }
        }
    }

    Ok(())
}

/// Parse a "lat,lng" pair
fn parse_position(s: &str) -> anyhow::Result<Position> {
    let (lat, lng) = s
        .split_once(',')
        .context("expected position as \"lat,lng\"")?;
    Ok(Position::new(
        lat.trim().parse().context("bad latitude")?,
        lng.trim().parse().context("bad longitude")?,
    ))
}

fn print_loc(loc: &Loc) {
    let stars = "★".repeat(loc.rate as usize);
    let distance = loc
        .distance
        .map(|d| format!(" | {d} away"))
        .unwrap_or_default();
    let updated = loc
        .updated_at
        .filter(|&u| u != loc.created_at)
        .map(|u| format!(" | updated {}", locstash::geo::elapsed_time(u)))
        .unwrap_or_default();

    println!(
        "{} [{}] {}{}\n    {} | created {}{}",
        loc.name,
        loc.id,
        stars,
        distance,
        if loc.geo.address.is_empty() {
            "(no address)"
        } else {
            loc.geo.address.as_str()
        },
        locstash::geo::elapsed_time(loc.created_at),
        updated,
    );
}
