//! recommend: run the full recommendation pipeline for one point and print
//! the result as JSON.
//!
//! ```text
//! cargo run -p incheon --bin recommend -- --lat 37.4563 --lon 126.7052 --category welfare
//! ```
//!
//! Datasets are read from `--data-dir` (see `data/` for the layout).  The
//! road graph is used only if the cache file named in the config already
//! exists; otherwise distances are straight-line and the output says so.
//! Build the cache with the `build_graph` binary.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use cn_core::GeoPoint;
use cn_recommend::{DatasetPaths, Datasets, Recommender};
use cn_spatial::GraphCache;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// User latitude (WGS84).
    #[arg(long)]
    lat: f64,

    /// User longitude (WGS84).
    #[arg(long)]
    lon: f64,

    /// Only consider facilities of this category.
    #[arg(long)]
    category: Option<String>,

    /// Directory holding facilities.csv, restaurants.csv, leisure.csv,
    /// bus_stops.csv and routes.csv.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// JSON config; omitted fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the road graph cache path from the config.
    #[arg(long)]
    graph: Option<PathBuf>,
}

fn main() -> Result<()> {
    incheon::init_logging();
    let args = Args::parse();

    let mut config = incheon::load_config(args.config.as_deref())?;
    if let Some(graph) = args.graph {
        config.graph.cache_path = graph;
    }

    let datasets = Datasets::load(&DatasetPaths::in_dir(&args.data_dir))
        .with_context(|| format!("loading datasets from {}", args.data_dir.display()))?;

    let cache = Arc::new(GraphCache::from_config(&config.graph));
    let recommender = Recommender::from_cache(config, datasets, Arc::clone(&cache));

    let user = GeoPoint::validated(args.lat, args.lon)?;
    let recommendation = recommender.recommend(user, args.category.as_deref())?;
    info!(road_graph = cache.is_ready(), "recommendation done");

    println!("{}", serde_json::to_string_pretty(&recommendation)?);
    Ok(())
}
