//! build_graph: derive a region's road graph from an OSM PBF extract and
//! persist it as the cache file the engine loads.
//!
//! ```text
//! cargo run -p incheon --features osm --bin build_graph -- \
//!     --pbf south-korea-latest.osm.pbf --bbox 37.35,126.55,37.62,126.80
//! ```
//!
//! This is the minutes-scale admin step.  The recommender never runs it.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use tracing::info;

use cn_spatial::cache;
use cn_spatial::osm::{self, BoundingBox, NetworkKind, RegionSpec};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Kind {
    Walk,
    Drive,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// OSM PBF extract covering the region.
    #[arg(long)]
    pbf: PathBuf,

    /// Clip to `min_lat,min_lon,max_lat,max_lon`.
    #[arg(long)]
    bbox: Option<String>,

    #[arg(long, value_enum, default_value = "walk")]
    kind: Kind,

    /// JSON config supplying region name and cache path.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the cache path from the config.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn parse_bbox(raw: &str) -> Result<BoundingBox> {
    let parts: Vec<f64> = raw
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .with_context(|| format!("bbox {raw:?} is not four numbers"))?;
    let [min_lat, min_lon, max_lat, max_lon] = parts[..] else {
        bail!("bbox {raw:?} needs exactly four values");
    };
    if min_lat > max_lat || min_lon > max_lon {
        bail!("bbox {raw:?} has min greater than max");
    }
    Ok(BoundingBox { min_lat, min_lon, max_lat, max_lon })
}

fn main() -> Result<()> {
    incheon::init_logging();
    let args = Args::parse();

    let config = incheon::load_config(args.config.as_deref())?.graph;
    let out = args.out.unwrap_or(config.cache_path);

    let mut region = RegionSpec::new(config.region.clone(), args.pbf).with_kind(match args.kind {
        Kind::Walk => NetworkKind::Walk,
        Kind::Drive => NetworkKind::Drive,
    });
    if let Some(raw) = &args.bbox {
        region = region.with_bbox(parse_bbox(raw)?);
    }

    let started = Instant::now();
    let network = osm::build(&region)?;
    cache::save(&network, &config.region, &out)?;
    info!(
        path = %out.display(),
        secs = started.elapsed().as_secs_f64(),
        "road graph cache written"
    );
    Ok(())
}
