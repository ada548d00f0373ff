//! Shared setup for the Incheon demo binaries.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use cn_recommend::RecommendConfig;

/// Install a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

/// Read a JSON config file; fields it omits keep their defaults.  No path
/// means all defaults.
pub fn load_config(path: Option<&Path>) -> Result<RecommendConfig> {
    let Some(path) = path else {
        return Ok(RecommendConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}
