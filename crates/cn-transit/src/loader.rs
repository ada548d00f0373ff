//! CSV loader for static route rows.
//!
//! # CSV format
//!
//! ```csv
//! stop_id,route_id,sequence
//! 89001,5,1
//! 89002,5,2
//! 89002,21,
//! ```
//!
//! | Column     | Required | Notes                                  |
//! |------------|----------|----------------------------------------|
//! | `stop_id`  | yes      | trimmed; blank rows are skipped        |
//! | `route_id` | yes      | trimmed; blank rows are skipped        |
//! | `sequence` | no       | non-negative integer; blank → `None`   |
//!
//! Any other column is ignored.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use cn_core::{RouteId, StopId};

use crate::index::RouteRow;
use crate::{TransitError, TransitResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RouteRecord {
    stop_id:  String,
    route_id: String,
    #[serde(default)]
    sequence: Option<u32>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load route rows from a CSV file.
pub fn load_route_rows_csv(path: &Path) -> TransitResult<Vec<RouteRow>> {
    let file = std::fs::File::open(path)?;
    load_route_rows_reader(file)
}

/// Like [`load_route_rows_csv`] but accepts any `Read` source.
pub fn load_route_rows_reader<R: Read>(reader: R) -> TransitResult<Vec<RouteRow>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut rows = Vec::new();
    for (line, result) in csv_reader.deserialize::<RouteRecord>().enumerate() {
        let record = result.map_err(|e| TransitError::Parse(e.to_string()))?;
        let stop_id = StopId::new(&record.stop_id);
        let route_id = RouteId::new(&record.route_id);
        if stop_id.is_empty() || route_id.is_empty() {
            debug!(line, "skipping route row with a blank stop or route id");
            continue;
        }
        rows.push(RouteRow { stop_id, route_id, sequence: record.sequence });
    }

    debug!(rows = rows.len(), "loaded route rows");
    Ok(rows)
}
