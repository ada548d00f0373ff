//! CSV loader for normalized place datasets.
//!
//! # CSV format
//!
//! The upstream normalizer guarantees the canonical columns; everything else
//! is carried through as attributes.
//!
//! ```csv
//! id,name,category,lat,lon,address
//! f1,Bupyeong Senior Welfare Center,welfare,37.4895,126.7245,Bupyeong-daero 1
//! f2,Namdong Day Care,daycare,37.4470,126.7310,
//! ```
//!
//! | Column     | Required | Notes                                          |
//! |------------|----------|------------------------------------------------|
//! | `id`       | no       | defaults to the 0-based row number             |
//! | `name`     | yes      |                                                |
//! | `category` | yes      |                                                |
//! | `lat`      | yes      | blank or invalid → `location = None`           |
//! | `lon`      | yes      | blank or invalid → `location = None`           |
//!
//! Rows with unusable coordinates are kept (so row numbers stay stable) but
//! never rank.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::{CoreError, CoreResult, GeoPoint, Place};

const REQUIRED: [&str; 4] = ["name", "category", "lat", "lon"];
const CANONICAL: [&str; 5] = ["id", "name", "category", "lat", "lon"];

/// Load places from a CSV file.
pub fn load_places_csv(path: &Path) -> CoreResult<Vec<Place>> {
    let file = std::fs::File::open(path)?;
    load_places_reader(file)
}

/// Like [`load_places_csv`] but accepts any `Read` source.
pub fn load_places_reader<R: Read>(reader: R) -> CoreResult<Vec<Place>> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| CoreError::Parse(e.to_string()))?
        .clone();
    for column in REQUIRED {
        if !headers.iter().any(|h| h.trim() == column) {
            return Err(CoreError::Parse(format!("missing required column {column:?}")));
        }
    }

    let mut places = Vec::new();
    for (row, result) in csv_reader.deserialize::<BTreeMap<String, String>>().enumerate() {
        let mut fields: BTreeMap<String, String> = result
            .map_err(|e| CoreError::Parse(format!("row {row}: {e}")))?
            .into_iter()
            .map(|(k, v)| (k.trim().to_owned(), v.trim().to_owned()))
            .collect();

        let location = parse_location(
            fields.get("lat").map(String::as_str),
            fields.get("lon").map(String::as_str),
        );
        if location.is_none() {
            debug!(row, "place has no usable coordinates");
        }

        let id = fields
            .remove("id")
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| row.to_string());
        let name = fields.remove("name").unwrap_or_default();
        let category = fields.remove("category").unwrap_or_default();
        fields.retain(|k, _| !CANONICAL.contains(&k.as_str()));

        places.push(Place { id, name, category, location, attributes: fields });
    }

    Ok(places)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_location(lat: Option<&str>, lon: Option<&str>) -> Option<GeoPoint> {
    let lat = lat?.parse::<f64>().ok()?;
    let lon = lon?.parse::<f64>().ok()?;
    GeoPoint::validated(lat, lon).ok()
}
