//! `cn-core`: foundational types for the `carenav` recommendation engine.
//!
//! This crate is a dependency of every other `cn-*` crate and has no `cn-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`geo`]         | `GeoPoint`, haversine distance, validation            |
//! | [`ids`]         | `NodeId`, `EdgeId`, `StopId`, `RouteId`               |
//! | [`place`]       | `Place` (= `Facility` = `AmenityRecord`), `Located`   |
//! | [`ranking`]     | `RankedCandidate`, `Ranking`, `EmptyReason`, `Degradation` |
//! | [`snapshot`]    | `Snapshot<T>` atomic dataset swap                     |
//! | [`loader`]      | `load_places_csv`, `load_places_reader`               |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod loader;
pub mod place;
pub mod ranking;
pub mod snapshot;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{EARTH_RADIUS_M, GeoPoint, haversine_m};
pub use ids::{EdgeId, NodeId, RouteId, StopId};
pub use loader::{load_places_csv, load_places_reader};
pub use place::{AmenityRecord, Facility, Located, Place};
pub use ranking::{Degradation, EmptyReason, RankedCandidate, Ranking};
pub use snapshot::Snapshot;
