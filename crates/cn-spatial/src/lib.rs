//! `cn-spatial`: road network, graph cache, routing, and distance
//! strategies.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`network`]  | `RoadNetwork` (CSR + R-tree), `RoadNetworkBuilder`          |
//! | [`router`]   | `Router` trait, `RoadPath`, `SearchBudget`, `DijkstraRouter`|
//! | [`cache`]    | cache file `load`/`save`, `GraphCache`, `GraphConfig`      |
//! | [`distance`] | `Distance`, `DistanceStrategy`, `GreatCircleDistance`, `RoadNetworkDistance`, `resolve` |
//! | [`osm`]      | region `build` from OSM PBF (feature = `"osm"` only)        |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `osm`   | Enables road-graph building via the `osmpbf` crate.          |
//! | `serde` | Derives `Serialize`/`Deserialize` on config types.           |

pub mod cache;
pub mod distance;
pub mod error;
pub mod network;
pub mod router;

#[cfg(feature = "osm")]
pub mod osm;


pub use cache::{GraphCache, GraphConfig};
pub use distance::{
    Distance, DistanceStrategy, GreatCircleDistance, RoadNetworkDistance, resolve, strategy_for,
};
pub use error::{SpatialError, SpatialResult};
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use router::{DijkstraRouter, RoadPath, Router, SearchBudget};
