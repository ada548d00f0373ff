//! `cn-transit`: static bus route data and route matching.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`index`]   | `RouteRow`, `StopRouteIndex`                                |
//! | [`loader`]  | `load_route_rows_csv`, `load_route_rows_reader`             |
//! | [`matcher`] | `match_routes`, `MatchResult`, `StopRoutes`, `DirectConnection`, `stop_pairs` |
//! | [`error`]   | `TransitError`, `TransitResult<T>`                          |
//!
//! The index is built once per dataset version and is read-only afterwards;
//! share it behind an `Arc` or a `cn_core::Snapshot`.

pub mod error;
pub mod index;
pub mod loader;
pub mod matcher;

#[cfg(test)]
mod tests;

pub use error::{TransitError, TransitResult};
pub use index::{RouteRow, StopRouteIndex};
pub use loader::{load_route_rows_csv, load_route_rows_reader};
pub use matcher::{DirectConnection, MatchResult, StopRoutes, match_routes, stop_pairs};
