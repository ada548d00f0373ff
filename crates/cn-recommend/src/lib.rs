//! `cn-recommend`: facility ranking, amenity lookup, and the assembled
//! recommendation.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`nearest`]  | `NearestFacilityResolver`, `RankOptions`                     |
//! | [`amenity`]  | `k_nearest`, `AmenityFinder`                                 |
//! | [`config`]   | `RecommendConfig`, `DatasetPaths`                            |
//! | [`pipeline`] | `Recommender`, `Datasets`, `Recommendation`                  |
//!
//! Errors are [`cn_core::CoreError`]; route-data failures convert into it.

pub mod amenity;
pub mod config;
pub mod nearest;
pub mod pipeline;


pub use amenity::{AmenityFinder, k_nearest};
pub use config::{DatasetPaths, RecommendConfig};
pub use nearest::{NearestFacilityResolver, RankOptions};
pub use pipeline::{Datasets, Recommendation, Recommender};
