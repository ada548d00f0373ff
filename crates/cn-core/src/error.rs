//! Engine error type.
//!
//! Only caller mistakes are errors.  Empty results and missing dependencies
//! (no road graph, unreachable candidates) are reported through
//! [`Ranking`](crate::Ranking) instead.

use thiserror::Error;

/// Errors produced by `cn-core` and re-used by the ranking crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid coordinate ({lat}, {lon}): {reason}")]
    InvalidInput {
        lat:    f64,
        lon:    f64,
        reason: &'static str,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `cn-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
