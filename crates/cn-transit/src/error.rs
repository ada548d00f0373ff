use thiserror::Error;

use cn_core::CoreError;

#[derive(Debug, Error)]
pub enum TransitError {
    #[error("route data parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TransitResult<T> = Result<T, TransitError>;

impl From<TransitError> for CoreError {
    fn from(e: TransitError) -> Self {
        match e {
            TransitError::Parse(msg) => CoreError::Parse(msg),
            TransitError::Io(io) => CoreError::Io(io),
        }
    }
}
