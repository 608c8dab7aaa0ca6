use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CleaningError {
    #[error("IQR multiplier must be finite and non-negative, got {0}")]
    InvalidMultiplier(f64),

    #[error("Z-score threshold must be finite and positive, got {0}")]
    InvalidThreshold(f64),

    #[error(transparent)]
    Core(#[from] CoreError),
}
