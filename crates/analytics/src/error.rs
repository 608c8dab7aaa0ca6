use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("SMA window must be at least 1, got {0}")]
    InvalidWindow(usize),

    #[error("No SMA windows configured")]
    NoWindows,

    #[error(transparent)]
    Core(#[from] CoreError),
}
