//! # tickerlens Cleaning Pipeline
//!
//! Normalizes a raw, time-indexed price sequence before any analytics run on it.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** pure functions over `core-types` values. No I/O, no
//!   global state, no logging configuration (events go through the `tracing`
//!   facade and are only visible if the caller installs a subscriber).
//! - **Detection vs. action:** `outlier_mask_iqr` only reports; `clean_outliers_iqr`
//!   acts. Neither is part of `clean_data`; outlier handling is opt-in through
//!   `CleaningOptions`.
//!
//! ## Public API
//!
//! - Gaps: `has_missing`, `fill_gaps`, `interpolate_gaps`.
//! - Calendar: `remove_non_trading_days`, `is_trading_day`.
//! - Outliers: `OutlierBounds`, `outlier_bounds`, `outlier_mask_iqr`,
//!   `clean_outliers_iqr`, `flag_return_outliers`.
//! - Pipeline: `clean_data`, `clean_with`, `CleaningOptions`, `clean_ohlc`.

pub mod calendar;
pub mod error;
pub mod gaps;
pub mod outliers;
pub mod pipeline;

pub use calendar::{is_trading_day, remove_non_trading_days};
pub use error::CleaningError;
pub use gaps::{fill_gaps, has_missing, interpolate_gaps};
pub use outliers::{
    DEFAULT_IQR_MULTIPLIER, DEFAULT_ZSCORE_THRESHOLD, OutlierBounds, clean_outliers_iqr,
    flag_return_outliers, outlier_bounds, outlier_mask_iqr,
};
pub use pipeline::{CleaningOptions, clean_data, clean_ohlc, clean_with};
