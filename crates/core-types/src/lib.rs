//! # tickerlens Core Types
//!
//! Layer 0 of the workspace: the value types every other crate speaks.
//!
//! - `TimeSeries<T>` / `Observation<T>`: ordered `(timestamp, value)` sequences.
//!   `PriceSeries` (`TimeSeries<Option<f64>>`) is the raw, possibly gappy form;
//!   `TimeSeries<f64>` is the complete form the analytics consume.
//! - `PriceTable`: a wide OHLCV table from which callers extract columns.
//! - `Direction`, `PriceField`, `GapFill`, `OutlierTreatment`: shared enums.
//! - `Horizon`, `Interval`: chart lookback windows and sampling granularities.

pub mod enums;
pub mod error;
pub mod horizon;
pub mod series;
pub mod table;
pub mod timestamp;

// Re-export the core types to provide a clean public API.
pub use enums::{Direction, GapFill, OutlierTreatment, PriceField};
pub use error::CoreError;
pub use horizon::{Horizon, Interval, Lookback};
pub use series::{Observation, PriceSeries, TimeSeries, is_missing};
pub use table::{Column, PriceTable};
pub use timestamp::parse_timestamp;
