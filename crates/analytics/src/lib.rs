//! # tickerlens Analytics Engine
//!
//! Windowed and single-pass numeric algorithms over a cleaned close series:
//! simple moving average, up/down streaks with a direction mask, simple daily
//! return and greedy maximum profit.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It depends only on
//!   `core-types` (Layer 0) and never reads files, the network or the clock.
//! - **Insufficient data is not an error:** short inputs produce missing
//!   entries or zero aggregates. The only failures are invalid parameters and
//!   gaps that should have been cleaned upstream.
//!
//! ## Public API
//!
//! - `compute_sma`, `compute_sma_set`, `compute_streak`, `compute_sdr`,
//!   `compute_max_profit`, `extract_trades`: the individual calculations.
//! - `AnalyticsEngine`: runs all of them and produces an `AnalyticsReport`.
//! - `rank_by_max_profit`: the cross-ticker summary ordering.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

pub mod engine;
pub mod error;
pub mod indicators;
pub mod profit;
pub mod report;
pub mod streak;

pub use engine::{AnalyticsEngine, DEFAULT_SMA_WINDOWS};
pub use error::AnalyticsError;
pub use indicators::{DEFAULT_SMA_WINDOW, compute_sdr, compute_sma, compute_sma_set};
pub use profit::{Trade, compute_max_profit, extract_trades};
pub use report::{AnalyticsReport, PriceSnapshot, rank_by_max_profit};
pub use streak::{StreakSummary, compute_streak};
