use crate::error::AnalyticsError;
use crate::indicators::{compute_sdr, compute_sma_set};
use crate::profit::{compute_max_profit, extract_trades};
use crate::report::{AnalyticsReport, PriceSnapshot};
use crate::streak::compute_streak;
use core_types::{PriceSeries, TimeSeries};

/// The SMA overlays shown on a price chart by default.
pub const DEFAULT_SMA_WINDOWS: [usize; 3] = [5, 20, 50];

/// A stateless calculator deriving an `AnalyticsReport` from a cleaned close
/// series.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsEngine {
    sma_windows: Vec<usize>,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self {
            sma_windows: DEFAULT_SMA_WINDOWS.to_vec(),
        }
    }
}

impl AnalyticsEngine {
    /// Every window must be at least 1, and there must be at least one.
    pub fn new(sma_windows: Vec<usize>) -> Result<Self, AnalyticsError> {
        if sma_windows.is_empty() {
            return Err(AnalyticsError::NoWindows);
        }
        if sma_windows.contains(&0) {
            return Err(AnalyticsError::InvalidWindow(0));
        }
        Ok(Self { sma_windows })
    }

    pub fn sma_windows(&self) -> &[usize] {
        &self.sma_windows
    }

    /// The main entry point: runs every calculation over a complete series.
    ///
    /// Short series are not an error; they produce missing entries and zero
    /// aggregates.
    #[tracing::instrument(level = "debug", skip_all, fields(len = series.len()))]
    pub fn analyze(&self, series: &TimeSeries<f64>) -> AnalyticsReport {
        let report = AnalyticsReport {
            observations: series.len(),
            start: series.first().map(|o| o.timestamp),
            end: series.last().map(|o| o.timestamp),
            snapshot: PriceSnapshot::from_series(series),
            sma: compute_sma_set(series, &self.sma_windows),
            streak: compute_streak(series),
            daily_returns: compute_sdr(series),
            max_profit: compute_max_profit(series),
            trades: extract_trades(series),
        };

        tracing::debug!(
            max_profit = report.max_profit,
            trades = report.trades.len(),
            longest_up = report.streak.longest_up,
            longest_down = report.streak.longest_down,
            "Analysis complete"
        );
        report
    }

    /// Like [`AnalyticsEngine::analyze`], for a price series that should
    /// already be gap-free. Fails at the first missing value.
    pub fn analyze_prices(&self, series: &PriceSeries) -> Result<AnalyticsReport, AnalyticsError> {
        let complete = series.require_complete()?;
        Ok(self.analyze(&complete))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::rank_by_max_profit;
    use chrono::NaiveDate;
    use core_types::CoreError;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn rejects_bad_windows() {
        assert_eq!(AnalyticsEngine::new(vec![]), Err(AnalyticsError::NoWindows));
        assert_eq!(
            AnalyticsEngine::new(vec![5, 0]),
            Err(AnalyticsError::InvalidWindow(0))
        );
        assert_eq!(AnalyticsEngine::new(vec![3]).unwrap().sma_windows(), &[3]);
    }

    #[test]
    fn analyze_collects_every_metric() {
        let series = TimeSeries::weekdays(start(), vec![7.0, 1.0, 5.0, 3.0, 6.0, 4.0]);
        let report = AnalyticsEngine::new(vec![2, 5, 50]).unwrap().analyze(&series);

        assert_eq!(report.observations, 6);
        assert_eq!(report.start, series.first().map(|o| o.timestamp));
        assert_eq!(report.max_profit, 7.0);
        assert_eq!(report.trades.len(), 2);
        assert_eq!(report.streak.longest_up, 1);
        assert_eq!(report.daily_returns.len(), 6);

        let snapshot = report.snapshot.unwrap();
        assert_eq!((snapshot.close, snapshot.previous_close, snapshot.change), (4.0, 6.0, -2.0));

        let latest = report.latest_sma();
        assert_eq!(latest[&2], Some(5.0));
        assert_eq!(latest[&50], None);
    }

    #[test]
    fn empty_series_is_not_an_error() {
        let report = AnalyticsEngine::default().analyze(&TimeSeries::new());
        assert_eq!(report.observations, 0);
        assert_eq!(report.snapshot, None);
        assert_eq!(report.max_profit, 0.0);
        assert!(report.trades.is_empty());
        assert_eq!(report.sma.len(), DEFAULT_SMA_WINDOWS.len());
    }

    #[test]
    fn analyze_prices_requires_complete_input() {
        let prices = TimeSeries::daily(start(), vec![Some(1.0), None, Some(2.0)]);
        assert_eq!(
            AnalyticsEngine::default().analyze_prices(&prices),
            Err(AnalyticsError::Core(CoreError::MissingValue { index: 1 }))
        );
    }

    #[test]
    fn ranking_orders_by_profit() {
        let engine = AnalyticsEngine::default();
        let flat = engine.analyze(&TimeSeries::daily(start(), vec![3.0, 3.0]));
        let rising = engine.analyze(&TimeSeries::daily(start(), vec![1.0, 4.0]));
        let falling = engine.analyze(&TimeSeries::daily(start(), vec![4.0, 1.0]));

        let ranked = rank_by_max_profit(vec![
            ("FLAT".to_string(), flat),
            ("UP".to_string(), rising),
            ("DOWN".to_string(), falling),
        ]);
        let order: Vec<_> = ranked.iter().map(|(symbol, _)| symbol.as_str()).collect();
        assert_eq!(order, vec!["UP", "FLAT", "DOWN"]);
    }

    #[test]
    fn report_serializes_to_json() {
        let report = AnalyticsEngine::default()
            .analyze(&TimeSeries::daily(start(), vec![1.0, 2.0, 1.5]));
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["observations"], 3);
        assert_eq!(json["max_profit"], 1.0);
        assert!(json["sma"]["5"].is_array());
        assert_eq!(json["streak"]["mask"][1]["value"], 1);
    }
}
