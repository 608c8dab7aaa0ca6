use crate::profit::Trade;
use crate::streak::StreakSummary;
use chrono::NaiveDateTime;
use core_types::TimeSeries;
use serde::Serialize;
use std::collections::BTreeMap;

/// The latest close and its change from the previous session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceSnapshot {
    pub timestamp: NaiveDateTime,
    pub close: f64,
    pub previous_close: f64,
    pub change: f64,
    /// Missing when the previous close is zero.
    pub change_pct: Option<f64>,
}

impl PriceSnapshot {
    /// Needs at least two observations.
    pub fn from_series(series: &TimeSeries<f64>) -> Option<Self> {
        let [.., previous, latest] = series.observations() else {
            return None;
        };

        let change = latest.value - previous.value;
        Some(Self {
            timestamp: latest.timestamp,
            close: latest.value,
            previous_close: previous.value,
            change,
            change_pct: (previous.value != 0.0).then(|| change / previous.value * 100.0),
        })
    }
}

/// Everything the analytics layer computes for one ticker.
///
/// This is the output of the `AnalyticsEngine` and the unit handed to the
/// rendering layer, either as a terminal table or as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    // I. Coverage
    pub observations: usize,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub snapshot: Option<PriceSnapshot>,

    // II. Trend
    pub sma: BTreeMap<usize, TimeSeries<Option<f64>>>,
    pub streak: StreakSummary,

    // III. Returns
    pub daily_returns: TimeSeries<Option<f64>>,
    pub max_profit: f64,
    pub trades: Vec<Trade>,
}

impl AnalyticsReport {
    /// The last value of each SMA, keyed by window. Missing while the window
    /// is longer than the series.
    pub fn latest_sma(&self) -> BTreeMap<usize, Option<f64>> {
        self.sma
            .iter()
            .map(|(window, series)| (*window, series.last().and_then(|o| o.value)))
            .collect()
    }
}

/// Orders tickers by descending max profit. Ties keep their input order.
///
/// The key travels with its report, so repeated keys are ranked as separate
/// entries.
pub fn rank_by_max_profit<K>(
    mut reports: Vec<(K, AnalyticsReport)>,
) -> Vec<(K, AnalyticsReport)> {
    reports.sort_by(|(_, a), (_, b)| b.max_profit.total_cmp(&a.max_profit));
    reports
}
