use chrono::NaiveDateTime;
use core_types::{Observation, TimeSeries};
use serde::Serialize;

/// A buy/sell pair covering one maximal run of strictly rising steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trade {
    pub entry: NaiveDateTime,
    pub exit: NaiveDateTime,
    pub entry_price: f64,
    pub exit_price: f64,
    pub profit: f64,
}

/// Greedy maximum profit with unlimited transactions: the sum of every positive
/// consecutive difference. Zero for fewer than two values or a non-increasing
/// sequence.
pub fn compute_max_profit(series: &TimeSeries<f64>) -> f64 {
    series
        .observations()
        .windows(2)
        .map(|pair| (pair[1].value - pair[0].value).max(0.0))
        .sum()
}

/// The trades realising [`compute_max_profit`]: buy at the start of each
/// rising run and sell at its top.
///
/// Trade profits sum to the greedy maximum.
pub fn extract_trades(series: &TimeSeries<f64>) -> Vec<Trade> {
    let observations = series.observations();
    let mut trades = Vec::new();
    let mut entry = None;

    for (i, pair) in observations.windows(2).enumerate() {
        let rising = pair[1].value > pair[0].value;
        match (rising, entry) {
            (true, None) => entry = Some(i),
            (false, Some(start)) => {
                trades.push(trade_between(&observations[start], &pair[0]));
                entry = None;
            }
            _ => {}
        }
    }

    if let (Some(start), Some(last)) = (entry, observations.last()) {
        trades.push(trade_between(&observations[start], last));
    }

    trades
}

fn trade_between(entry: &Observation<f64>, exit: &Observation<f64>) -> Trade {
    Trade {
        entry: entry.timestamp,
        exit: exit.timestamp,
        entry_price: entry.value,
        exit_price: exit.value,
        profit: exit.value - entry.value,
    }
}
