use core_types::TimeSeries;
use std::collections::BTreeMap;

pub const DEFAULT_SMA_WINDOW: usize = 5;

/// Simple moving average over a sliding window, computed with a running sum.
///
/// The output is aligned with the input. `output[i]` is the mean of
/// `input[i + 1 - window..=i]` and is missing while fewer than `window` values
/// have been seen. A zero window yields an all-missing series.
pub fn compute_sma(series: &TimeSeries<f64>, window: usize) -> TimeSeries<Option<f64>> {
    if window == 0 {
        return series.map_values(|_| None);
    }

    let observations = series.observations();
    let divisor = window as f64;
    let mut running_sum = 0.0;

    series.map_indexed(|i, value| {
        running_sum += value;
        if i >= window {
            running_sum -= observations[i - window].value;
        }
        (i + 1 >= window).then_some(running_sum / divisor)
    })
}

/// One SMA per requested window, keyed by window. Duplicate windows collapse.
pub fn compute_sma_set(
    series: &TimeSeries<f64>,
    windows: &[usize],
) -> BTreeMap<usize, TimeSeries<Option<f64>>> {
    windows
        .iter()
        .map(|&window| (window, compute_sma(series, window)))
        .collect()
}

/// Simple daily return `(x[i] - x[i-1]) / x[i-1]`.
///
/// The first entry has no reference point and is missing, as is any entry
/// whose previous value is exactly zero.
pub fn compute_sdr(series: &TimeSeries<f64>) -> TimeSeries<Option<f64>> {
    let observations = series.observations();

    series.map_indexed(|i, current| {
        let previous = observations.get(i.checked_sub(1)?)?.value;
        (previous != 0.0).then(|| (current - previous) / previous)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(values: Vec<f64>) -> TimeSeries<f64> {
        TimeSeries::daily(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), values)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn sma_matches_brute_force_mean() {
        let values: Vec<f64> = (0..40).map(|i| ((i * 37) % 11) as f64 + 0.25 * i as f64).collect();
        let input = series(values.clone());

        for window in 1..=values.len() {
            let sma = compute_sma(&input, window);
            assert_eq!(sma.len(), values.len());

            for (i, value) in sma.values().enumerate() {
                if i + 1 < window {
                    assert_eq!(*value, None, "window {window}, index {i}");
                } else {
                    let slice = &values[i + 1 - window..=i];
                    let expected = slice.iter().sum::<f64>() / window as f64;
                    assert_close(value.unwrap(), expected);
                }
            }
        }
    }

    #[test]
    fn sma_on_monotone_input_has_expected_warmup() {
        let input = series((1..=100).map(f64::from).collect());
        for (window, missing) in [(5, 4), (20, 19), (50, 49)] {
            let sma = compute_sma(&input, window);
            assert_eq!(sma.values().filter(|v| v.is_none()).count(), missing);
        }
        assert_close(compute_sma(&input, 5).get(4).unwrap().value.unwrap(), 3.0);
    }

    #[test]
    fn sma_degenerate_inputs_are_all_missing() {
        let input = series(vec![1.0, 2.0, 3.0]);
        assert!(compute_sma(&input, 0).values().all(Option::is_none));
        assert!(compute_sma(&input, 4).values().all(Option::is_none));
        assert!(compute_sma(&series(vec![]), DEFAULT_SMA_WINDOW).is_empty());
    }

    #[test]
    fn sma_set_keys_by_window() {
        let input = series((1..=60).map(f64::from).collect());
        let set = compute_sma_set(&input, &[50, 5, 20, 5]);
        assert_eq!(set.keys().copied().collect::<Vec<_>>(), vec![5, 20, 50]);
        assert_eq!(set[&20], compute_sma(&input, 20));
    }

    #[test]
    fn sdr_is_fractional_change() {
        let sdr = compute_sdr(&series(vec![100.0, 110.0, 99.0]));
        let values = sdr.into_values();
        assert_eq!(values[0], None);
        assert_close(values[1].unwrap(), 0.10);
        assert_close(values[2].unwrap(), -0.1);
    }

    #[test]
    fn sdr_guards_zero_division() {
        let sdr = compute_sdr(&series(vec![0.0, 5.0]));
        assert_eq!(sdr.into_values(), vec![None, None]);
        assert!(compute_sdr(&series(vec![])).is_empty());
        assert_eq!(compute_sdr(&series(vec![3.0])).into_values(), vec![None]);
    }
}
