use crate::error::CleaningError;
use core_types::{OutlierTreatment, PriceSeries, TimeSeries};
use statrs::statistics::Statistics;

/// Stricter than the classical Tukey 1.5 so that wide but legitimate daily
/// swings of large-cap equities are not flagged.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 3.0;

pub const DEFAULT_ZSCORE_THRESHOLD: f64 = 3.0;

/// Tukey fences derived from a sequence's empirical quartiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierBounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
    pub k: f64,
}

impl OutlierBounds {
    /// Computes the fences over the given values. Returns `None` when there
    /// are no values to take quartiles of.
    pub fn from_values(
        values: impl IntoIterator<Item = f64>,
        k: f64,
    ) -> Result<Option<Self>, CleaningError> {
        validate_multiplier(k)?;

        let mut sorted: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return Ok(None);
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;

        Ok(Some(Self {
            q1,
            q3,
            iqr,
            lower: q1 - k * iqr,
            upper: q3 + k * iqr,
            k,
        }))
    }

    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }

    /// Moves a value to the nearer fence if it lies outside them.
    pub fn clip(&self, value: f64) -> f64 {
        if value < self.lower {
            self.lower
        } else if value > self.upper {
            self.upper
        } else {
            value
        }
    }
}

fn validate_multiplier(k: f64) -> Result<(), CleaningError> {
    if k.is_finite() && k >= 0.0 {
        Ok(())
    } else {
        Err(CleaningError::InvalidMultiplier(k))
    }
}

/// Linear interpolation between the closest order statistics.
/// `sorted` must be non-empty and ascending.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
    }
}

/// The fence record for a price series, over its present values.
pub fn outlier_bounds(series: &PriceSeries, k: f64) -> Result<Option<OutlierBounds>, CleaningError> {
    OutlierBounds::from_values(series.present_values(), k)
}

/// Flags values outside `[Q1 - k*IQR, Q3 + k*IQR]`. Detection only.
///
/// Missing values are never flagged, and a constant series flags nothing
/// because both fences collapse onto the constant.
pub fn outlier_mask_iqr(series: &PriceSeries, k: f64) -> Result<TimeSeries<bool>, CleaningError> {
    let bounds = outlier_bounds(series, k)?;

    let mask = series.map_values(|value| match (bounds, value) {
        (Some(bounds), Some(v)) => bounds.is_outlier(*v),
        _ => false,
    });

    tracing::debug!(
        flagged = mask.values().filter(|flag| **flag).count(),
        len = mask.len(),
        k,
        "IQR outlier scan"
    );
    Ok(mask)
}

/// Same fences as [`outlier_mask_iqr`], but acts on the flagged values:
/// `Mask` turns them into gaps, `Clip` winsorizes them to the nearer fence.
/// The length of the series never changes.
pub fn clean_outliers_iqr(
    series: &PriceSeries,
    treatment: OutlierTreatment,
    k: f64,
) -> Result<PriceSeries, CleaningError> {
    let Some(bounds) = outlier_bounds(series, k)? else {
        return Ok(series.clone());
    };

    Ok(series.map_values(|value| match value {
        Some(v) if bounds.is_outlier(*v) => match treatment {
            OutlierTreatment::Mask => None,
            OutlierTreatment::Clip => Some(bounds.clip(*v)),
        },
        other => *other,
    }))
}

/// Flags observations whose simple return has an absolute z-score above
/// `threshold`.
///
/// Returns are taken between adjacent observations only, never across a gap:
/// the first observation, a gap, the value right after a gap and a value
/// following a zero price have no return and are never flagged. A zero or
/// undefined standard deviation is replaced by 1.
pub fn flag_return_outliers(
    series: &PriceSeries,
    threshold: f64,
) -> Result<TimeSeries<bool>, CleaningError> {
    if !(threshold.is_finite() && threshold > 0.0) {
        return Err(CleaningError::InvalidThreshold(threshold));
    }

    let mut previous: Option<f64> = None;
    let returns = series.map_values(|value| {
        let current = value.filter(|v| !v.is_nan());
        let ret = match (previous, current) {
            (Some(prev), Some(cur)) if prev != 0.0 => Some((cur - prev) / prev),
            _ => None,
        };
        previous = current;
        ret
    });

    let present: Vec<f64> = returns.values().filter_map(|r| *r).collect();
    if present.is_empty() {
        return Ok(returns.map_values(|_| false));
    }

    let mean = present.iter().mean();
    let std_dev = match present.iter().population_std_dev() {
        s if s.is_finite() && s > 0.0 => s,
        _ => 1.0,
    };

    Ok(returns.map_values(|ret| ret.is_some_and(|r| ((r - mean) / std_dev).abs() > threshold)))
}
