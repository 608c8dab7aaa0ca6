use crate::calendar::remove_non_trading_days;
use crate::error::CleaningError;
use crate::gaps::{fill_gaps, has_missing, interpolate_gaps};
use crate::outliers::{DEFAULT_IQR_MULTIPLIER, clean_outliers_iqr};
use core_types::{GapFill, OutlierTreatment, PriceField, PriceSeries, PriceTable};

/// Knobs for [`clean_with`]. The default reproduces [`clean_data`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CleaningOptions {
    pub gap_fill: GapFill,
    /// Outlier treatment is opt-in; `None` leaves values untouched.
    pub outliers: Option<OutlierTreatment>,
    pub iqr_multiplier: f64,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            gap_fill: GapFill::ForwardBackward,
            outliers: None,
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
        }
    }
}

/// The standard cleaning pass: fill gaps (only if there are any), then drop
/// weekends.
///
/// Filling runs before the weekday filter so imputation sees the full calendar.
#[tracing::instrument(level = "debug", skip_all, fields(len = series.len()))]
pub fn clean_data(series: &PriceSeries) -> PriceSeries {
    if has_missing(series) {
        tracing::debug!(missing = series.missing_count(), "Filling gaps");
        remove_non_trading_days(&fill_gaps(series))
    } else {
        tracing::trace!("No missing values, skipping gap fill");
        remove_non_trading_days(series)
    }
}

/// The configurable cleaning pass.
///
/// Order: optional IQR outlier treatment over the full calendar, then the
/// conditional gap fill (which also re-fills masked outliers), then the
/// weekday filter. Either fill method leaves no gap unless the series has no
/// present value at all.
#[tracing::instrument(level = "debug", skip_all, fields(len = series.len()))]
pub fn clean_with(
    series: &PriceSeries,
    options: &CleaningOptions,
) -> Result<PriceSeries, CleaningError> {
    let treated = match options.outliers {
        Some(treatment) => clean_outliers_iqr(series, treatment, options.iqr_multiplier)?,
        None => series.clone(),
    };

    let filled = if has_missing(&treated) {
        tracing::debug!(
            missing = treated.missing_count(),
            method = ?options.gap_fill,
            "Filling gaps"
        );
        match options.gap_fill {
            GapFill::ForwardBackward => fill_gaps(&treated),
            // Interpolation leaves a leading gap; back-fill it like the default.
            GapFill::Linear => fill_gaps(&interpolate_gaps(&treated)),
        }
    } else {
        treated
    };

    Ok(remove_non_trading_days(&filled))
}

/// Cleans the Open/High/Low/Close columns of a table independently with
/// [`clean_data`].
///
/// All four columns must be present; otherwise the error names every absent
/// one. Other columns are not carried over.
#[tracing::instrument(level = "debug", skip_all, fields(rows = table.len()))]
pub fn clean_ohlc(table: &PriceTable) -> Result<PriceTable, CleaningError> {
    table.require(&PriceField::OHLC)?;

    let mut cleaned_columns = Vec::with_capacity(PriceField::OHLC.len());
    for field in PriceField::OHLC {
        cleaned_columns.push((field, clean_data(&table.field(field)?)));
    }

    // Every column shares the table's timestamps, so the weekday filter leaves
    // them aligned; take the axis from the first one.
    let timestamps = cleaned_columns
        .first()
        .map(|(_, series)| series.timestamps().collect())
        .unwrap_or_default();

    let mut cleaned = PriceTable::new(timestamps)?;
    for (field, series) in cleaned_columns {
        cleaned.insert_column(field.as_str(), series.into_values())?;
    }

    Ok(cleaned)
}
