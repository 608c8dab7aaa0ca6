use analytics::{AnalyticsEngine, AnalyticsReport, rank_by_max_profit};
use anyhow::Context;
use cleaning::{CleaningOptions, clean_ohlc, clean_with, flag_return_outliers, outlier_mask_iqr};
use configuration::Settings;
use core_types::{PriceField, PriceTable};
use serde::Serialize;

/// How one ticker's table is turned into a report.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub column: String,
    pub cleaning: CleaningOptions,
    pub return_zscore_threshold: f64,
    /// Clean all four price columns together, failing if any is absent.
    pub require_ohlc: bool,
}

impl PipelineOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            column: settings.data.price_column.clone(),
            cleaning: CleaningOptions {
                gap_fill: settings.cleaning.gap_fill,
                outliers: settings.cleaning.outliers.treatment(),
                iqr_multiplier: settings.cleaning.iqr_multiplier,
            },
            return_zscore_threshold: settings.cleaning.return_zscore_threshold,
            require_ohlc: false,
        }
    }
}

/// The cleaning diagnostics and analytics report for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerOutcome {
    pub symbol: String,
    pub column: String,
    pub raw_rows: usize,
    pub cleaned_rows: usize,
    pub missing_before_cleaning: usize,
    pub iqr_outliers: usize,
    pub return_outliers: usize,
    pub report: AnalyticsReport,
}

/// Runs the cleaning pipeline and the analytics engine over one column.
///
/// With `require_ohlc` the table must carry all four price columns, and an
/// Open/High/Low/Close column is taken from the `clean_ohlc` output. Any other
/// column (`Adj Close`, `Volume`) is cleaned on its own.
#[tracing::instrument(level = "debug", skip(table, options, engine), fields(rows = table.len()))]
pub fn analyze_table(
    symbol: &str,
    table: &PriceTable,
    options: &PipelineOptions,
    engine: &AnalyticsEngine,
) -> anyhow::Result<TickerOutcome> {
    let raw = table.column(&options.column)?;

    let source = if options.require_ohlc {
        table.require(&PriceField::OHLC)?;
        match options.column.parse::<PriceField>() {
            Ok(field) if PriceField::OHLC.contains(&field) => clean_ohlc(table)?.field(field)?,
            _ => raw.clone(),
        }
    } else {
        raw.clone()
    };

    let iqr_outliers = outlier_mask_iqr(&raw, options.cleaning.iqr_multiplier)?
        .values()
        .filter(|flag| **flag)
        .count();

    let cleaned = clean_with(&source, &options.cleaning)?;
    let return_outliers = flag_return_outliers(&cleaned, options.return_zscore_threshold)?
        .values()
        .filter(|flag| **flag)
        .count();
    if return_outliers > 0 {
        tracing::warn!(symbol, return_outliers, "Suspicious daily returns after cleaning");
    }

    let report = engine.analyze_prices(&cleaned).with_context(|| {
        if raw.present_values().next().is_none() {
            format!("{symbol}: '{}' has no usable prices", options.column)
        } else {
            format!("{symbol}: '{}' still has missing values after cleaning", options.column)
        }
    })?;

    Ok(TickerOutcome {
        symbol: symbol.to_string(),
        column: options.column.clone(),
        raw_rows: raw.len(),
        cleaned_rows: cleaned.len(),
        missing_before_cleaning: raw.missing_count(),
        iqr_outliers,
        return_outliers,
        report,
    })
}

/// Orders outcomes by descending max profit, keeping input order on ties.
pub fn rank_outcomes(outcomes: Vec<TickerOutcome>) -> Vec<TickerOutcome> {
    let keyed = outcomes
        .into_iter()
        .map(|outcome| {
            let report = outcome.report.clone();
            (outcome, report)
        })
        .collect();
    rank_by_max_profit(keyed)
        .into_iter()
        .map(|(outcome, _)| outcome)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::{CoreError, OutlierTreatment, TimeSeries};

    fn table(close: Vec<Option<f64>>) -> PriceTable {
        // Starts on a Monday.
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let stamps = TimeSeries::daily(start, vec![(); close.len()]).timestamps().collect();
        PriceTable::new(stamps).unwrap().with_column("Close", close).unwrap()
    }

    fn options() -> PipelineOptions {
        PipelineOptions::from_settings(&Settings::default())
    }

    #[test]
    fn cleans_then_analyzes() {
        // Mon..Sun, Mon: the weekend rows go, the gap is filled.
        let input = table(vec![
            Some(7.0),
            Some(1.0),
            None,
            Some(3.0),
            Some(6.0),
            Some(6.5),
            Some(6.5),
            Some(4.0),
        ]);
        let outcome = analyze_table("TEST", &input, &options(), &AnalyticsEngine::default()).unwrap();

        assert_eq!(outcome.raw_rows, 8);
        assert_eq!(outcome.cleaned_rows, 6);
        assert_eq!(outcome.missing_before_cleaning, 1);
        // 7, 1, 1, 3, 6, 4
        assert_eq!(outcome.report.max_profit, 5.0);
        assert_eq!(outcome.report.observations, 6);
    }

    #[test]
    fn counts_iqr_outliers_on_raw_prices() {
        let mut close: Vec<Option<f64>> = (0..10).map(|i| Some(100.0 + f64::from(i % 2))).collect();
        close[3] = Some(10_000.0);

        let mut options = options();
        options.cleaning.outliers = Some(OutlierTreatment::Clip);
        let outcome = analyze_table("SPIKE", &table(close), &options, &AnalyticsEngine::default()).unwrap();

        assert_eq!(outcome.iqr_outliers, 1);
        assert!(outcome.report.max_profit < 10.0);
    }

    #[test]
    fn missing_price_column_is_reported() {
        let mut options = options();
        options.column = "Adj Close".to_string();
        let error = analyze_table("X", &table(vec![Some(1.0)]), &options, &AnalyticsEngine::default())
            .unwrap_err();

        assert_eq!(
            error.downcast_ref::<CoreError>(),
            Some(&CoreError::MissingColumns(vec!["Adj Close".to_string()]))
        );
    }

    #[test]
    fn require_ohlc_needs_every_price_column() {
        let mut options = options();
        options.require_ohlc = true;
        let error = analyze_table("X", &table(vec![Some(1.0)]), &options, &AnalyticsEngine::default())
            .unwrap_err();

        assert_eq!(
            error.downcast_ref::<CoreError>(),
            Some(&CoreError::MissingColumns(vec![
                "Open".to_string(),
                "High".to_string(),
                "Low".to_string(),
            ]))
        );
    }

    fn ohlc_table() -> PriceTable {
        // Mon..Thu.
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let stamps = TimeSeries::daily(start, vec![(); 4]).timestamps().collect();
        PriceTable::new(stamps)
            .unwrap()
            .with_column("Open", vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)])
            .unwrap()
            .with_column("High", vec![Some(2.0), Some(3.0), Some(4.0), Some(5.0)])
            .unwrap()
            .with_column("Low", vec![Some(0.5), Some(1.5), Some(2.5), Some(3.5)])
            .unwrap()
            .with_column("Close", vec![Some(1.5), None, Some(3.5), Some(4.5)])
            .unwrap()
            .with_column("Adj Close", vec![Some(1.0), Some(1.5), None, Some(2.5)])
            .unwrap()
    }

    #[test]
    fn require_ohlc_still_analyzes_other_columns() {
        let mut options = options();
        options.require_ohlc = true;
        options.column = "Adj Close".to_string();

        let outcome = analyze_table("X", &ohlc_table(), &options, &AnalyticsEngine::default()).unwrap();
        assert_eq!(outcome.cleaned_rows, 4);
        // 1.0, 1.5, 1.5, 2.5
        assert_eq!(outcome.report.max_profit, 1.5);
    }

    #[test]
    fn require_ohlc_takes_price_columns_from_the_cleaned_table() {
        let mut options = options();
        options.require_ohlc = true;
        options.column = "close".to_string();

        let outcome = analyze_table("X", &ohlc_table(), &options, &AnalyticsEngine::default()).unwrap();
        // 1.5, 1.5, 3.5, 4.5
        assert_eq!(outcome.report.max_profit, 3.0);
        assert_eq!(outcome.missing_before_cleaning, 1);
    }

    #[test]
    fn all_missing_column_is_an_error() {
        let error = analyze_table("X", &table(vec![None, None]), &options(), &AnalyticsEngine::default())
            .unwrap_err();
        assert!(error.to_string().contains("has no usable prices"));
    }

    #[test]
    fn ranking_keeps_repeated_symbols_apart() {
        let engine = AnalyticsEngine::default();
        let run = |symbol: &str, close: Vec<Option<f64>>| {
            analyze_table(symbol, &table(close), &options(), &engine).unwrap()
        };
        let outcomes = vec![
            run("AAA", vec![Some(1.0), Some(2.0)]),
            run("BBB", vec![Some(1.0), Some(1.0)]),
            run("AAA", vec![Some(1.0), Some(5.0)]),
        ];

        let ranked = rank_outcomes(outcomes);
        let order: Vec<(&str, f64)> = ranked
            .iter()
            .map(|o| (o.symbol.as_str(), o.report.max_profit))
            .collect();
        assert_eq!(order, vec![("AAA", 4.0), ("AAA", 1.0), ("BBB", 0.0)]);
    }
}
