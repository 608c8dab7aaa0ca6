mod loader;
mod logging;
mod pipeline;
mod render;

use analytics::AnalyticsEngine;
use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use configuration::{OutlierSetting, Settings};
use core_types::{Horizon, Interval};
use indicatif::{ProgressBar, ProgressStyle};
use pipeline::{PipelineOptions, TickerOutcome, analyze_table, rank_outcomes};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// The main entry point for the tickerlens application.
fn main() -> anyhow::Result<()> {
    // Load TICKERLENS__* overrides and RUST_LOG from a .env file, if present.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let settings = configuration::load_config(cli.config.as_deref())?;
    let _log_guard = logging::init_logging(&settings.logging)?;
    tracing::debug!(?settings, "Starting tickerlens");

    // Execute the appropriate command
    match cli.command {
        Commands::Analyze(args) => handle_analyze(args, &settings),
        Commands::Batch(args) => handle_batch(args, &settings),
        Commands::Intervals(args) => handle_intervals(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Cleans daily price exports and computes trend, return and profit analytics.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML settings file. Defaults to `tickerlens.toml` if it exists.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean and analyze a single ticker's price file.
    Analyze(AnalyzeArgs),
    /// Analyze many price files in parallel and rank them by max profit.
    Batch(BatchArgs),
    /// Show the date window and sampling intervals of a horizon.
    Intervals(IntervalsArgs),
}

/// Flags shared by the analysis commands; each overrides its setting.
#[derive(Parser)]
struct CleaningArgs {
    /// The price column to analyze (e.g., "Close", "Adj Close").
    #[arg(long)]
    column: Option<String>,

    /// How IQR outliers are handled before gap filling.
    #[arg(long, value_enum)]
    outliers: Option<OutlierSetting>,

    /// The IQR fence multiplier k.
    #[arg(long = "iqr-k")]
    iqr_k: Option<f64>,

    /// Clean the Open, High, Low and Close columns together.
    #[arg(long)]
    require_ohlc: bool,

    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// A CSV file with a timestamp column and price columns.
    #[arg(long, short)]
    input: PathBuf,

    /// The ticker symbol to display. Defaults to the file stem.
    #[arg(long)]
    symbol: Option<String>,

    #[command(flatten)]
    cleaning: CleaningArgs,
}

#[derive(Parser)]
struct BatchArgs {
    /// One CSV file per ticker; the symbol is taken from the file stem.
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<PathBuf>,

    #[command(flatten)]
    cleaning: CleaningArgs,
}

#[derive(Parser)]
struct IntervalsArgs {
    /// One of 1d, 5d, 1mo, 6mo, 1y, 3y, 5y.
    #[arg(long, default_value = "1y")]
    horizon: Horizon,

    /// The last day of the window (format: YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Sampling interval to select, e.g. 15m or 1wk. Defaults to the horizon's first.
    #[arg(long)]
    interval: Option<Interval>,
}

impl CleaningArgs {
    fn apply(&self, mut options: PipelineOptions) -> anyhow::Result<PipelineOptions> {
        if let Some(column) = &self.column {
            options.column = column.clone();
        }
        if let Some(outliers) = self.outliers {
            options.cleaning.outliers = outliers.treatment();
        }
        if let Some(k) = self.iqr_k {
            anyhow::ensure!(k.is_finite() && k >= 0.0, "--iqr-k must be a non-negative number");
            options.cleaning.iqr_multiplier = k;
        }
        options.require_ohlc |= self.require_ohlc;
        Ok(options)
    }
}

fn symbol_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_uppercase())
        .unwrap_or_else(|| path.display().to_string())
}

fn engine_from_settings(settings: &Settings) -> anyhow::Result<AnalyticsEngine> {
    AnalyticsEngine::new(settings.analysis.sma_windows.clone()).context("Invalid SMA windows")
}

fn run_one(
    path: &Path,
    symbol: &str,
    settings: &Settings,
    options: &PipelineOptions,
    engine: &AnalyticsEngine,
) -> anyhow::Result<TickerOutcome> {
    let table = loader::load_price_table(path, &settings.data.timestamp_column)?;
    analyze_table(symbol, &table, options, engine)
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_analyze(args: AnalyzeArgs, settings: &Settings) -> anyhow::Result<()> {
    let options = args.cleaning.apply(PipelineOptions::from_settings(settings))?;
    let engine = engine_from_settings(settings)?;
    let symbol = args
        .symbol
        .unwrap_or_else(|| symbol_from_path(&args.input));

    tracing::info!(%symbol, input = %args.input.display(), column = %options.column, "Analyzing");
    let outcome = run_one(&args.input, &symbol, settings, &options, &engine)
        .with_context(|| format!("Failed to analyze {}", args.input.display()))?;

    if args.cleaning.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", render::outcome_table(&outcome));
    }
    Ok(())
}

fn handle_batch(args: BatchArgs, settings: &Settings) -> anyhow::Result<()> {
    let options = args.cleaning.apply(PipelineOptions::from_settings(settings))?;
    let engine = engine_from_settings(settings)?;

    tracing::info!(
        files = args.input.len(),
        threads = rayon::current_num_threads(),
        "Starting batch analysis"
    );

    // Set up the progress bar
    let progress_bar = ProgressBar::new(args.input.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("#>-"),
    );

    let results: Vec<(String, anyhow::Result<TickerOutcome>)> = args
        .input
        .par_iter()
        .map(|path| {
            let symbol = symbol_from_path(path);
            let result = run_one(path, &symbol, settings, &options, &engine);
            progress_bar.inc(1);
            progress_bar.set_message(symbol.clone());
            (symbol, result)
        })
        .collect();

    progress_bar.finish_with_message("Batch complete!");

    let mut outcomes = Vec::with_capacity(results.len());
    for (symbol, result) in results {
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => tracing::warn!(%symbol, error = %format!("{e:#}"), "Skipping ticker"),
        }
    }
    anyhow::ensure!(!outcomes.is_empty(), "No ticker could be analyzed");

    let ranked = rank_outcomes(outcomes);
    if args.cleaning.json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
    } else {
        println!("{}", render::ranking_table(&ranked));
    }
    Ok(())
}

fn handle_intervals(args: IntervalsArgs) -> anyhow::Result<()> {
    let selected = select_interval(args.horizon, args.interval)?;
    let end = args.end.unwrap_or_else(|| Local::now().date_naive());
    let (start, end) = args.horizon.window_ending(end)?;
    println!("{}", render::intervals_table(args.horizon, start, end, selected));
    Ok(())
}

/// The requested interval if the horizon offers it, else the horizon's default.
fn select_interval(horizon: Horizon, requested: Option<Interval>) -> anyhow::Result<Interval> {
    let offered = horizon.intervals();
    match requested {
        Some(interval) if offered.contains(&interval) => Ok(interval),
        Some(interval) => anyhow::bail!(
            "The {} horizon does not offer the {interval} interval",
            horizon.label()
        ),
        None => offered
            .first()
            .copied()
            .with_context(|| format!("The {} horizon offers no interval", horizon.label())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_settings() {
        let cli = Cli::try_parse_from([
            "tickerlens",
            "analyze",
            "--input",
            "aapl.csv",
            "--column",
            "Adj Close",
            "--outliers",
            "clip",
            "--iqr-k",
            "1.5",
        ])
        .unwrap();
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };

        let options = args
            .cleaning
            .apply(PipelineOptions::from_settings(&Settings::default()))
            .unwrap();
        assert_eq!(options.column, "Adj Close");
        assert_eq!(options.cleaning.outliers, Some(core_types::OutlierTreatment::Clip));
        assert_eq!(options.cleaning.iqr_multiplier, 1.5);
        assert_eq!(symbol_from_path(&args.input), "AAPL");
    }

    #[test]
    fn horizon_parses_from_flag() {
        let cli = Cli::try_parse_from(["tickerlens", "intervals", "--horizon", "5d"]).unwrap();
        let Commands::Intervals(args) = cli.command else {
            panic!("expected intervals");
        };
        assert_eq!(args.horizon, Horizon::FiveDays);
        assert_eq!(args.interval, None);
    }

    #[test]
    fn interval_must_be_offered_by_the_horizon() {
        let cli = Cli::try_parse_from(["tickerlens", "intervals", "--horizon", "1d", "--interval", "15m"])
            .unwrap();
        let Commands::Intervals(args) = cli.command else {
            panic!("expected intervals");
        };
        assert_eq!(args.interval, Some(Interval::FifteenMinutes));
        assert_eq!(select_interval(args.horizon, args.interval).unwrap(), Interval::FifteenMinutes);

        assert!(select_interval(Horizon::OneYear, Some(Interval::FifteenMinutes)).is_err());
        assert_eq!(select_interval(Horizon::OneYear, None).unwrap(), Interval::OneDay);
        assert!(Cli::try_parse_from(["tickerlens", "intervals", "--interval", "2h"]).is_err());
    }

    #[test]
    fn batch_ranks_files_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let write = |name: &str, closes: &[f64]| {
            let mut contents = String::from("Date,Close\n");
            for (day, close) in closes.iter().enumerate() {
                contents.push_str(&format!("2024-01-{:02},{close}\n", day + 1));
            }
            let path = dir.path().join(name);
            std::fs::write(&path, contents).unwrap();
            path
        };
        let flat = write("flat.csv", &[5.0, 5.0, 5.0]);
        let rising = write("rise.csv", &[1.0, 2.0, 4.0]);

        let settings = Settings::default();
        let options = PipelineOptions::from_settings(&settings);
        let engine = engine_from_settings(&settings).unwrap();

        let mut outcomes = Vec::new();
        for path in [&flat, &rising] {
            let symbol = symbol_from_path(path);
            outcomes.push(run_one(path, &symbol, &settings, &options, &engine).unwrap());
        }

        let ranked = rank_outcomes(outcomes);
        assert_eq!(ranked[0].symbol, "RISE");
        assert_eq!(ranked[0].report.max_profit, 3.0);
        assert_eq!(ranked[1].report.max_profit, 0.0);
    }
}
