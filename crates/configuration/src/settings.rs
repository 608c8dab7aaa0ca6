use crate::error::ConfigError;
use core_types::{GapFill, OutlierTreatment};
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in the file; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub analysis: AnalysisSettings,
    pub cleaning: CleaningSettings,
    pub data: DataSettings,
    pub logging: LoggingSettings,
}

/// Parameters for the analytics engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// One SMA overlay is computed per window.
    pub sma_windows: Vec<usize>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            sma_windows: vec![5, 20, 50],
        }
    }
}

/// Parameters for the cleaning pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CleaningSettings {
    pub gap_fill: GapFill,
    pub outliers: OutlierSetting,
    /// The `k` in `[Q1 - k*IQR, Q3 + k*IQR]`.
    pub iqr_multiplier: f64,
    /// Absolute z-score above which a daily return is reported as suspicious.
    pub return_zscore_threshold: f64,
}

impl Default for CleaningSettings {
    fn default() -> Self {
        Self {
            gap_fill: GapFill::default(),
            outliers: OutlierSetting::default(),
            iqr_multiplier: 3.0,
            return_zscore_threshold: 3.0,
        }
    }
}

/// How IQR outliers are handled before gap filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutlierSetting {
    /// Leave outliers in place.
    #[default]
    None,
    /// Replace outliers with gaps, which the gap fill then repairs.
    Mask,
    /// Winsorize outliers to the nearer fence.
    Clip,
}

impl OutlierSetting {
    pub fn treatment(self) -> Option<OutlierTreatment> {
        match self {
            OutlierSetting::None => None,
            OutlierSetting::Mask => Some(OutlierTreatment::Mask),
            OutlierSetting::Clip => Some(OutlierTreatment::Clip),
        }
    }
}

/// Column names used when reading price files.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub timestamp_column: String,
    pub price_column: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            timestamp_column: "Date".to_string(),
            price_column: "Close".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive, e.g. `info` or `tickerlens=debug,cleaning=trace`.
    pub level: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl Settings {
    /// Rejects values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let windows = &self.analysis.sma_windows;
        if windows.is_empty() {
            return Err(ConfigError::ValidationError(
                "analysis.sma_windows must list at least one window".to_string(),
            ));
        }
        if windows.contains(&0) {
            return Err(ConfigError::ValidationError(
                "analysis.sma_windows entries must be at least 1".to_string(),
            ));
        }

        let k = self.cleaning.iqr_multiplier;
        if !(k.is_finite() && k >= 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "cleaning.iqr_multiplier must be a non-negative number, got {k}"
            )));
        }

        let threshold = self.cleaning.return_zscore_threshold;
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "cleaning.return_zscore_threshold must be positive, got {threshold}"
            )));
        }

        for (key, value) in [
            ("data.timestamp_column", &self.data.timestamp_column),
            ("data.price_column", &self.data.price_column),
            ("logging.level", &self.logging.level),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!("{key} must not be empty")));
            }
        }

        Ok(())
    }
}
