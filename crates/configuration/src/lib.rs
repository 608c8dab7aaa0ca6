use crate::error::ConfigError;
use config::{Environment, File, FileFormat};
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AnalysisSettings, CleaningSettings, DataSettings, LoggingSettings, OutlierSetting, Settings,
};

/// The file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_NAME: &str = "tickerlens";

/// Prefix of the environment overrides, e.g. `TICKERLENS__CLEANING__OUTLIERS=clip`.
pub const ENV_PREFIX: &str = "TICKERLENS";

/// Loads the application configuration.
///
/// Layers, lowest precedence first: built-in defaults, the TOML file (the
/// given `path`, which must exist, or an optional `tickerlens.toml`), then
/// `TICKERLENS__*` environment variables. The result is validated before it
/// is returned.
pub fn load_config(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(environment());

    finish(builder)
}

/// Loads settings from an in-memory TOML document, without environment
/// overrides.
pub fn load_config_from_str(toml: &str) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml));
    finish(builder)
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("analysis.sma_windows")
}

fn finish(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<Settings, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.build()?.try_deserialize::<Settings>()?;
    settings.validate()?;

    tracing::debug!(?settings, "Configuration loaded");
    Ok(settings)
}
