//! Importer configuration.

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::utils::constants::{DEFAULT_DATABASE_URL, DEFAULT_LOOKBACK_HOURS, DEFAULT_STATION};

/// Runtime settings, layered from built-in defaults, an optional
/// `cleo-importer.toml` in the working directory, and `CLEO_*` environment
/// variables. Command-line flags override all of these.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Database connection URL
    pub database_url: String,

    /// Directory holding the `Forecasts_*` run directories
    pub forecast_root: PathBuf,

    /// Station name embedded in wind file names
    pub station: String,

    /// How far behind the reference time to accept a run
    pub run_lookback_hours: i64,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("forecast_root", ".")?
            .set_default("station", DEFAULT_STATION)?
            .set_default("run_lookback_hours", DEFAULT_LOOKBACK_HOURS)?
            .add_source(File::with_name("cleo-importer").required(false))
            .add_source(Environment::with_prefix("CLEO"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
