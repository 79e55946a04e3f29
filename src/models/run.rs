use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::constants::{
    ATMOSPHERE_FILE_PREFIX, FORECAST_FILE_EXTENSION, RUN_DIR_PREFIX, RUN_STAMP_FORMAT,
    WIND_FILE_PREFIX,
};

/// One published forecast run, identified by the timestamp baked into its
/// directory name (`Forecasts_09_12_07_11h40m52s`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ForecastRun {
    pub stamp: DateTime<Utc>,
}

impl ForecastRun {
    pub fn new(stamp: DateTime<Utc>) -> Self {
        Self { stamp }
    }

    /// Parse a run from its directory name. Returns `None` for anything that
    /// does not match the publisher's naming exactly.
    pub fn from_dir_name(name: &str) -> Option<Self> {
        let stamp = name.strip_prefix(RUN_DIR_PREFIX)?;
        let naive = NaiveDateTime::parse_from_str(stamp, RUN_STAMP_FORMAT).ok()?;
        Some(Self {
            stamp: naive.and_utc(),
        })
    }

    pub fn stamp_string(&self) -> String {
        self.stamp.format(RUN_STAMP_FORMAT).to_string()
    }

    pub fn dir_name(&self) -> String {
        format!("{}{}", RUN_DIR_PREFIX, self.stamp_string())
    }

    /// Wind file name inside the run directory, e.g.
    /// `time_HotSprings_09_12_07_11h40m52s.txt`.
    pub fn wind_file_name(&self, station: &str) -> String {
        format!(
            "{}{}_{}.{}",
            WIND_FILE_PREFIX,
            station,
            self.stamp_string(),
            FORECAST_FILE_EXTENSION
        )
    }

    /// Atmosphere file name inside the run directory, e.g.
    /// `time_avrg_09_12_07_11h40m52s.txt`.
    pub fn atmosphere_file_name(&self) -> String {
        format!(
            "{}{}.{}",
            ATMOSPHERE_FILE_PREFIX,
            self.stamp_string(),
            FORECAST_FILE_EXTENSION
        )
    }

    /// How far this run precedes `reference`. Negative if the run is newer.
    pub fn age_at(&self, reference: DateTime<Utc>) -> Duration {
        reference - self.stamp
    }
}
