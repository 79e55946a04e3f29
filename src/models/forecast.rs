use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ImportError, Result};
use crate::utils::constants::WIND_MPH_TO_MPS;

/// One fully merged forecast row: the wind observation and the per-frequency
/// atmosphere profile for a single valid time, annotated with its lead-time
/// bucket.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForecastRecord {
    pub timestamp: DateTime<Utc>,

    #[validate(range(min = 0.0, max = 200.0))]
    pub speed_mph: f64,

    #[validate(range(min = 0.0, max = 100.0))]
    pub speed_ms: f64,

    /// Zenith opacity per channel, nepers
    pub opacity: Vec<f64>,

    /// System temperature per channel, K
    pub tsys: Vec<f64>,

    /// Atmospheric temperature per channel, K
    pub tatm: Vec<f64>,

    /// Lead-time bucket, `None` when the valid time falls outside the horizon
    pub forecast_type_id: Option<i64>,
}

impl ForecastRecord {
    pub fn new(
        timestamp: DateTime<Utc>,
        speed_mph: f64,
        opacity: Vec<f64>,
        tsys: Vec<f64>,
        tatm: Vec<f64>,
        forecast_type_id: Option<i64>,
    ) -> Self {
        Self {
            timestamp,
            speed_mph,
            speed_ms: speed_mph * WIND_MPH_TO_MPS,
            opacity,
            tsys,
            tatm,
            forecast_type_id,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.opacity.len()
    }

    /// Channel index to frequency: channel 0 is 1 GHz.
    pub fn frequency_ghz(channel: usize) -> i64 {
        channel as i64 + 1
    }

    /// Check the record invariants: the three channel vectors stay
    /// index-aligned, and the wind fields are in range.
    pub fn validate_channels(&self) -> Result<()> {
        if self.tsys.len() != self.opacity.len() || self.tatm.len() != self.opacity.len() {
            return Err(ImportError::RecordValidation {
                message: format!(
                    "channel vectors differ in length at {}: opacity {}, tsys {}, tatm {}",
                    self.timestamp,
                    self.opacity.len(),
                    self.tsys.len(),
                    self.tatm.len()
                ),
            });
        }
        self.validate()?;
        Ok(())
    }
}
