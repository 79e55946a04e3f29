use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::debug;

use crate::error::{ImportError, Result};
use crate::models::ForecastRecord;
use crate::processors::BucketClassifier;
use crate::readers::{AtmosphereProfile, AtmosphereReader, WindObservation, WindReader};

/// Joins the wind file and the atmosphere file of one forecast run into
/// merged records, one per valid time.
pub struct RecordMerger {
    classifier: BucketClassifier,
}

impl RecordMerger {
    pub fn new(reference: DateTime<Utc>) -> Self {
        Self {
            classifier: BucketClassifier::new(reference),
        }
    }

    /// Parse both files and join them row by row on exact timestamps.
    pub fn merge(&self, wind_path: &Path, atmosphere_path: &Path) -> Result<Vec<ForecastRecord>> {
        let observations = WindReader::new().read(wind_path)?;
        let profiles = AtmosphereReader::new().read(atmosphere_path)?;

        debug!(
            wind_rows = observations.len(),
            atmosphere_rows = profiles.len(),
            "merging forecast series"
        );

        self.merge_series(observations, profiles)
    }

    /// Join pre-parsed series. The readers guarantee each side is strictly
    /// increasing, so equal lengths plus pairwise-equal timestamps make an
    /// exact one-to-one match.
    pub fn merge_series(
        &self,
        observations: Vec<WindObservation>,
        profiles: Vec<AtmosphereProfile>,
    ) -> Result<Vec<ForecastRecord>> {
        if observations.len() != profiles.len() {
            return Err(ImportError::SeriesMismatch(format!(
                "wind has {} rows, atmosphere has {}",
                observations.len(),
                profiles.len()
            )));
        }

        let mut records = Vec::with_capacity(observations.len());

        for (observation, profile) in observations.into_iter().zip(profiles) {
            if observation.timestamp != profile.timestamp {
                return Err(ImportError::SeriesMismatch(format!(
                    "wind row at {} paired against atmosphere row at {}",
                    observation.timestamp, profile.timestamp
                )));
            }

            let record = ForecastRecord::new(
                observation.timestamp,
                observation.speed_mph,
                profile.opacity,
                profile.tsys,
                profile.tatm,
                self.classifier.classify(observation.timestamp),
            );
            record.validate_channels()?;
            records.push(record);
        }

        Ok(records)
    }
}
