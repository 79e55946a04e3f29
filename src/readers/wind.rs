use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Result;
use crate::readers::parse_error;
use crate::utils::constants::DEFAULT_BUFFER_SIZE;
use crate::utils::time::mjd_to_utc;

/// One line of a wind file: an MJD timestamp and a wind speed in mph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindObservation {
    pub timestamp: DateTime<Utc>,
    pub speed_mph: f64,
}

pub struct WindReader;

impl WindReader {
    pub fn new() -> Self {
        Self
    }

    /// Read all wind observations from a file. `#`-prefixed header lines and
    /// blank lines are skipped; anything else must parse, and timestamps must
    /// be strictly increasing.
    pub fn read(&self, path: &Path) -> Result<Vec<WindObservation>> {
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut observations = Vec::new();
        let mut previous: Option<DateTime<Utc>> = None;

        for (index, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let observation = self
                .parse_wind_line(trimmed)
                .map_err(|message| parse_error(path, index + 1, message))?;

            if let Some(previous) = previous {
                if observation.timestamp <= previous {
                    return Err(parse_error(
                        path,
                        index + 1,
                        format!(
                            "timestamps not strictly increasing: {} follows {}",
                            observation.timestamp, previous
                        ),
                    ));
                }
            }
            previous = Some(observation.timestamp);
            observations.push(observation);
        }

        Ok(observations)
    }

    fn parse_wind_line(&self, line: &str) -> std::result::Result<WindObservation, String> {
        let fields: Vec<&str> = line.split_whitespace().collect();

        if fields.len() != 2 {
            return Err(format!("expected 2 columns, found {}", fields.len()));
        }

        let mjd: f64 = fields[0]
            .parse()
            .map_err(|_| format!("invalid MJD value '{}'", fields[0]))?;

        let timestamp =
            mjd_to_utc(mjd).ok_or_else(|| format!("MJD {} is out of range", mjd))?;

        let speed_mph: f64 = fields[1]
            .parse()
            .map_err(|_| format!("invalid wind speed '{}'", fields[1]))?;

        Ok(WindObservation {
            timestamp,
            speed_mph,
        })
    }
}

impl Default for WindReader {
    fn default() -> Self {
        Self::new()
    }
}
