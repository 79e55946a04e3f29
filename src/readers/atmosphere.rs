use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Result;
use crate::readers::parse_error;
use crate::utils::constants::{ATMOSPHERE_COLUMNS, DEFAULT_BUFFER_SIZE, FREQUENCY_CHANNELS};
use crate::utils::time::mjd_to_utc;

/// One line of an atmosphere file: an MJD timestamp followed by the zenith
/// opacity, system temperature and atmospheric temperature for each of the
/// 50 frequency channels, in ascending channel order.
#[derive(Debug, Clone, PartialEq)]
pub struct AtmosphereProfile {
    pub timestamp: DateTime<Utc>,
    pub opacity: Vec<f64>,
    pub tsys: Vec<f64>,
    pub tatm: Vec<f64>,
}

pub struct AtmosphereReader;

impl AtmosphereReader {
    pub fn new() -> Self {
        Self
    }

    /// Read all atmosphere profiles from a file, with the same line rules as
    /// the wind reader: `#` headers and blank lines skipped, strict column
    /// count, strictly increasing timestamps.
    pub fn read(&self, path: &Path) -> Result<Vec<AtmosphereProfile>> {
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut profiles = Vec::new();
        let mut previous: Option<DateTime<Utc>> = None;

        for (index, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let profile = self
                .parse_profile_line(trimmed)
                .map_err(|message| parse_error(path, index + 1, message))?;

            if let Some(previous) = previous {
                if profile.timestamp <= previous {
                    return Err(parse_error(
                        path,
                        index + 1,
                        format!(
                            "timestamps not strictly increasing: {} follows {}",
                            profile.timestamp, previous
                        ),
                    ));
                }
            }
            previous = Some(profile.timestamp);
            profiles.push(profile);
        }

        Ok(profiles)
    }

    fn parse_profile_line(&self, line: &str) -> std::result::Result<AtmosphereProfile, String> {
        let fields: Vec<&str> = line.split_whitespace().collect();

        if fields.len() != ATMOSPHERE_COLUMNS {
            return Err(format!(
                "expected {} columns, found {}",
                ATMOSPHERE_COLUMNS,
                fields.len()
            ));
        }

        let mjd: f64 = fields[0]
            .parse()
            .map_err(|_| format!("invalid MJD value '{}'", fields[0]))?;

        let timestamp =
            mjd_to_utc(mjd).ok_or_else(|| format!("MJD {} is out of range", mjd))?;

        let mut values = Vec::with_capacity(3 * FREQUENCY_CHANNELS);
        for (offset, field) in fields[1..].iter().enumerate() {
            let value: f64 = field
                .parse()
                .map_err(|_| format!("invalid value '{}' in column {}", field, offset + 2))?;
            values.push(value);
        }

        let tatm = values.split_off(2 * FREQUENCY_CHANNELS);
        let tsys = values.split_off(FREQUENCY_CHANNELS);
        let opacity = values;

        Ok(AtmosphereProfile {
            timestamp,
            opacity,
            tsys,
            tatm,
        })
    }
}

impl Default for AtmosphereReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportError;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn profile_line(mjd: f64) -> String {
        let mut fields = vec![format!("{:.6}", mjd)];
        for channel in 0..FREQUENCY_CHANNELS {
            fields.push(format!("{:.5}", 0.040 + channel as f64 * 0.001));
        }
        for channel in 0..FREQUENCY_CHANNELS {
            fields.push(format!("{:.3}", 70.0 + channel as f64));
        }
        for channel in 0..FREQUENCY_CHANNELS {
            fields.push(format!("{:.3}", 255.0 + channel as f64 * 0.1));
        }
        fields.join("  ")
    }

    #[test]
    fn test_parse_profile_line() {
        let reader = AtmosphereReader::new();

        let profile = reader.parse_profile_line(&profile_line(55165.958333)).unwrap();
        assert_eq!(
            profile.timestamp,
            Utc.with_ymd_and_hms(2009, 11, 30, 23, 0, 0).unwrap()
        );
        assert_eq!(profile.opacity.len(), FREQUENCY_CHANNELS);
        assert_eq!(profile.tsys.len(), FREQUENCY_CHANNELS);
        assert_eq!(profile.tatm.len(), FREQUENCY_CHANNELS);
        assert!((profile.opacity[0] - 0.040).abs() < 1e-9);
        assert!((profile.tsys[49] - 119.0).abs() < 1e-9);
        assert!((profile.tatm[0] - 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_profile_line_column_count() {
        let reader = AtmosphereReader::new();

        let mut truncated = profile_line(55165.958333);
        truncated.truncate(truncated.rfind(' ').unwrap());
        let error = reader.parse_profile_line(truncated.trim()).unwrap_err();
        assert!(error.contains("expected 151 columns"));
    }

    #[test]
    fn test_parse_profile_line_bad_value() {
        let reader = AtmosphereReader::new();

        let line = profile_line(55165.958333).replace("70.000", "chilly");
        let error = reader.parse_profile_line(&line).unwrap_err();
        assert!(error.contains("chilly"));
    }

    #[test]
    fn test_read_profile_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "# MJD  tau(1..50)  tSys(1..50)  tAtm(1..50)")?;
        writeln!(temp_file, "{}", profile_line(55165.958333))?;
        writeln!(temp_file)?;
        writeln!(temp_file, "{}", profile_line(55166.0))?;

        let profiles = AtmosphereReader::new().read(temp_file.path())?;

        assert_eq!(profiles.len(), 2);
        assert_eq!(
            profiles[1].timestamp,
            Utc.with_ymd_and_hms(2009, 12, 1, 0, 0, 0).unwrap()
        );

        Ok(())
    }

    #[test]
    fn test_read_rejects_duplicate_timestamps() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "{}", profile_line(55165.958333))?;
        writeln!(temp_file, "{}", profile_line(55165.958333))?;

        let error = AtmosphereReader::new().read(temp_file.path()).unwrap_err();
        assert!(matches!(error, ImportError::Parse { line: 2, .. }));

        Ok(())
    }
}
