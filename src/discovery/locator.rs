use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ImportError, Result};
use crate::models::ForecastRun;
use crate::utils::constants::DEFAULT_LOOKBACK_HOURS;

/// The selected input pair for one import: the freshest wind and atmosphere
/// files at or before the reference time.
///
/// The publisher writes the two files from separate invocations seconds
/// apart, so they may sit in sibling run directories; `run` is the earlier
/// of the two stamps, the start of the invocation that produced the pair.
#[derive(Debug, Clone)]
pub struct LocatedRun {
    pub run: ForecastRun,
    pub wind_path: PathBuf,
    pub atmosphere_path: PathBuf,
}

/// One run directory found under the forecast root, with the files it holds.
#[derive(Debug, Clone, Serialize)]
pub struct RunListing {
    pub run: ForecastRun,
    pub directory: String,
    pub has_wind: bool,
    pub has_atmosphere: bool,
}

pub struct RunLocator {
    root: PathBuf,
    station: String,
    lookback: Duration,
}

impl RunLocator {
    pub fn new(root: impl Into<PathBuf>, station: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            station: station.into(),
            lookback: Duration::hours(DEFAULT_LOOKBACK_HOURS),
        }
    }

    pub fn with_lookback_hours(mut self, hours: i64) -> Self {
        self.lookback = Duration::hours(hours);
        self
    }

    /// Pick the wind file and the atmosphere file for `reference`, each from
    /// the most recent run at or before it within the look-back window.
    pub fn locate(&self, reference: DateTime<Utc>) -> Result<LocatedRun> {
        let listings = self.scan()?;

        let wind = self
            .freshest(&listings, reference, |listing| listing.has_wind)
            .ok_or_else(|| self.not_found("wind", reference))?;
        let atmosphere = self
            .freshest(&listings, reference, |listing| listing.has_atmosphere)
            .ok_or_else(|| self.not_found("atmosphere", reference))?;

        debug!(
            wind_run = %wind.run.stamp,
            atmosphere_run = %atmosphere.run.stamp,
            "selected forecast files"
        );

        Ok(LocatedRun {
            run: wind.run.min(atmosphere.run),
            wind_path: self
                .root
                .join(&wind.directory)
                .join(wind.run.wind_file_name(&self.station)),
            atmosphere_path: self
                .root
                .join(&atmosphere.directory)
                .join(atmosphere.run.atmosphere_file_name()),
        })
    }

    /// List every well-formed run directory under the root, oldest first.
    /// Entries that do not match the publisher's naming are skipped.
    pub fn scan(&self) -> Result<Vec<RunListing>> {
        let mut listings = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();

            if !path.is_dir() {
                continue;
            }

            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };

            let Some(run) = ForecastRun::from_dir_name(name) else {
                debug!(directory = name, "skipping non-run directory");
                continue;
            };

            listings.push(RunListing {
                run,
                directory: name.to_string(),
                has_wind: path.join(run.wind_file_name(&self.station)).is_file(),
                has_atmosphere: path.join(run.atmosphere_file_name()).is_file(),
            });
        }

        listings.sort_by_key(|listing| listing.run);
        Ok(listings)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn freshest<'a>(
        &self,
        listings: &'a [RunListing],
        reference: DateTime<Utc>,
        carries_file: impl Fn(&RunListing) -> bool,
    ) -> Option<&'a RunListing> {
        listings
            .iter()
            .filter(|listing| {
                let age = listing.run.age_at(reference);
                age >= Duration::zero() && age <= self.lookback
            })
            .filter(|listing| carries_file(listing))
            .max_by_key(|listing| listing.run)
    }

    fn not_found(&self, kind: &'static str, reference: DateTime<Utc>) -> ImportError {
        ImportError::RunNotFound {
            kind,
            root: self.root.display().to_string(),
            reference,
            lookback_hours: self.lookback.num_hours(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    const STATION: &str = "HotSprings";

    fn make_run(root: &Path, dir_name: &str, wind: bool, atmosphere: bool) {
        let run = ForecastRun::from_dir_name(dir_name).unwrap();
        let dir = root.join(dir_name);
        fs::create_dir(&dir).unwrap();
        if wind {
            let mut file = File::create(dir.join(run.wind_file_name(STATION))).unwrap();
            writeln!(file, "55165.958333  9.44725").unwrap();
        }
        if atmosphere {
            File::create(dir.join(run.atmosphere_file_name())).unwrap();
        }
    }

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2009, 12, 7, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_locate_pair_split_across_directories() {
        let temp_dir = TempDir::new().unwrap();
        make_run(temp_dir.path(), "Forecasts_09_12_07_11h40m52s", true, false);
        make_run(temp_dir.path(), "Forecasts_09_12_07_11h40m57s", false, true);

        let locator = RunLocator::new(temp_dir.path(), STATION);
        let located = locator.locate(reference()).unwrap();

        assert_eq!(
            located.wind_path,
            temp_dir
                .path()
                .join("Forecasts_09_12_07_11h40m52s")
                .join("time_HotSprings_09_12_07_11h40m52s.txt")
        );
        assert_eq!(
            located.atmosphere_path,
            temp_dir
                .path()
                .join("Forecasts_09_12_07_11h40m57s")
                .join("time_avrg_09_12_07_11h40m57s.txt")
        );
        assert_eq!(
            located.run.stamp,
            Utc.with_ymd_and_hms(2009, 12, 7, 11, 40, 52).unwrap()
        );
    }

    #[test]
    fn test_locate_prefers_the_freshest_run() {
        let temp_dir = TempDir::new().unwrap();
        make_run(temp_dir.path(), "Forecasts_09_12_06_23h10m00s", true, true);
        make_run(temp_dir.path(), "Forecasts_09_12_07_11h40m52s", true, true);

        let locator = RunLocator::new(temp_dir.path(), STATION);
        let located = locator.locate(reference()).unwrap();

        assert_eq!(
            located.run.stamp,
            Utc.with_ymd_and_hms(2009, 12, 7, 11, 40, 52).unwrap()
        );
    }

    #[test]
    fn test_locate_ignores_runs_after_the_reference() {
        let temp_dir = TempDir::new().unwrap();
        make_run(temp_dir.path(), "Forecasts_09_12_07_11h40m52s", true, true);
        make_run(temp_dir.path(), "Forecasts_09_12_07_14h00m00s", true, true);

        let locator = RunLocator::new(temp_dir.path(), STATION);
        let located = locator.locate(reference()).unwrap();

        assert_eq!(
            located.run.stamp,
            Utc.with_ymd_and_hms(2009, 12, 7, 11, 40, 52).unwrap()
        );
    }

    #[test]
    fn test_locate_ignores_runs_outside_the_lookback_window() {
        let temp_dir = TempDir::new().unwrap();
        make_run(temp_dir.path(), "Forecasts_09_12_05_11h40m52s", true, true);

        let locator = RunLocator::new(temp_dir.path(), STATION);
        let error = locator.locate(reference()).unwrap_err();

        assert!(matches!(
            error,
            ImportError::RunNotFound { kind: "wind", .. }
        ));
    }

    #[test]
    fn test_locate_reports_the_missing_file_kind() {
        let temp_dir = TempDir::new().unwrap();
        make_run(temp_dir.path(), "Forecasts_09_12_07_11h40m52s", true, false);

        let locator = RunLocator::new(temp_dir.path(), STATION);
        let error = locator.locate(reference()).unwrap_err();

        assert!(matches!(
            error,
            ImportError::RunNotFound {
                kind: "atmosphere",
                ..
            }
        ));
    }

    #[test]
    fn test_locate_honours_the_station_name() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("Forecasts_09_12_07_11h40m52s");
        fs::create_dir(&dir).unwrap();
        File::create(dir.join("time_Elsewhere_09_12_07_11h40m52s.txt")).unwrap();
        File::create(dir.join("time_avrg_09_12_07_11h40m52s.txt")).unwrap();

        let locator = RunLocator::new(temp_dir.path(), STATION);
        assert!(locator.locate(reference()).is_err());

        let locator = RunLocator::new(temp_dir.path(), "Elsewhere");
        assert!(locator.locate(reference()).is_ok());
    }

    #[test]
    fn test_scan_skips_malformed_directories() {
        let temp_dir = TempDir::new().unwrap();
        make_run(temp_dir.path(), "Forecasts_09_12_07_11h40m52s", true, true);
        fs::create_dir(temp_dir.path().join("Forecasts_backup")).unwrap();
        fs::create_dir(temp_dir.path().join("scratch")).unwrap();
        File::create(temp_dir.path().join("notes.txt")).unwrap();

        let locator = RunLocator::new(temp_dir.path(), STATION);
        let listings = locator.scan().unwrap();

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].directory, "Forecasts_09_12_07_11h40m52s");
        assert!(listings[0].has_wind);
        assert!(listings[0].has_atmosphere);
    }

    #[test]
    fn test_scan_orders_runs_oldest_first() {
        let temp_dir = TempDir::new().unwrap();
        make_run(temp_dir.path(), "Forecasts_09_12_07_11h40m52s", true, true);
        make_run(temp_dir.path(), "Forecasts_09_12_06_23h10m00s", true, true);

        let locator = RunLocator::new(temp_dir.path(), STATION);
        let listings = locator.scan().unwrap();

        assert_eq!(listings.len(), 2);
        assert!(listings[0].run < listings[1].run);
    }
}
