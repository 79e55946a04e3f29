use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::db::{ImportLoader, WeatherDb};
use crate::discovery::{LocatedRun, RunLocator};
use crate::error::Result;
use crate::models::{ForecastRecord, ForecastRun};
use crate::processors::RecordMerger;
use crate::utils::progress::ProgressReporter;

/// Outcome of one import pass.
#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub run: ForecastRun,
    pub wind_path: PathBuf,
    pub atmosphere_path: PathBuf,
    pub records_parsed: usize,
    pub records_inserted: usize,
}

/// Ties run discovery, record merging and loading together for one
/// reference time.
pub struct ImportEngine {
    locator: RunLocator,
}

impl ImportEngine {
    pub fn new(locator: RunLocator) -> Self {
        Self { locator }
    }

    /// Locate the freshest run and merge its files without touching the
    /// database. This is the read-only half of an import.
    pub fn stage(&self, reference: DateTime<Utc>) -> Result<(LocatedRun, Vec<ForecastRecord>)> {
        let located = self.locator.locate(reference)?;
        info!(
            run = %located.run.stamp_string(),
            wind = %located.wind_path.display(),
            atmosphere = %located.atmosphere_path.display(),
            "staging forecast run"
        );

        let records =
            RecordMerger::new(reference).merge(&located.wind_path, &located.atmosphere_path)?;
        Ok((located, records))
    }

    /// Full import: stage the freshest run, then load it idempotently.
    pub async fn import(
        &self,
        db: &WeatherDb,
        reference: DateTime<Utc>,
        progress: Option<&ProgressReporter>,
    ) -> Result<ImportSummary> {
        let (located, records) = self.stage(reference)?;

        let mut loader = ImportLoader::new(db);
        if let Some(progress) = progress {
            loader = loader.with_progress(progress);
        }
        let inserted = loader.load(&records, located.run.stamp, reference).await?;

        Ok(ImportSummary {
            run: located.run,
            wind_path: located.wind_path,
            atmosphere_path: located.atmosphere_path,
            records_parsed: records.len(),
            records_inserted: inserted,
        })
    }
}
