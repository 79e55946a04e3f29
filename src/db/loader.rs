use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite};
use tracing::{debug, info};

use crate::db::WeatherDb;
use crate::error::Result;
use crate::models::ForecastRecord;
use crate::utils::progress::ProgressReporter;
use crate::utils::time::truncate_to_minute;

/// Idempotent writer for merged forecast records.
///
/// Each record lands in its own transaction keyed by its valid time: when
/// `weather_dates` already holds the timestamp the whole record is skipped,
/// otherwise the forecast row and its per-frequency rows commit together.
pub struct ImportLoader<'a> {
    db: &'a WeatherDb,
    progress: Option<&'a ProgressReporter>,
    import_time: Option<DateTime<Utc>>,
}

impl<'a> ImportLoader<'a> {
    pub fn new(db: &'a WeatherDb) -> Self {
        Self {
            db,
            progress: None,
            import_time: None,
        }
    }

    pub fn with_progress(mut self, progress: &'a ProgressReporter) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Pin the `import_times` entry to a fixed instant. Without it, `load`
    /// stamps the wall-clock minute of the call.
    pub fn with_import_time(mut self, import_time: DateTime<Utc>) -> Self {
        self.import_time = Some(import_time);
        self
    }

    /// Load records produced by the run issued at `run_date`. Returns how
    /// many records were newly written; re-running over the same data
    /// returns 0 and changes nothing.
    pub async fn load(
        &self,
        records: &[ForecastRecord],
        run_date: DateTime<Utc>,
        reference: DateTime<Utc>,
    ) -> Result<usize> {
        let imported_at = truncate_to_minute(self.import_time.unwrap_or_else(Utc::now));

        sqlx::query("INSERT INTO import_times (date) VALUES (?) ON CONFLICT(date) DO NOTHING")
            .bind(imported_at)
            .execute(self.db.pool())
            .await?;
        sqlx::query("INSERT INTO forecast_times (date) VALUES (?) ON CONFLICT(date) DO NOTHING")
            .bind(run_date)
            .execute(self.db.pool())
            .await?;

        let mut inserted = 0;
        for record in records {
            if self.insert_record(record).await? {
                inserted += 1;
            } else {
                debug!(timestamp = %record.timestamp, "record already stored, skipped");
            }
            if let Some(progress) = self.progress {
                progress.increment(1);
            }
        }

        info!(
            run = %run_date,
            reference = %reference,
            parsed = records.len(),
            inserted,
            "forecast load complete"
        );

        Ok(inserted)
    }

    async fn insert_record(&self, record: &ForecastRecord) -> Result<bool> {
        let mut transaction = self.db.pool().begin().await?;

        let result =
            sqlx::query("INSERT INTO weather_dates (date) VALUES (?) ON CONFLICT(date) DO NOTHING")
                .bind(record.timestamp)
                .execute(&mut *transaction)
                .await?;

        if result.rows_affected() == 0 {
            transaction.rollback().await?;
            return Ok(false);
        }
        let weather_date_id = result.last_insert_rowid();

        sqlx::query(
            "INSERT INTO forecasts (weather_date_id, forecast_type_id, wind_speed, wind_speed_mph) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(weather_date_id)
        .bind(record.forecast_type_id)
        .bind(record.speed_ms)
        .bind(record.speed_mph)
        .execute(&mut *transaction)
        .await?;

        if !record.opacity.is_empty() {
            let channels = record
                .opacity
                .iter()
                .zip(record.tsys.iter())
                .zip(record.tatm.iter())
                .enumerate();

            let mut builder = QueryBuilder::<Sqlite>::new(
                "INSERT INTO forecast_by_frequency (weather_date_id, frequency, opacity, tsys, tatm) ",
            );
            builder.push_values(channels, |mut row, (channel, ((opacity, tsys), tatm))| {
                row.push_bind(weather_date_id)
                    .push_bind(ForecastRecord::frequency_ghz(channel))
                    .push_bind(*opacity)
                    .push_bind(*tsys)
                    .push_bind(*tatm);
            });
            builder.build().execute(&mut *transaction).await?;
        }

        transaction.commit().await?;
        Ok(true)
    }
}
