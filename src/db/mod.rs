use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Sqlite, SqlitePool};
use tracing::info;

use crate::error::Result;
use crate::processors::BucketClassifier;
use crate::utils::constants::FORECAST_TYPE_IDS;

pub mod loader;

pub use loader::ImportLoader;

/// Connection to the forecast store, plus schema management.
pub struct WeatherDb {
    pool: SqlitePool,
}

impl WeatherDb {
    /// Open the database, creating the file when it does not exist yet.
    pub async fn connect(database_url: &str) -> Result<Self> {
        if !database_url.contains(":memory:")
            && !Sqlite::database_exists(database_url).await.unwrap_or(false)
        {
            Sqlite::create_database(database_url).await?;
            info!(url = database_url, "created database");
        }

        // The importer writes sequentially; a single connection keeps the
        // per-record transactions strictly ordered.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;

        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&pool)
            .await?;
        sqlx::query("PRAGMA synchronous = NORMAL")
            .execute(&pool)
            .await?;
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Apply the schema and seed the bucket reference table. Safe to run on
    /// every start.
    pub async fn migrate(&self) -> Result<()> {
        for statement in SCHEMA_SQL.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed).execute(&self.pool).await?;
            }
        }
        self.seed_forecast_types().await
    }

    async fn seed_forecast_types(&self) -> Result<()> {
        for (index, id) in FORECAST_TYPE_IDS.iter().copied().enumerate() {
            let Some((from, to)) = BucketClassifier::lead_window(index) else {
                continue;
            };
            let description = format!("lead {} to {} hours", from, to);

            sqlx::query(
                "INSERT INTO forecast_types (id, description) VALUES (?, ?) \
                 ON CONFLICT(id) DO NOTHING",
            )
            .bind(id)
            .bind(description)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    /// Row counts per table, for reporting and tests.
    pub async fn table_counts(&self) -> Result<TableCounts> {
        Ok(TableCounts {
            import_times: self.count("import_times").await?,
            forecast_times: self.count("forecast_times").await?,
            weather_dates: self.count("weather_dates").await?,
            forecasts: self.count("forecasts").await?,
            forecast_by_frequency: self.count("forecast_by_frequency").await?,
        })
    }

    async fn count(&self, table: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Database schema. Uniqueness on `weather_dates.date` and on
/// `(weather_date_id, frequency)` is what makes re-imports no-ops.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS import_times (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS forecast_times (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS forecast_types (
    id INTEGER PRIMARY KEY,
    description TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS weather_dates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS forecasts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    weather_date_id INTEGER NOT NULL UNIQUE REFERENCES weather_dates(id),
    forecast_type_id INTEGER REFERENCES forecast_types(id),
    wind_speed REAL NOT NULL,
    wind_speed_mph REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS forecast_by_frequency (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    weather_date_id INTEGER NOT NULL REFERENCES weather_dates(id),
    frequency INTEGER NOT NULL,
    opacity REAL NOT NULL,
    tsys REAL NOT NULL,
    tatm REAL NOT NULL,
    UNIQUE(weather_date_id, frequency)
);

CREATE INDEX IF NOT EXISTS idx_forecasts_type ON forecasts(forecast_type_id);
CREATE INDEX IF NOT EXISTS idx_frequency_date ON forecast_by_frequency(weather_date_id);
"#;

/// Per-table row counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCounts {
    pub import_times: i64,
    pub forecast_times: i64,
    pub weather_dates: i64,
    pub forecasts: i64,
    pub forecast_by_frequency: i64,
}
