use chrono::Utc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::args::{Cli, Commands};
use crate::config::Settings;
use crate::db::{ImportLoader, WeatherDb};
use crate::discovery::RunLocator;
use crate::engine::ImportEngine;
use crate::error::Result;
use crate::utils::progress::ProgressReporter;
use crate::utils::time::{parse_reference, truncate_to_hour};

pub async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.verbose);

    let settings = Settings::load()?;

    match cli.command {
        Commands::Import {
            root,
            database,
            reference,
            station,
            dry_run,
        } => {
            let root = root.unwrap_or_else(|| settings.forecast_root.clone());
            let database_url = database.unwrap_or_else(|| settings.database_url.clone());
            let station = station.unwrap_or_else(|| settings.station.clone());
            let reference = match reference {
                Some(text) => parse_reference(&text)?,
                None => truncate_to_hour(Utc::now()),
            };

            println!("Importing forecast data...");
            println!("Forecast root: {}", root.display());
            println!("Station: {}", station);
            println!("Reference time: {}", reference);

            let locator = RunLocator::new(root, station)
                .with_lookback_hours(settings.run_lookback_hours);
            let engine = ImportEngine::new(locator);

            if dry_run {
                let spinner = ProgressReporter::new_spinner("Parsing forecast files...", cli.quiet);
                let (located, records) = engine.stage(reference)?;
                spinner.finish_with_message(&format!("Parsed {} records", records.len()));

                let classified = records
                    .iter()
                    .filter(|record| record.forecast_type_id.is_some())
                    .count();

                println!("Run: {}", located.run.stamp_string());
                println!("Wind file: {}", located.wind_path.display());
                println!("Atmosphere file: {}", located.atmosphere_path.display());
                println!(
                    "Parsed {} records, {} within the forecast horizon",
                    records.len(),
                    classified
                );
                println!("Dry run - nothing written");
                return Ok(());
            }

            let db = WeatherDb::connect(&database_url).await?;
            db.migrate().await?;

            let (located, records) = engine.stage(reference)?;

            let progress = ProgressReporter::new(
                records.len() as u64,
                "Importing forecast run...",
                cli.quiet,
            );
            progress.println(&format!("Selected run {}", located.run.stamp_string()));
            progress.set_message("Writing records...");

            let inserted = ImportLoader::new(&db)
                .with_progress(&progress)
                .load(&records, located.run.stamp, reference)
                .await?;

            progress.finish_with_message(&format!("Loaded {} new records", inserted));

            println!("Run: {}", located.run.stamp_string());
            println!("Wind file: {}", located.wind_path.display());
            println!("Atmosphere file: {}", located.atmosphere_path.display());
            println!("Records parsed: {}", records.len());
            println!("Records inserted: {}", inserted);
            if inserted == 0 {
                println!("Database already up to date");
            }

            println!("Import complete!");
        }

        Commands::Inspect { root, json } => {
            let root = root.unwrap_or_else(|| settings.forecast_root.clone());
            let locator = RunLocator::new(root, settings.station.clone());
            let listings = locator.scan()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&listings)?);
                return Ok(());
            }

            if listings.is_empty() {
                println!("No forecast runs found under {}", locator.root().display());
                return Ok(());
            }

            let now = Utc::now();
            println!("Found {} forecast runs:", listings.len());
            for listing in &listings {
                let age_hours = listing.run.age_at(now).num_minutes() as f64 / 60.0;
                println!(
                    "  {}  age {:>7.1} h  wind: {}  atmosphere: {}",
                    listing.run.stamp_string(),
                    age_hours,
                    if listing.has_wind { "yes" } else { "MISSING" },
                    if listing.has_atmosphere { "yes" } else { "MISSING" },
                );
            }
        }

        Commands::InitDb { database } => {
            let database_url = database.unwrap_or_else(|| settings.database_url.clone());
            println!("Initializing database: {}", database_url);

            let db = WeatherDb::connect(&database_url).await?;
            db.migrate().await?;

            let counts = db.table_counts().await?;
            println!("Schema ready");
            println!("  weather_dates: {} rows", counts.weather_dates);
            println!("  forecasts: {} rows", counts.forecasts);
            println!("  forecast_by_frequency: {} rows", counts.forecast_by_frequency);
            println!("  forecast_times: {} rows", counts.forecast_times);
            println!("  import_times: {} rows", counts.import_times);
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    // keeps repeat invocations from tests happy
    let _ = tracing::subscriber::set_global_default(subscriber);
}
