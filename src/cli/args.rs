use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cleo-importer")]
#[command(about = "CLEO forecast normalization and database importer")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Suppress progress output")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import the freshest forecast run into the database
    Import {
        #[arg(
            short,
            long,
            help = "Directory containing Forecasts_* run directories [default: from configuration]"
        )]
        root: Option<PathBuf>,

        #[arg(short, long, help = "Database URL [default: from configuration]")]
        database: Option<String>,

        #[arg(
            long,
            help = "Reference time, RFC 3339 or 'YYYY-MM-DD HH:MM' [default: current hour]"
        )]
        reference: Option<String>,

        #[arg(short, long, help = "Station name embedded in wind file names")]
        station: Option<String>,

        #[arg(long, default_value = "false", help = "Parse and classify without writing")]
        dry_run: bool,
    },

    /// List the forecast runs visible under the root
    Inspect {
        #[arg(
            short,
            long,
            help = "Directory containing Forecasts_* run directories [default: from configuration]"
        )]
        root: Option<PathBuf>,

        #[arg(long, default_value = "false", help = "Emit the listing as JSON")]
        json: bool,
    },

    /// Create the database schema and seed the lead-time bucket table
    InitDb {
        #[arg(short, long, help = "Database URL [default: from configuration]")]
        database: Option<String>,
    },
}
