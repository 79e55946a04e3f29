use anyhow::Context;
use clap::Parser;
use cleo_importer::cli::{run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli).await.context("forecast import failed")
}
