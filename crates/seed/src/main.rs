//! UniPath Seed Tool
//!
//! Loads a university data set and upserts it into the record store by slug.
//! The source is the bundled catalog unless `--file` or `--from-url` is given.

mod seeder;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use unipath_common::{catalog::RemoteCatalog, db::DbPool, telemetry, AppConfig, Repository};

use seeder::{parse_records, seed_records, BUNDLED_CATALOG};

#[derive(Parser)]
#[command(name = "seed")]
#[command(about = "Upsert the university catalog into the record store")]
#[command(version)]
struct Cli {
    /// Read records from a JSON file instead of the bundled catalog
    #[arg(long, conflicts_with = "from_url")]
    file: Option<PathBuf>,

    /// Fetch records from another deployment's listing endpoint
    #[arg(long)]
    from_url: Option<String>,

    /// Validate and report without writing
    #[arg(long)]
    dry_run: bool,

    /// Config file path (default: config/default plus APP_ENV overlays)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(&path.to_string_lossy()),
        None => AppConfig::load(),
    }
    .context("failed to load configuration")?;

    telemetry::init_tracing(&config.observability);

    let records = if let Some(path) = &cli.file {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        parse_records(&json)?
    } else if let Some(url) = &cli.from_url {
        RemoteCatalog::new(url.as_str(), config.remote_timeout())?
            .fetch_all()
            .await?
    } else {
        parse_records(BUNDLED_CATALOG)?
    };

    tracing::info!(records = records.len(), dry_run = cli.dry_run, "Seeding universities");

    let pool = DbPool::new(&config.database).await?;
    pool.ensure_schema().await?;
    let repository = Repository::new(pool);

    let report = seed_records(&repository, records, cli.dry_run).await?;

    tracing::info!(
        inserted = report.inserted,
        updated = report.updated,
        skipped = report.skipped,
        unknown_countries = report.unknown_countries,
        off_list_facets = report.off_list_facets,
        "Seeding complete"
    );

    Ok(())
}
