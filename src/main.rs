use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use cardgen::acquire::{HttpImageGenerator, ImageAcquirer};
use cardgen::cli::CliOptions;
use cardgen::concepts::validate_custom_names;
use cardgen::config::setup_logging;
use cardgen::constants::CARDS_PER_SEASON;
use cardgen::pipeline::{Pipeline, SeasonRequest};
use cardgen::season::SeasonId;
use cardgen::storage::{
    ArtifactStore, FsObjectStore, HttpDownloader, HttpObjectStore, ObjectStore,
};
use cardgen::{credentials, menu};
use clap::Parser;
use sea_orm_migration::MigratorTrait;
use tracing::{error, warn};
use url::Url;

/// Link to the database file, falling back to the plain path.
fn records_link(database_path: &str) -> String {
    Path::new(database_path)
        .canonicalize()
        .ok()
        .and_then(|path| Url::from_file_path(path).ok())
        .map(|url| url.to_string())
        .unwrap_or_else(|| database_path.to_string())
}

fn object_store(cli: &CliOptions) -> Result<Box<dyn ObjectStore>> {
    let store: Box<dyn ObjectStore> = match &cli.storage_url {
        Some(base) => Box::new(HttpObjectStore::new(
            base.clone(),
            cli.public_base_url.clone(),
            cli.storage_api_key.clone(),
        )?),
        None => Box::new(
            FsObjectStore::new(&cli.storage_dir, cli.public_base_url.clone())
                .with_context(|| format!("Failed to prepare {}", cli.storage_dir.display()))?,
        ),
    };
    Ok(store)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliOptions::parse();

    let _ = setup_logging(cli.debug);

    let account = match credentials::load(&cli.credentials) {
        Ok(account) => account,
        Err(err) => {
            error!("{err}");
            return Err(err.into());
        }
    };

    if let Some(names) = cli.names.as_deref()
        && let Err(err) = validate_custom_names(names)
    {
        warn!("{err}; the theme's default creatures will be used");
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();

    writeln!(stdout, "\nWeekly card generator")?;
    writeln!(stdout, "{}", "=".repeat(60))?;
    let mode = match cli.mode {
        Some(mode) => mode,
        None => menu::select_mode(&mut input, &mut stdout)?,
    };
    let theme = match cli.theme.clone() {
        Some(theme) => theme,
        None => menu::select_theme(&mut input, &mut stdout)?,
    };
    let style = match cli.style {
        Some(style) => style,
        None => menu::select_style(&mut input, &mut stdout)?,
    };
    let season = match cli.season.clone() {
        Some(season) => season,
        None => SeasonId::for_date(chrono::Local::now().date_naive()),
    };

    writeln!(stdout, "\n{}", "=".repeat(60))?;
    writeln!(stdout, "Configuration:")?;
    writeln!(stdout, "   Project: {}", account.project_id)?;
    writeln!(stdout, "   Season: {season}")?;
    writeln!(stdout, "   Mode: {mode}")?;
    writeln!(stdout, "   Theme: {theme}")?;
    writeln!(stdout, "   Style: {style}")?;
    writeln!(stdout, "   Cards: {CARDS_PER_SEASON}")?;
    writeln!(stdout, "{}", "=".repeat(60))?;

    if !cli.yes && !menu::confirm(&mut input, &mut stdout)? {
        writeln!(stdout, "Generation cancelled")?;
        return Ok(());
    }

    let db = cardgen::db::connect_db(&cli.database_path)
        .await
        .with_context(|| format!("Failed to open database {}", cli.database_path))?;
    cardgen::db::migrations::Migrator::up(&db, None)
        .await
        .context("Database migration failed")?;

    let generator = HttpImageGenerator::new(
        cli.generator_url.clone(),
        cli.generator_api_key.clone(),
    )?;
    let artifacts = ArtifactStore::new(
        Box::new(HttpDownloader::new()?),
        object_store(&cli)?,
        season,
    );
    let pipeline = Pipeline::new(
        ImageAcquirer::new(Box::new(generator), &cli.image_model),
        artifacts,
        db,
    );

    let request = SeasonRequest {
        mode,
        theme,
        style,
        custom_names: cli.names.clone(),
    };
    let summary = pipeline.generate_season(&request, &mut stdout).await?;
    summary.report(&mut stdout, &records_link(&cli.database_path))?;
    Ok(())
}
