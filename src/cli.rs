//! CLI parser
use std::convert::Infallible;
use std::path::PathBuf;

use clap::Parser;
use url::Url;

use crate::concepts::GenerationMode;
use crate::constants::{DEFAULT_CREDENTIALS_PATH, DEFAULT_IMAGE_MODEL};
use crate::prompt::ArtStyle;
use crate::season::SeasonId;

fn parse_style(key: &str) -> Result<ArtStyle, Infallible> {
    Ok(ArtStyle::from_key(key))
}

#[derive(Parser, Debug)]
#[command(name = "cardgen")]
#[command(about = "Generate a season of trading cards: concepts, AI images, storage and records")]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "CARDGEN_DEBUG")]
    /// Enable debug logging. Env: CARDGEN_DEBUG
    pub debug: bool,

    #[clap(long, value_enum, env = "CARDGEN_MODE")]
    /// Generation mode; asked interactively when missing.
    /// Env: CARDGEN_MODE
    pub mode: Option<GenerationMode>,

    #[clap(long, env = "CARDGEN_THEME")]
    /// Theme keyword or free text; asked interactively when missing.
    /// Env: CARDGEN_THEME
    pub theme: Option<String>,

    #[clap(long, value_parser = parse_style, env = "CARDGEN_STYLE")]
    /// Art style, one of cute, cyberpunk, cartoon, fantasy, pixelArt or
    /// realistic; unknown styles are drawn cute. Asked interactively when missing.
    /// Env: CARDGEN_STYLE
    pub style: Option<ArtStyle>,

    #[clap(long, value_delimiter = ',')]
    /// Exactly 20 comma separated creature names for evolution lines.
    pub names: Option<Vec<String>>,

    #[clap(long, short)]
    /// Start without asking for confirmation
    pub yes: bool,

    #[clap(long, env = "CARDGEN_SEASON")]
    /// Season id, defaults to the current ISO week, eg `2025_S3_v1`.
    /// Env: CARDGEN_SEASON
    pub season: Option<SeasonId>,

    #[clap(long, default_value = DEFAULT_CREDENTIALS_PATH, env = "CARDGEN_CREDENTIALS")]
    /// Service account key file; the run aborts when it is missing.
    /// Env: CARDGEN_CREDENTIALS
    pub credentials: PathBuf,

    #[clap(long, default_value = "cardgen.sqlite", env = "CARDGEN_DATABASE_PATH")]
    /// Path to the database file, eg `/data/cardgen.sqlite`.
    /// Env: CARDGEN_DATABASE_PATH
    pub database_path: String,

    #[clap(
        long,
        default_value = "http://localhost:8080/v1/image_generation",
        env = "CARDGEN_GENERATOR_URL"
    )]
    /// Image generation endpoint.
    /// Env: CARDGEN_GENERATOR_URL
    pub generator_url: Url,

    #[clap(long, env = "CARDGEN_GENERATOR_API_KEY", hide_env_values = true)]
    /// Bearer token for the image generation endpoint.
    /// Env: CARDGEN_GENERATOR_API_KEY
    pub generator_api_key: Option<String>,

    #[clap(long, default_value = DEFAULT_IMAGE_MODEL, env = "CARDGEN_IMAGE_MODEL")]
    /// Image model.
    /// Env: CARDGEN_IMAGE_MODEL
    pub image_model: String,

    #[clap(long, default_value = "./storage", env = "CARDGEN_STORAGE_DIR")]
    /// Directory card images are stored under when no storage URL is set.
    /// Env: CARDGEN_STORAGE_DIR
    pub storage_dir: PathBuf,

    #[clap(long, env = "CARDGEN_STORAGE_URL")]
    /// Bucket URL to PUT card images to instead of the storage directory.
    /// Env: CARDGEN_STORAGE_URL
    pub storage_url: Option<Url>,

    #[clap(long, env = "CARDGEN_STORAGE_API_KEY", hide_env_values = true)]
    /// Bearer token for the storage URL.
    /// Env: CARDGEN_STORAGE_API_KEY
    pub storage_api_key: Option<String>,

    #[clap(long, env = "CARDGEN_PUBLIC_BASE_URL")]
    /// Base URL stored images are served from.
    /// Env: CARDGEN_PUBLIC_BASE_URL
    pub public_base_url: Option<Url>,
}
