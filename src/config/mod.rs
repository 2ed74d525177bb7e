use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// Where the spreadsheet export comes from and how it is fetched
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Full CSV export URL. Takes precedence over `sheet_id`.
    #[serde(default)]
    pub csv_url: Option<String>,

    /// Google Sheets document id, used to build the export URL.
    #[serde(default)]
    pub sheet_id: Option<String>,

    #[serde(default = "default_gid")]
    pub gid: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_retry_base_ms")]
    pub retry_base_ms: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

/// What the ingest does with tickers that appear on several rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the last row for each symbol.
    #[default]
    LastWins,
    /// Refuse the whole sheet.
    Reject,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IngestConfig {
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_gid() -> String {
    "0".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_retry_base_ms() -> u64 {
    500
}
fn default_max_retries() -> usize {
    3
}
fn default_user_agent() -> String {
    "sheet-tickers/0.1 (portfolio sheet sync)".to_string()
}
fn default_db_path() -> PathBuf {
    PathBuf::from("data/sheet_tickers.duckdb")
}
fn default_true() -> bool {
    true
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            csv_url: None,
            sheet_id: None,
            gid: default_gid(),
            timeout_secs: default_timeout_secs(),
            retry_base_ms: default_retry_base_ms(),
            max_retries: default_max_retries(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            run_migrations: true,
        }
    }
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("SHEET").separator("__"))
            .build()?;

        cfg.try_deserialize().context("Invalid configuration")
    }
}
