pub mod http_client;

use crate::config::SourceConfig;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};
use url::Url;

use self::http_client::HttpClient;

// ── Source trait ──────────────────────────────────────────────────────────────

/// Swappable origin of the spreadsheet CSV.
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Human readable origin, recorded with each ingest run.
    fn describe(&self) -> String;

    async fn fetch_csv(&self) -> Result<String>;
}

// ── Google Sheets ─────────────────────────────────────────────────────────────

const GOOGLE_SHEETS_BASE: &str = "https://docs.google.com/spreadsheets/d";

/// CSV export URL for a sheet: explicit `csv_url`, else built from `sheet_id` + `gid`.
pub fn export_url(config: &SourceConfig) -> Result<Url> {
    if let Some(raw) = config.csv_url.as_deref() {
        return Url::parse(raw).with_context(|| format!("Invalid csv_url {:?}", raw));
    }

    let Some(id) = config.sheet_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        bail!("No sheet configured: set source.csv_url or source.sheet_id");
    };

    let mut url = Url::parse(&format!("{}/{}/export", GOOGLE_SHEETS_BASE, id))
        .with_context(|| format!("Invalid sheet_id {:?}", id))?;
    url.query_pairs_mut()
        .append_pair("format", "csv")
        .append_pair("gid", &config.gid);
    Ok(url)
}

/// Unpublished sheets answer with a sign-in page instead of CSV.
fn looks_like_html(body: &str) -> bool {
    let head: String = body.trim_start().chars().take(15).collect();
    let head = head.to_ascii_lowercase();
    head.starts_with("<!doctype html") || head.starts_with("<html")
}

pub struct GoogleSheetSource {
    client: HttpClient,
    url: Url,
}

impl GoogleSheetSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(config)?,
            url: export_url(config)?,
        })
    }
}

#[async_trait]
impl SheetSource for GoogleSheetSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch_csv(&self) -> Result<String> {
        info!("Fetching sheet CSV from {}", self.url);
        let body = self.client.get_text(self.url.as_str()).await?;
        if looks_like_html(&body) {
            bail!("Arket är inte publicerat som CSV ({})", self.url);
        }
        debug!("Received {} bytes", body.len());
        Ok(body)
    }
}

// ── Local file ────────────────────────────────────────────────────────────────

pub struct FileSheetSource {
    path: PathBuf,
}

impl FileSheetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SheetSource for FileSheetSource {
    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }

    async fn fetch_csv(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {:?}", self.path))
    }
}
