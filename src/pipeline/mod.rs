//! Ingest orchestrator: sheet source → parser → duplicate policy → storage.
//!
//! The parser keeps every row and only counts symbols. What to do when a
//! ticker appears twice is decided here, from `ingest.duplicates`:
//!   - `last_wins`: the last row for a symbol is the one stored
//!   - `reject`: the whole sheet is refused and nothing is written
//!
//! Re-running on the same sheet is idempotent (ON CONFLICT DO UPDATE).

use crate::config::{AppConfig, DuplicatePolicy};
use crate::error::SheetError;
use crate::models::{IngestReport, ParsedSheet, SheetTicker};
use crate::sheet::parse_csv_text;
use crate::source::SheetSource;
use crate::storage::Repository;
use anyhow::{Context, Result};
use chrono::Utc;
use std::collections::HashMap;
use tracing::{info, warn};

/// Resolve duplicate symbols according to `policy`.
/// `LastWins` keeps each symbol at the position of its first appearance.
pub fn apply_duplicate_policy(
    parsed: ParsedSheet,
    policy: DuplicatePolicy,
) -> Result<Vec<SheetTicker>, SheetError> {
    let dups = parsed.duplicates();
    if dups.is_empty() {
        return Ok(parsed.tickers);
    }

    match policy {
        DuplicatePolicy::Reject => Err(SheetError::DuplicateSymbols(dups)),
        DuplicatePolicy::LastWins => {
            warn!("Duplicate tickers in sheet, keeping last row: {}", dups.join(", "));
            let mut position: HashMap<String, usize> = HashMap::new();
            let mut out: Vec<SheetTicker> = Vec::with_capacity(parsed.symbol_counts.len());
            for t in parsed.tickers {
                match position.get(&t.symbol) {
                    Some(&i) => out[i] = t,
                    None => {
                        position.insert(t.symbol.clone(), out.len());
                        out.push(t);
                    }
                }
            }
            Ok(out)
        }
    }
}

pub struct Pipeline {
    config: AppConfig,
}

impl Pipeline {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Parse without touching storage.
    pub async fn preview(&self, source: &dyn SheetSource) -> Result<ParsedSheet> {
        let text = source.fetch_csv().await?;
        Ok(parse_csv_text(&text)?)
    }

    pub async fn run(&self, source: &dyn SheetSource) -> Result<IngestReport> {
        let repo = Repository::open(&self.config.storage.db_path)
            .context("Failed to open DuckDB")?;

        if self.config.storage.run_migrations {
            repo.run_migrations()?;
        }

        let origin = source.describe();
        let run_id = repo.begin_ingest_run(&origin).unwrap_or(0);

        let result = self.ingest(&repo, source, origin).await;

        match &result {
            Ok(report) => {
                repo.finish_ingest_run(run_id, report.imported, None).ok();
                info!(
                    "=== Done: {} rows | {} imported | {} skipped | {} duplicate symbols ===",
                    report.total_rows,
                    report.imported,
                    report.skipped_rows,
                    report.duplicates.len(),
                );
            }
            Err(e) => {
                repo.finish_ingest_run(run_id, 0, Some(&format!("{:#}", e))).ok();
            }
        }

        result
    }

    async fn ingest(
        &self,
        repo: &Repository,
        source: &dyn SheetSource,
        origin: String,
    ) -> Result<IngestReport> {
        let text = source.fetch_csv().await?;
        let parsed = parse_csv_text(&text).context("Failed to parse sheet")?;

        let total_rows = parsed.tickers.len() + parsed.skipped_rows;
        let skipped_rows = parsed.skipped_rows;
        let duplicates = parsed.duplicates();
        info!("{} ticker rows parsed ({} skipped)", parsed.tickers.len(), skipped_rows);

        let tickers = apply_duplicate_policy(parsed, self.config.ingest.duplicates)?;
        let imported = repo.upsert_sheet_tickers(&tickers, Utc::now().naive_utc())?;

        Ok(IngestReport {
            source: origin,
            total_rows,
            imported,
            skipped_rows,
            duplicates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use async_trait::async_trait;

    struct StaticSource(&'static str);

    #[async_trait]
    impl SheetSource for StaticSource {
        fn describe(&self) -> String {
            "static".to_string()
        }

        async fn fetch_csv(&self) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    const SHEET: &str = "Company,Ticker,Currency,Price\n\
                         Example Corp,STO:EXM,SEK,\"100,5\"\n\
                         Other Corp,OTR,SEK,\n\
                         Example Corp B,EXM,SEK,\"123,45\"\n\
                         ,,,\n";

    fn parsed() -> ParsedSheet {
        parse_csv_text(SHEET).unwrap()
    }

    fn pipeline(dir: &tempfile::TempDir, policy: DuplicatePolicy) -> Pipeline {
        let mut config = AppConfig::default();
        config.storage = StorageConfig {
            db_path: dir.path().join("test.duckdb"),
            run_migrations: true,
        };
        config.ingest.duplicates = policy;
        Pipeline::new(config)
    }

    #[test]
    fn test_last_wins_keeps_last_row_in_first_position() {
        let tickers = apply_duplicate_policy(parsed(), DuplicatePolicy::LastWins).unwrap();
        assert_eq!(tickers.len(), 2);
        assert_eq!(tickers[0].symbol, "EXM");
        assert_eq!(tickers[0].name, "Example Corp B");
        assert_eq!(tickers[0].price, Some(123.45));
        assert_eq!(tickers[1].symbol, "OTR");
    }

    #[test]
    fn test_reject_names_duplicates() {
        let err = apply_duplicate_policy(parsed(), DuplicatePolicy::Reject).unwrap_err();
        match err {
            SheetError::DuplicateSymbols(syms) => assert_eq!(syms, vec!["EXM".to_string()]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_no_duplicates_passes_through() {
        let sheet = parse_csv_text("Company,Ticker,Price\nA,AAA,1\nB,BBB,2\n").unwrap();
        let tickers = apply_duplicate_policy(sheet, DuplicatePolicy::Reject).unwrap();
        assert_eq!(tickers.len(), 2);
    }

    #[test]
    fn test_run_stores_tickers() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(&dir, DuplicatePolicy::LastWins);

        let report = tokio_test::block_on(pipeline.run(&StaticSource(SHEET))).unwrap();
        assert_eq!(report.source, "static");
        assert_eq!(report.total_rows, 4);
        assert_eq!(report.imported, 2);
        assert_eq!(report.skipped_rows, 1);
        assert_eq!(report.duplicates, vec!["EXM".to_string()]);

        let repo = Repository::open(&dir.path().join("test.duckdb")).unwrap();
        let stored = repo.list_tickers().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].price, Some(123.45));
    }

    #[test]
    fn test_run_rejects_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(&dir, DuplicatePolicy::Reject);

        let err = tokio_test::block_on(pipeline.run(&StaticSource(SHEET))).unwrap_err();
        assert!(format!("{:#}", err).contains("EXM"));

        let repo = Repository::open(&dir.path().join("test.duckdb")).unwrap();
        assert_eq!(repo.ticker_count().unwrap(), 0);
    }

    #[test]
    fn test_preview_does_not_need_storage() {
        let pipeline = Pipeline::new(AppConfig::default());
        let parsed = tokio_test::block_on(pipeline.preview(&StaticSource(SHEET))).unwrap();
        assert_eq!(parsed.tickers.len(), 3);
    }
}
