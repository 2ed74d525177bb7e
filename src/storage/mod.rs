use crate::models::{SheetTicker, StoredTicker};
use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Utc};
use duckdb::{params, Connection};
use std::path::Path;
use tracing::info;

// ── Schema ────────────────────────────────────────────────────────────────────

const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS sheet_tickers (
    symbol       VARCHAR PRIMARY KEY,
    name         VARCHAR NOT NULL,
    currency     VARCHAR,
    price        DOUBLE,
    imported_at  TIMESTAMP NOT NULL
);

CREATE SEQUENCE IF NOT EXISTS ingest_run_seq START 1;

CREATE TABLE IF NOT EXISTS ingest_runs (
    id              INTEGER PRIMARY KEY DEFAULT nextval('ingest_run_seq'),
    started_at      TIMESTAMP NOT NULL,
    finished_at     TIMESTAMP,
    status          VARCHAR NOT NULL DEFAULT 'running',
    source          VARCHAR NOT NULL,
    rows_imported   INTEGER DEFAULT 0,
    error_msg       VARCHAR
);

CREATE TABLE IF NOT EXISTS schema_version (
    version     INTEGER PRIMARY KEY,
    applied_at  TIMESTAMP NOT NULL
);
"#;

// ── Repository ────────────────────────────────────────────────────────────────

pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Could not create dir {:?}", parent))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open DuckDB at {:?}", path))?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self { conn: Connection::open_in_memory()? })
    }

    pub fn run_migrations(&self) -> Result<()> {
        info!("Running migrations…");
        self.conn.execute_batch(DDL).context("DDL failed")?;
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (1, ?)",
            params![Utc::now().naive_utc()],
        )?;
        info!("Migrations done.");
        Ok(())
    }

    // ── Sheet tickers ─────────────────────────────────────────────────────────

    /// Upsert tickers keyed on symbol. A later row for the same symbol
    /// overwrites the earlier one, including clearing a price to NULL.
    pub fn upsert_sheet_tickers(&self, tickers: &[SheetTicker], now: NaiveDateTime) -> Result<usize> {
        if tickers.is_empty() { return Ok(0); }

        let tx = self.conn.unchecked_transaction()?;
        let sql = r#"
            INSERT INTO sheet_tickers (symbol, name, currency, price, imported_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (symbol) DO UPDATE SET
                name        = excluded.name,
                currency    = excluded.currency,
                price       = excluded.price,
                imported_at = excluded.imported_at
        "#;

        for t in tickers {
            tx.execute(sql, params![t.symbol, t.name, t.currency, t.price, now])
                .with_context(|| format!("upsert sheet ticker {}", t.symbol))?;
        }

        tx.commit()?;
        Ok(tickers.len())
    }

    pub fn list_tickers(&self) -> Result<Vec<StoredTicker>> {
        let mut stmt = self.conn.prepare(
            "SELECT symbol, name, currency, price, imported_at FROM sheet_tickers ORDER BY symbol",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok(StoredTicker {
                symbol: r.get(0)?,
                name: r.get(1)?,
                currency: r.get(2)?,
                price: r.get(3)?,
                imported_at: r.get(4)?,
            })
        })?;
        let mut tickers = Vec::new();
        for row in rows {
            tickers.push(row?);
        }
        Ok(tickers)
    }

    pub fn list_symbols(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT symbol FROM sheet_tickers ORDER BY symbol")?;
        let syms: Vec<String> = stmt
            .query_map([], |r| r.get(0))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(syms)
    }

    pub fn ticker_count(&self) -> Result<i64> {
        let mut s = self.conn.prepare("SELECT COUNT(*) FROM sheet_tickers")?;
        Ok(s.query_row([], |r| r.get(0))?)
    }

    pub fn priced_count(&self) -> Result<i64> {
        let mut s = self
            .conn
            .prepare("SELECT COUNT(*) FROM sheet_tickers WHERE price IS NOT NULL")?;
        Ok(s.query_row([], |r| r.get(0))?)
    }

    pub fn last_import(&self) -> Result<Option<NaiveDateTime>> {
        let mut s = self.conn.prepare("SELECT MAX(imported_at) FROM sheet_tickers")?;
        Ok(s.query_row([], |r| r.get(0))?)
    }

    // ── Ingest run log ────────────────────────────────────────────────────────

    pub fn begin_ingest_run(&self, source: &str) -> Result<i64> {
        let id: i64 = self.conn.query_row(
            "INSERT INTO ingest_runs (started_at, status, source) VALUES (?, 'running', ?) RETURNING id",
            params![Utc::now().naive_utc(), source],
            |r| r.get(0),
        )?;
        Ok(id)
    }

    pub fn finish_ingest_run(&self, run_id: i64, rows: usize, error: Option<&str>) -> Result<()> {
        self.conn.execute(
            r#"UPDATE ingest_runs SET
               finished_at = ?, status = ?, rows_imported = ?, error_msg = ?
               WHERE id = ?"#,
            params![
                Utc::now().naive_utc(),
                if error.is_none() { "success" } else { "error" },
                rows as i64, error, run_id,
            ],
        )?;
        Ok(())
    }

    pub fn ingest_run_status(&self, run_id: i64) -> Result<Option<String>> {
        let mut s = self.conn.prepare("SELECT status FROM ingest_runs WHERE id = ?")?;
        let mut rows = s.query_map(params![run_id], |r| r.get(0))?;
        Ok(rows.next().transpose()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker(symbol: &str, price: Option<f64>) -> SheetTicker {
        SheetTicker {
            name: format!("{symbol} AB"),
            symbol: symbol.to_string(),
            currency: Some("SEK".to_string()),
            price,
        }
    }

    fn repo() -> Repository {
        let repo = Repository::open_in_memory().unwrap();
        repo.run_migrations().unwrap();
        repo
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let repo = repo();
        repo.run_migrations().unwrap();
        assert_eq!(repo.ticker_count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_replaces_existing_symbol() {
        let repo = repo();
        let now = Utc::now().naive_utc();
        repo.upsert_sheet_tickers(&[ticker("EXM", Some(1.0)), ticker("OTR", None)], now)
            .unwrap();
        repo.upsert_sheet_tickers(&[ticker("EXM", Some(2.5))], now).unwrap();

        let stored = repo.list_tickers().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].symbol, "EXM");
        assert_eq!(stored[0].price, Some(2.5));
        assert_eq!(stored[1].price, None);
        assert_eq!(repo.priced_count().unwrap(), 1);
        assert_eq!(repo.list_symbols().unwrap(), vec!["EXM", "OTR"]);
    }

    #[test]
    fn test_ingest_run_log() {
        let repo = repo();
        let first = repo.begin_ingest_run("file:a.csv").unwrap();
        let second = repo.begin_ingest_run("file:b.csv").unwrap();
        assert_ne!(first, second);

        repo.finish_ingest_run(first, 10, None).unwrap();
        repo.finish_ingest_run(second, 0, Some("boom")).unwrap();
        assert_eq!(repo.ingest_run_status(first).unwrap().as_deref(), Some("success"));
        assert_eq!(repo.ingest_run_status(second).unwrap().as_deref(), Some("error"));
        assert_eq!(repo.ingest_run_status(999).unwrap(), None);
    }
}
