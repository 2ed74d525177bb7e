use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Sheet ticker ──────────────────────────────────────────────────────────────

/// One instrument row from the spreadsheet, after cleaning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SheetTicker {
    pub name: String,
    pub symbol: String, // uppercase, exchange prefix stripped
    pub currency: Option<String>,
    pub price: Option<f64>,
}

/// Output of a single parse: every ticker row in sheet order plus how often
/// each symbol occurred. Duplicates are kept; the caller decides what to do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSheet {
    pub tickers: Vec<SheetTicker>,
    pub symbol_counts: HashMap<String, usize>,
    pub skipped_rows: usize,
}

impl ParsedSheet {
    /// Symbols that appear on more than one row, sorted.
    pub fn duplicates(&self) -> Vec<String> {
        let mut dups: Vec<String> = self
            .symbol_counts
            .iter()
            .filter(|(_, n)| **n > 1)
            .map(|(s, _)| s.clone())
            .collect();
        dups.sort();
        dups
    }
}

// ── Persisted ticker ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredTicker {
    pub symbol: String,
    pub name: String,
    pub currency: Option<String>,
    pub price: Option<f64>,
    pub imported_at: NaiveDateTime,
}

// ── Ingest report ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IngestReport {
    pub source: String,
    pub total_rows: usize,
    pub imported: usize,
    pub skipped_rows: usize,
    pub duplicates: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_sorted_and_filtered() {
        let mut sheet = ParsedSheet::default();
        sheet.symbol_counts.insert("VOLV-B".into(), 2);
        sheet.symbol_counts.insert("ABB".into(), 3);
        sheet.symbol_counts.insert("EXM".into(), 1);
        assert_eq!(sheet.duplicates(), vec!["ABB".to_string(), "VOLV-B".to_string()]);
    }
}
