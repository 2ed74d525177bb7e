//! Sheet rows → `SheetTicker` records.

use crate::error::SheetError;
use crate::models::{ParsedSheet, SheetTicker};
use crate::sheet::cleaner::{clean_cell, clean_symbol, parse_price};
use crate::sheet::columns::ColumnMap;
use tracing::{debug, warn};

fn cell<S: AsRef<str>>(row: &[Option<S>], idx: usize) -> Option<&str> {
    row.get(idx).and_then(|c| c.as_ref()).map(|c| c.as_ref())
}

/// Convert one data row. `None` means the row has no ticker and is dropped.
fn row_to_ticker<S: AsRef<str>>(cols: &ColumnMap, row: &[Option<S>]) -> Option<SheetTicker> {
    let raw_symbol = clean_cell(cell(row, cols.ticker))?;
    let symbol = clean_symbol(&raw_symbol);
    if symbol.is_empty() {
        // "STO:" has nothing after the prefix
        return None;
    }

    let name = clean_cell(cell(row, cols.company)).unwrap_or_else(|| symbol.clone());
    let currency = cols.currency.and_then(|i| clean_cell(cell(row, i)));
    let price = clean_cell(cell(row, cols.price)).and_then(|p| parse_price(&p));

    Some(SheetTicker {
        name,
        symbol,
        currency,
        price,
    })
}

/// Parse an already tokenized sheet. Fails only when a required column is
/// missing from the header; bad cells degrade to `None` instead.
pub fn parse_sheet<S: AsRef<str>>(
    header: &[Option<S>],
    rows: &[Vec<Option<S>>],
) -> Result<ParsedSheet, SheetError> {
    let cols = ColumnMap::resolve(header)?;
    debug!("Resolved columns: {:?}", cols);

    let mut out = ParsedSheet::default();

    for row in rows {
        if row.is_empty() {
            out.skipped_rows += 1;
            continue;
        }

        match row_to_ticker(&cols, row) {
            Some(ticker) => {
                *out.symbol_counts.entry(ticker.symbol.clone()).or_insert(0) += 1;
                out.tickers.push(ticker);
            }
            None => out.skipped_rows += 1,
        }
    }

    Ok(out)
}

/// Tokenize raw CSV text and parse it. The first record is the header.
pub fn parse_csv_text(text: &str) -> Result<ParsedSheet, SheetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let header: Vec<Option<String>> = match records.next() {
        Some(first) => first?.iter().map(|c| Some(c.to_string())).collect(),
        None => return Err(SheetError::EmptySheet),
    };

    let mut rows = Vec::new();
    let mut unreadable = 0usize;
    for (i, result) in records.enumerate() {
        match result {
            Ok(record) => rows.push(record.iter().map(|c| Some(c.to_string())).collect()),
            Err(e) => {
                warn!("Row {}: {}", i + 2, e);
                unreadable += 1;
            }
        }
    }

    let mut parsed = parse_sheet(&header, &rows)?;
    parsed.skipped_rows += unreadable;
    Ok(parsed)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
