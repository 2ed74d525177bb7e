//! Header resolution: find the Company / Ticker / Currency / Price columns in
//! whatever header row the sheet happens to have.

use crate::error::SheetError;

/// Resolved column positions. Currency is the only optional column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub company: usize,
    pub ticker: usize,
    pub currency: Option<usize>,
    pub price: usize,
}

/// Index of the first header cell (left to right) containing `needle`,
/// ignoring case and surrounding whitespace.
pub fn find_column<S: AsRef<str>>(header: &[Option<S>], needle: &str) -> Option<usize> {
    let needle = needle.to_lowercase();
    header.iter().position(|cell| {
        cell.as_ref()
            .map(|c| c.as_ref().trim().to_lowercase().contains(&needle))
            .unwrap_or(false)
    })
}

impl ColumnMap {
    pub fn resolve<S: AsRef<str>>(header: &[Option<S>]) -> Result<Self, SheetError> {
        let company = find_column(header, "company");
        let ticker = find_column(header, "ticker");
        let currency = find_column(header, "currency");
        let price = find_column(header, "price");

        match (company, ticker, price) {
            (Some(company), Some(ticker), Some(price)) => Ok(Self {
                company,
                ticker,
                currency,
                price,
            }),
            _ => {
                let missing = [("Company", company), ("Ticker", ticker), ("Price", price)]
                    .into_iter()
                    .filter(|(_, idx)| idx.is_none())
                    .map(|(name, _)| name)
                    .collect();
                Err(SheetError::MissingColumns(missing))
            }
        }
    }
}
