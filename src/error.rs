//! Errors raised while turning a spreadsheet export into ticker records.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    /// One or more of Company / Ticker / Price could not be located.
    #[error("CSV saknar nödvändiga kolumner: {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),

    #[error("CSV är tom: ingen rubrikrad hittades")]
    EmptySheet,

    #[error("Dubbletter av ticker i arket: {}", .0.join(", "))]
    DuplicateSymbols(Vec<String>),

    #[error("Kunde inte läsa CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message() {
        let err = SheetError::MissingColumns(vec!["Company", "Price"]);
        assert_eq!(
            err.to_string(),
            "CSV saknar nödvändiga kolumner: Company, Price"
        );
    }
}
