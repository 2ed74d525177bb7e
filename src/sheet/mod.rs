//! Spreadsheet export → normalised ticker records.
//!
//! The flow is header resolution (`columns`), per-cell cleanup (`cleaner`)
//! and row building (`parser`). CSV tokenizing is left to the `csv` crate.

pub mod cleaner;
pub mod columns;
pub mod parser;

pub use parser::{parse_csv_text, parse_sheet};
