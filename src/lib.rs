//! Spreadsheet ticker ingestion: parse a sheet export into normalised
//! ticker records, store them, and look them up by any spelling of the
//! symbol.

pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod sheet;
pub mod source;
pub mod storage;
pub mod symbols;
pub mod utils;
