//! Lookup by any spelling of a ticker.

use crate::models::{SheetTicker, StoredTicker};
use crate::symbols::variants::generate_variants;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Anything that can be found by ticker: its primary symbol plus, optionally,
/// the symbol as written in the sheet.
pub trait SymbolKeys {
    fn symbol(&self) -> &str;

    fn sheet_symbol(&self) -> Option<&str> {
        None
    }
}

/// A holding as the client sees it: the symbol used to fetch prices and the
/// one typed into the sheet, which may differ in prefix or suffix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceCandidate {
    pub symbol: String,
    pub sheet_symbol: Option<String>,
}

impl SymbolKeys for PriceCandidate {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn sheet_symbol(&self) -> Option<&str> {
        self.sheet_symbol.as_deref()
    }
}

impl SymbolKeys for SheetTicker {
    fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl SymbolKeys for StoredTicker {
    fn symbol(&self) -> &str {
        &self.symbol
    }
}

/// Map from every variant of every candidate to that candidate.
/// On collision the candidate registered first keeps the key.
#[derive(Debug, Clone)]
pub struct VariantIndex<T> {
    candidates: Vec<T>,
    by_variant: HashMap<String, usize>,
}

impl<T: SymbolKeys> VariantIndex<T> {
    pub fn build(candidates: Vec<T>) -> Self {
        let mut by_variant = HashMap::new();
        for (i, c) in candidates.iter().enumerate() {
            for variant in generate_variants([Some(c.symbol()), c.sheet_symbol()]) {
                by_variant.entry(variant).or_insert(i);
            }
        }
        Self {
            candidates,
            by_variant,
        }
    }

    /// Direct hit on a registered variant.
    pub fn get(&self, symbol: &str) -> Option<&T> {
        let key = symbol.trim().to_uppercase();
        self.by_variant.get(&key).map(|&i| &self.candidates[i])
    }

    /// Expand the seeds and return the first candidate any variant hits.
    pub fn resolve<'a, I>(&self, seeds: I) -> Option<&T>
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        generate_variants(seeds)
            .iter()
            .find_map(|v| self.by_variant.get(v))
            .map(|&i| &self.candidates[i])
    }

    pub fn len(&self) -> usize {
        self.by_variant.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_variant.is_empty()
    }

    pub fn candidates(&self) -> &[T] {
        &self.candidates
    }
}
