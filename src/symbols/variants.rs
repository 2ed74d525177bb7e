//! Equivalent spellings of a ticker symbol.
//!
//! Price feeds and the sheet label the same Stockholm listing as `VOLV-B`,
//! `VOLV-B.ST` or `STO:VOLV-B`. Instead of forcing one canonical form on
//! every producer we expand a symbol into all of its spellings at lookup time.

use std::collections::{HashSet, VecDeque};

pub const STOCKHOLM_SUFFIX: &str = ".ST";

/// Insertion-ordered set of symbol spellings. Seeds come first, derived
/// forms follow in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolVariants {
    ordered: Vec<String>,
    seen: HashSet<String>,
}

impl SymbolVariants {
    fn insert(&mut self, symbol: String) -> bool {
        if self.seen.contains(&symbol) {
            return false;
        }
        self.seen.insert(symbol.clone());
        self.ordered.push(symbol);
        true
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.seen.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }
}

impl IntoIterator for SymbolVariants {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.ordered.into_iter()
    }
}

/// Text after the last colon, if there is a colon at all.
fn strip_exchange_prefix(symbol: &str) -> Option<&str> {
    symbol.rfind(':').map(|i| &symbol[i + 1..])
}

/// Expand seeds into every equivalent spelling until nothing new appears.
///
/// `.ST` stripping and `.ST` appending are keyed on the current suffix, so a
/// derived form never feeds back into a longer one and the loop terminates.
pub fn generate_variants<'a, I>(seeds: I) -> SymbolVariants
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut out = SymbolVariants::default();
    let mut queue = VecDeque::new();

    for seed in seeds.into_iter().flatten() {
        let normalised = seed.trim().to_uppercase();
        if normalised.is_empty() || out.contains(&normalised) {
            continue;
        }
        out.insert(normalised.clone());
        queue.push_back(normalised.clone());

        if let Some(stripped) = strip_exchange_prefix(&normalised) {
            let stripped = stripped.to_string();
            if !stripped.is_empty() && out.insert(stripped.clone()) {
                queue.push_back(stripped);
            }
        }
    }

    while let Some(symbol) = queue.pop_front() {
        if let Some(base) = symbol.strip_suffix(STOCKHOLM_SUFFIX) {
            if !base.is_empty() && out.insert(base.to_string()) {
                queue.push_back(base.to_string());
            }
        } else if !symbol.contains(':') {
            let suffixed = format!("{symbol}{STOCKHOLM_SUFFIX}");
            if out.insert(suffixed.clone()) {
                queue.push_back(suffixed);
            }
        }
    }

    out
}

/// Variants of a single symbol.
pub fn variants_of(symbol: &str) -> SymbolVariants {
    generate_variants([Some(symbol)])
}
