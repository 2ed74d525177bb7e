pub mod lookup;
pub mod variants;

pub use lookup::{PriceCandidate, SymbolKeys, VariantIndex};
pub use variants::{generate_variants, variants_of, SymbolVariants};
