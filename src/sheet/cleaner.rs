
// ── Cell normalisation ────────────────────────────────────────────────────────

/// Trim a cell; blank or missing cells become `None`.
pub fn clean_cell(cell: Option<&str>) -> Option<String> {
    let s = cell?.trim();
    if s.is_empty() { None } else { Some(s.to_string()) }
}

/// "sto:EXM" → "EXM" | " volv-b " → "VOLV-B" | "A:B:C" → "C"
pub fn clean_symbol(s: &str) -> String {
    let s = s.trim();
    let tail = match s.rfind(':') {
        Some(i) => &s[i + 1..],
        None => s,
    };
    tail.trim().to_uppercase()
}

/// Parse a Swedish-formatted price: whitespace is dropped and the first
/// comma becomes the decimal point.
/// "123,45" → 123.45 | "1 234,5" → 1234.5 | "abc" → None
pub fn parse_price(s: &str) -> Option<f64> {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }
    let normalised = compact.replacen(',', ".", 1);
    normalised
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_cell() {
        assert_eq!(clean_cell(Some("  SEK ")), Some("SEK".to_string()));
        assert_eq!(clean_cell(Some("   ")), None);
        assert_eq!(clean_cell(Some("")), None);
        assert_eq!(clean_cell(None), None);
    }

    #[test]
    fn test_clean_symbol() {
        assert_eq!(clean_symbol("sto:EXM"), "EXM");
        assert_eq!(clean_symbol(" volv-b "), "VOLV-B");
        assert_eq!(clean_symbol("NASDAQ:STO:abb"), "ABB");
        assert_eq!(clean_symbol("VOLV-B.ST"), "VOLV-B.ST");
    }

    #[test]
    fn test_parse_price_swedish_format() {
        assert_eq!(parse_price("123,45"), Some(123.45));
        assert_eq!(parse_price("1 234,5"), Some(1234.5));
        assert_eq!(parse_price("  610 "), Some(610.0));
        assert_eq!(parse_price("-3,5"), Some(-3.5));
        assert_eq!(parse_price("+2"), Some(2.0));
        assert_eq!(parse_price("99.9"), Some(99.9));
    }

    #[test]
    fn test_parse_price_degrades_to_none() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("   "), None);
        assert_eq!(parse_price("N/A"), None);
        assert_eq!(parse_price("1,234,5"), None);
        assert_eq!(parse_price("1.234,5"), None);
        assert_eq!(parse_price("inf"), None);
        assert_eq!(parse_price("NaN"), None);
    }
}
