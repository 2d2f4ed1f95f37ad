//! Coercion of free-text numeric entry.

/// Parses a user-entered number, tolerating `$`, `,` and `%` decorations.
///
/// The mapping is total: anything that does not parse after stripping the
/// decorations (including an empty string) is 0.0, so a blank or garbled
/// field never poisons the projection pipeline.
pub fn parse_numeric_input(raw: &str) -> f64 {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%'))
        .collect();
    cleaned.parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_numeric_input("100"), 100.0);
        assert_eq!(parse_numeric_input("12.5"), 12.5);
        assert_eq!(parse_numeric_input("-42"), -42.0);
    }

    #[test]
    fn test_decorated_numbers() {
        assert_eq!(parse_numeric_input("$1,234"), 1234.0);
        assert_eq!(parse_numeric_input("25%"), 25.0);
        assert_eq!(parse_numeric_input("$1,234,567.89"), 1234567.89);
        assert_eq!(parse_numeric_input(" 139 "), 139.0);
    }

    #[test]
    fn test_unparseable_input_is_zero() {
        assert_eq!(parse_numeric_input(""), 0.0);
        assert_eq!(parse_numeric_input("   "), 0.0);
        assert_eq!(parse_numeric_input("abc"), 0.0);
        assert_eq!(parse_numeric_input("12abc"), 0.0);
        assert_eq!(parse_numeric_input("$%,"), 0.0);
    }
}
