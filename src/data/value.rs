use super::types::ColumnType;

// ---------------------------------------------------------------------------
// Number parsing shared by type inference and normalization
// ---------------------------------------------------------------------------

/// Parse a trimmed string as a finite `f64`.
///
/// `NaN` and infinities are rejected so that they behave like any other
/// non-numeric text.
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Split a trailing `%` off a trimmed value, returning the numeric prefix.
pub fn strip_percent(s: &str) -> Option<&str> {
    s.trim().strip_suffix('%')
}

// ---------------------------------------------------------------------------
// Comparable – a cell or filter value after normalization
// ---------------------------------------------------------------------------

/// A value normalized for comparison under a column type.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparable {
    /// Number, or percentage expressed as a fraction (`"10%"` → `0.1`).
    Number(f64),
    /// Trimmed, lower-cased text.
    Text(String),
}

/// Normalize a raw value for the given column type.
///
/// Returns `None` when a Number or Percentage value does not parse.
///
/// Percentage values with a `%` suffix are divided by 100; values without it
/// are taken as already fractional, so `"0.1"` and `"10%"` compare equal.
pub fn normalize(raw: &str, column_type: ColumnType) -> Option<Comparable> {
    match column_type {
        ColumnType::Number => parse_number(raw).map(Comparable::Number),
        ColumnType::Percentage => match strip_percent(raw) {
            Some(prefix) => parse_number(prefix).map(|v| Comparable::Number(v / 100.0)),
            None => parse_number(raw).map(Comparable::Number),
        },
        ColumnType::Text => Some(Comparable::Text(raw.trim().to_lowercase())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_accepts_float_syntax() {
        assert_eq!(parse_number(" 42 "), Some(42.0));
        assert_eq!(parse_number("-1.5e2"), Some(-150.0));
        assert_eq!(parse_number(".5"), Some(0.5));
    }

    #[test]
    fn test_parse_number_rejects_text_and_non_finite() {
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("1,000"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_percentage_with_and_without_suffix() {
        assert_eq!(
            normalize("15%", ColumnType::Percentage),
            Some(Comparable::Number(0.15))
        );
        assert_eq!(
            normalize("0.15", ColumnType::Percentage),
            Some(Comparable::Number(0.15))
        );
        assert_eq!(normalize("x%", ColumnType::Percentage), None);
    }

    #[test]
    fn test_text_is_trimmed_and_lowercased() {
        assert_eq!(
            normalize("  Hello World ", ColumnType::Text),
            Some(Comparable::Text("hello world".into()))
        );
    }

    #[test]
    fn test_number_rejects_percent_suffix() {
        assert_eq!(normalize("10%", ColumnType::Number), None);
    }
}
