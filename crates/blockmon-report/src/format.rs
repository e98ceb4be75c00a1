//! Column value formatting

/// Fixed-point value, or an empty string when absent
pub fn fixed(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{:.*}", decimals, v))
        .unwrap_or_default()
}

/// Crank count right-aligned to width 3, or blanks when absent
pub fn cranks(value: Option<i64>) -> String {
    match value {
        Some(c) => format!("{:3}", c),
        None => " ".repeat(4),
    }
}

/// Truncated whole percentage of a fraction, e.g. ` 15%`.
///
/// Padded with spaces, not zeros, to width 3 (`  0%`), as `%3d%%` prints it.
pub fn percent(fraction: Option<f64>) -> String {
    fraction
        .map(|f| format!("{:3}%", (f * 100.0).trunc() as i64))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed() {
        assert_eq!(fixed(Some(0.7), 3), "0.700");
        assert_eq!(fixed(Some(6.24), 1), "6.2");
        assert_eq!(fixed(None, 3), "");
    }

    #[test]
    fn test_cranks() {
        assert_eq!(cranks(Some(4)), "  4");
        assert_eq!(cranks(Some(1234)), "1234");
        assert_eq!(cranks(Some(-2)), " -2");
        assert_eq!(cranks(None), "    ");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(Some(0.1014)), " 10%");
        assert_eq!(percent(Some(0.159)), " 15%");
        assert_eq!(percent(Some(1.0)), "100%");
        assert_eq!(percent(Some(0.0)), "  0%");
        assert_eq!(percent(None), "");
    }
}
