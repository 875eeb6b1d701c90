// Parsing, rounding and formatting helpers.
//
// Tabular sources arrive as loose text, so every cell goes through these
// before it touches a rate table.
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in spreadsheet exports.
///
/// - Trims whitespace.
/// - Accepts scientific notation (`1.2E-05`).
/// - Strips thousands separators and a trailing `%`.
/// - Returns `None` for anything that cannot be parsed or is not finite
///   (`N/A`, `nan`, `inf`).
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let s = s.trim_end_matches('%').replace(',', "");
    let v = s.trim().parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

pub fn parse_i64_safe(s: Option<&str>) -> Option<i64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.replace(',', "").parse::<i64>().ok()
}

pub fn is_blank(s: Option<&str>) -> bool {
    s.map_or(true, |v| v.trim().is_empty())
}

/// Round to two decimal places.
///
/// Goes through the exact decimal expansion rather than `value * 100`, so
/// `12.345` (stored slightly above the tie) becomes `12.35`.
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Round a head-count figure to a whole number of students.
///
/// Ties go to the even neighbour. The cast saturates, so a negative figure
/// (only possible from negative rates) lands on zero.
pub fn round_count(value: f64) -> u64 {
    value.round_ties_even() as u64
}

/// Fixed two-decimal text used for rates in exports and narratives.
pub fn format_percentage(n: f64) -> String {
    format!("{:.2}", n)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_f64_safe_handles_spreadsheet_noise() {
        assert_eq!(parse_f64_safe(Some(" 12.5 ")), Some(12.5));
        assert_eq!(parse_f64_safe(Some("1,234.5")), Some(1234.5));
        assert_eq!(parse_f64_safe(Some("15%")), Some(15.0));
        assert_eq!(parse_f64_safe(Some("1e1")), Some(10.0));
        assert_eq!(parse_f64_safe(Some("1.2E-05")), Some(1.2e-5));
        assert_eq!(parse_f64_safe(Some("nan")), None);
        assert_eq!(parse_f64_safe(Some("inf")), None);
        assert_eq!(parse_f64_safe(Some("N/A")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(12.3456), 12.35);
        assert_eq!(round2(6.0), 6.0);
        assert_eq!(round2(0.801), 0.8);
        assert_eq!(round2(12.345), 12.35);
    }

    #[test]
    fn round_count_ties_to_even() {
        assert_eq!(round_count(12.5), 12);
        assert_eq!(round_count(13.5), 14);
        assert_eq!(round_count(6.5), 6);
        assert_eq!(round_count(12.6), 13);
        assert_eq!(round_count(0.0), 0);
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_int(12_345u64), "12,345");
        assert_eq!(format_percentage(6.0), "6.00");
    }
}
