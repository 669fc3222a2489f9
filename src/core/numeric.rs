//! Coercion of loosely-typed upstream values into finite numbers.
//!
//! Upstream feeds report prices as JSON numbers, as formatted strings
//! (`"1,234.50"`, `"-2.10%"`) or in futures fractional notation where the
//! part after the dash counts eighths (`"12-4"` is `12.5`). Everything that
//! cannot be read as a finite number becomes `None`.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

const FRACTION_DENOMINATOR: f64 = 8.0;

static FRACTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-]?\d+)-(\d+)$").expect("valid fraction pattern"));

/// Parses a formatted number. Thousands separators, percent signs and
/// whitespace are ignored.
pub fn parse_number(raw: &str) -> Option<f64> {
    let normalized: String = raw
        .chars()
        .filter(|c| *c != ',' && *c != '%' && !c.is_whitespace())
        .collect();

    if normalized.is_empty() || normalized == "-" {
        return None;
    }

    if let Some(caps) = FRACTION_PATTERN.captures(&normalized) {
        let whole_text = &caps[1];
        let whole: f64 = whole_text.parse().ok()?;
        let eighths: f64 = caps[2].parse().ok()?;
        let sign = if whole_text.starts_with('-') { -1.0 } else { 1.0 };
        return finite(sign * (whole.abs() + eighths / FRACTION_DENOMINATOR));
    }

    normalized.parse::<f64>().ok().and_then(finite)
}

/// Coerces a JSON value. Numbers pass through, strings are parsed with
/// [`parse_number`], every other shape is unavailable.
pub fn coerce_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().and_then(finite),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Same as [`coerce_value`] for a field that may be missing.
pub fn coerce_field(value: Option<&Value>) -> Option<f64> {
    value.and_then(coerce_value)
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_formatted_strings_match_plain_form() {
        assert_eq!(parse_number("1,234.50"), Some(1234.50));
        assert_eq!(parse_number("-2.10%"), Some(-2.10));
        assert_eq!(parse_number("  +0.75 % "), Some(0.75));
        assert_eq!(parse_number("12,345"), parse_number("12345"));
    }

    #[test]
    fn test_fractional_notation() {
        assert_eq!(parse_number("12-4"), Some(12.5));
        assert_eq!(parse_number("-12-4"), Some(-12.5));
        assert_eq!(parse_number("+3-2"), Some(3.25));
        assert_eq!(parse_number("-0-4"), Some(-0.5));
        assert_eq!(parse_number("452-6"), Some(452.75));
    }

    #[test]
    fn test_malformed_input_is_unavailable() {
        assert_eq!(parse_number("12-"), None);
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("unch"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("1.2.3"), None);
    }

    #[test]
    fn test_coerce_json_values() {
        assert_eq!(coerce_value(&json!(441.25)), Some(441.25));
        assert_eq!(coerce_value(&json!("441-2")), Some(441.25));
        assert_eq!(coerce_value(&json!("1,062.00")), Some(1062.0));
        assert_eq!(coerce_value(&json!(null)), None);
        assert_eq!(coerce_value(&json!(true)), None);
        assert_eq!(coerce_value(&json!({"value": 1})), None);
        assert_eq!(coerce_field(None), None);
        assert_eq!(coerce_field(Some(&json!(0))), Some(0.0));
    }
}
