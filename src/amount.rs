use serde_json::Value;

/// Converts a raw form field into a number the way an `<input type="number">`
/// value is read: surrounding whitespace is ignored and an empty field reads
/// as zero. Returns `None` for anything that is not a finite number.
pub fn coerce_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Reads a numeric payload field. Missing, null and non-numeric values read as zero.
pub fn coerce_value(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Some(Value::String(s)) => coerce_number(s).unwrap_or(0.0),
        Some(Value::Bool(true)) => 1.0,
        _ => 0.0,
    }
}

fn format_with_commas(value: u64) -> String {
    let s = value.to_string().chars().rev().collect::<Vec<char>>();
    let mut out = Vec::new();
    for (i, ch) in s.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(*ch);
    }
    out.into_iter().rev().collect()
}

/// Two-decimal display form, e.g. `1,234.50`.
pub fn format_amount(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, format_with_commas(cents / 100), cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(""), Some(0.0));
        assert_eq!(coerce_number("  12.5 "), Some(12.5));
        assert_eq!(coerce_number("-3"), Some(-3.0));
        assert_eq!(coerce_number("abc"), None);
        assert_eq!(coerce_number("inf"), None);
        assert_eq!(coerce_number("NaN"), None);
    }

    #[test]
    fn test_coerce_value() {
        assert_eq!(coerce_value(None), 0.0);
        assert_eq!(coerce_value(Some(&json!(null))), 0.0);
        assert_eq!(coerce_value(Some(&json!(42.5))), 42.5);
        assert_eq!(coerce_value(Some(&json!("80"))), 80.0);
        assert_eq!(coerce_value(Some(&json!("eighty"))), 0.0);
        assert_eq!(coerce_value(Some(&json!([1]))), 0.0);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(42.5), "42.50");
        assert_eq!(format_amount(182.5), "182.50");
        assert_eq!(format_amount(1234567.891), "1,234,567.89");
        assert_eq!(format_amount(-15.0), "-15.00");
        assert_eq!(format_amount(-0.001), "0.00");
    }
}
