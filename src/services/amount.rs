//! Parsing and display of invoice amounts stored as text.
//!
//! Amounts arrive as strings like `"₦1,200.50"`. Everything except ASCII
//! digits, `.` and `-` is stripped, then the longest leading decimal number
//! is read. Anything unreadable is 0; parsing never fails.

use std::sync::OnceLock;

use regex::Regex;

fn leading_decimal() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^-?(?:\d+\.?\d*|\.\d+)").ok())
        .as_ref()
}

/// Numeric value of an amount text, 0 when absent or unreadable.
pub fn parse_amount(text: Option<&str>) -> f64 {
    let Some(text) = text else {
        return 0.0;
    };
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    leading_decimal()
        .and_then(|pattern| pattern.find(&cleaned))
        .and_then(|number| number.as_str().parse().ok())
        .unwrap_or(0.0)
}

/// Sum of parsed amounts.
pub fn total<'a>(amounts: impl IntoIterator<Item = Option<&'a str>>) -> f64 {
    amounts.into_iter().map(parse_amount).sum()
}

/// Naira display with en-US grouping and at most three fraction digits: `₦1,200.5`.
pub fn format_naira(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let sign = if rounded < 0.0 { "-" } else { "" };
    let fixed = format!("{:.3}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if frac_part.is_empty() {
        format!("₦{sign}{grouped}")
    } else {
        format!("₦{sign}{grouped}.{frac_part}")
    }
}
