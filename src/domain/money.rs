//! Monetary types and display formatting.

use rust_decimal::Decimal;

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Format a value as dollars with thousands separators and two decimals.
///
/// Negative values keep the sign after the currency symbol (`$-5.00`).
#[must_use]
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = format!("{:.2}", rounded.abs());
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    format!("${sign}{}.{fraction}", group_thousands(whole))
}

fn group_thousands(whole: &str) -> String {
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
