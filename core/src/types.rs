//! Shared primitive types used across the dashboard core.

use chrono::NaiveDate;

/// A calendar day. Records carry day granularity only.
pub type Day = NaiveDate;

/// A monetary amount in integer cents.
pub type Cents = i64;

/// Stable order identifier, `ORD-<n>`.
pub type OrderId = String;

/// Round a currency amount to the nearest cent (half away from zero).
pub fn cents_from_f64(amount: f64) -> Cents {
    (amount * 100.0).round() as Cents
}

pub fn to_dollars(amount: Cents) -> f64 {
    amount as f64 / 100.0
}

/// Render cents as `$1,234.56` (negative amounts as `-$1,234.56`).
pub fn format_usd(amount: Cents) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    let dollars = abs / 100;
    let cents = abs % 100;
    format!("{sign}${}.{cents:02}", group_thousands(dollars))
}

/// Render a count as `12,345`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usd_formatting() {
        assert_eq!(format_usd(0), "$0.00");
        assert_eq!(format_usd(105), "$1.05");
        assert_eq!(format_usd(123_456_789), "$1,234,567.89");
        assert_eq!(format_usd(-2_500), "-$25.00");
    }

    #[test]
    fn cents_round_half_away_from_zero() {
        assert_eq!(cents_from_f64(1.005 * 1000.0), 100_500);
        assert_eq!(cents_from_f64(3.99), 399);
        assert_eq!(cents_from_f64(0.125), 13);
    }
}
