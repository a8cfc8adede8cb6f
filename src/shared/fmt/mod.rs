//! Display formatting for amounts and dates.
//!
//! Amounts follow the `en-IN` convention the portal renders with: two fixed
//! decimals, the last three integer digits grouped, then groups of two
//! (`12,34,567.89`). The currency (AED) is rendered by the UI as an icon, so
//! it is not part of the string.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount with two decimals and `en-IN` digit grouping.
pub fn amount(value: &Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let grouped = group_indian(int_part);
    if negative {
        format!("-{}.{}", grouped, frac_part)
    } else {
        format!("{}.{}", grouped, frac_part)
    }
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let head_bytes = head.as_bytes();
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head_bytes.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// `"18 Oct 2026"`.
pub fn date(value: &NaiveDate) -> String {
    value.format("%-d %b %Y").to_string()
}

/// `"18 Oct 2026, 14:05"`.
pub fn date_time(value: &DateTime<Utc>) -> String {
    value.format("%-d %b %Y, %H:%M").to_string()
}

/// `"18 Oct"` — used for next-payment hints.
pub fn day_month(value: &NaiveDate) -> String {
    value.format("%-d %b").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_small_values() {
        assert_eq!(amount(&dec!(0)), "0.00");
        assert_eq!(amount(&dec!(5)), "5.00");
        assert_eq!(amount(&dec!(999.999)), "1,000.00");
    }

    #[test]
    fn test_amount_indian_grouping() {
        assert_eq!(amount(&dec!(1000)), "1,000.00");
        assert_eq!(amount(&dec!(100000)), "1,00,000.00");
        assert_eq!(amount(&dec!(1234567.891)), "12,34,567.89");
        assert_eq!(amount(&dec!(-25000.5)), "-25,000.50");
    }

    #[test]
    fn test_dates() {
        let d = NaiveDate::from_ymd_opt(2026, 10, 8).unwrap();
        assert_eq!(date(&d), "8 Oct 2026");
        assert_eq!(day_month(&d), "8 Oct");
        let dt = d.and_hms_opt(14, 5, 0).unwrap().and_utc();
        assert_eq!(date_time(&dt), "8 Oct 2026, 14:05");
    }
}
