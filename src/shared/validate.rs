//! Field checks shared by the form types.

use crate::error::FormErrors;

use regex::Regex;
use rust_decimal::Decimal;

lazy_static::lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"\S+@\S+\.\S+").unwrap();
    static ref PHONE: Regex = Regex::new(r"^\+?[\d\s\-()]+$").unwrap();
}

pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

pub fn is_phone(value: &str) -> bool {
    PHONE.is_match(value)
}

/// Record `message` under `field` when `value` is blank. Returns whether the
/// value was present.
pub fn require(errors: &mut FormErrors, field: &str, value: &str, message: &str) -> bool {
    if value.trim().is_empty() {
        errors.insert(field, message);
        false
    } else {
        true
    }
}

pub fn require_email(errors: &mut FormErrors, field: &str, value: &str) {
    if require(errors, field, value, "Email is required") && !is_email(value.trim()) {
        errors.insert(field, "Please enter a valid email");
    }
}

/// Parse a user-typed amount. Blank or malformed input yields `None`.
pub fn parse_amount(value: &str) -> Option<Decimal> {
    value.trim().replace(',', "").parse::<Decimal>().ok()
}
