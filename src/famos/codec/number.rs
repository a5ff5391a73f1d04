//! Culture-invariant number formatting.
//!
//! FAMOS payloads store numbers as text with `.` as decimal separator, no
//! grouping separators and no locale metadata. Rust's `Display` for `f64`
//! already prints the shortest round-tripping representation without an
//! exponent, so formatting only has to refuse non-finite values. Parsing is
//! stricter than `str::parse`, which would also accept `inf` or `NaN`.
//!
//! Calibration factors are fixed-point decimals with up to 28 significant
//! digits. Their `Display` keeps the scale and never uses an exponent.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

/// Leading sign, digits with an optional decimal point, optional exponent.
static REAL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn real_regex() -> &'static Regex {
    REAL_PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
            .expect("Invalid real number regex pattern")
    })
}

/// Parses an invariant floating point token. Leading whitespace is allowed.
pub fn parse_real(token: &str) -> Option<f64> {
    let token = token.trim_start();
    if !real_regex().is_match(token) {
        return None;
    }
    token.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parses an invariant decimal token without going through `f64`.
pub fn parse_decimal(token: &str) -> Option<Decimal> {
    let token = token.trim_start();
    if !real_regex().is_match(token) {
        return None;
    }
    if token.contains(['e', 'E']) {
        Decimal::from_scientific(&token.to_ascii_lowercase()).ok()
    } else {
        Decimal::from_str(token).ok()
    }
}

/// Parses an integer token. A decimal point or exponent is accepted as long
/// as the value is integral and fits into 32 bits.
pub fn parse_integer(token: &str) -> Option<i32> {
    if let Ok(value) = token.trim_start().parse::<i32>() {
        return Some(value);
    }
    let value = parse_real(token)?;
    if value.fract() != 0.0 || value < i32::MIN as f64 || value > i32::MAX as f64 {
        return None;
    }
    Some(value as i32)
}

/// Formats a real number in invariant notation. Returns `None` for NaN and
/// infinities, which have no representation in the format.
pub fn format_real(value: f64) -> Option<String> {
    value.is_finite().then(|| format!("{}", value))
}
