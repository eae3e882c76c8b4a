//! Raw form field parsing.
//!
//! Form values arrive as the text the user typed. A value is usable only if
//! it parses to a finite `f64`; blanks, junk, `NaN` and infinities are all
//! rejected the same way.

use crate::errors::{ThermalError, ThermalResult};

/// Parse a raw field value into a finite number.
///
/// ```rust
/// use thermal_core::fields::parse_number;
///
/// assert_eq!(parse_number(" 0.25 "), Some(0.25));
/// assert_eq!(parse_number(""), None);
/// assert_eq!(parse_number("NaN"), None);
/// ```
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a field, producing a validation error with `message` on failure.
pub fn require_number(field: &str, raw: &str, message: impl Into<String>) -> ThermalResult<f64> {
    parse_number(raw).ok_or_else(|| ThermalError::validation(field, message))
}

/// Plain decimal rendering of an input value, used in report payloads.
///
/// `-0.0` is normalized to `0`.
pub fn plain_value(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}
