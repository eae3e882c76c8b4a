//! Fixed-precision rendering of result values.
//!
//! Rounding works on the exact decimal expansion of the `f64`, and a value
//! lying exactly halfway between two candidates rounds away from zero
//! (`0.125` at 2 places is `0.13`).

/// Shown in a result field that has no value yet, or after a failed cycle.
pub const PLACEHOLDER: &str = "---";

/// Fractional digits needed to print any finite `f64` exactly.
const EXACT_PLACES: usize = 1074;

/// Format `value` with exactly `places` decimal places.
///
/// ```rust
/// use thermal_core::format::fixed;
///
/// assert_eq!(fixed(2.5, 4), "2.5000");
/// assert_eq!(fixed(0.125, 2), "0.13");
/// assert_eq!(fixed(-0.0, 2), "0.00");
/// ```
pub fn fixed(value: f64, places: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    // Exact expansion: Rust prints every requested digit without rounding
    // once the precision covers the whole binary fraction
    let exact = format!("{:.*}", EXACT_PLACES, value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(places))
        .collect();

    let round_up = frac_part.as_bytes().get(places).is_some_and(|d| *d >= b'5');
    if round_up {
        increment(&mut digits);
    }

    let int_len = digits.len() - places;
    let mut out = String::with_capacity(digits.len() + 2);
    // -0.0 is not below zero, so it never gets a sign
    if value < 0.0 {
        out.push('-');
    }
    out.extend(digits[..int_len].iter().map(|d| *d as char));
    if places > 0 {
        out.push('.');
        out.extend(digits[int_len..].iter().map(|d| *d as char));
    }
    out
}

/// Add one unit in the last place of a decimal digit string.
fn increment(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// Format a nullable value, substituting `marker` for `None`.
pub fn fixed_or(value: Option<f64>, places: usize, marker: &str) -> String {
    match value {
        Some(v) => fixed(v, places),
        None => marker.to_string(),
    }
}
