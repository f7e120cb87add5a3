// Utility helpers for parsing, integer statistics and number formatting.
//
// This module centralizes all the "dirty" CSV/number handling so the rest of
// the code can assume clean, typed values.
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `u64` while being forgiving about
/// formatting issues that are common in CSV exports.
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace and strips `","` / `" "` thousands separators.
/// - Rejects values that contain alphabetic characters.
/// - Accepts whole floats such as `"1200.0"` (spreadsheet exports).
/// - Returns `None` for anything negative, fractional or unparsable.
pub fn parse_u64_safe(s: Option<&str>) -> Option<u64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_alphabetic()) {
        return None;
    }
    let s: String = s.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    if let Ok(v) = s.parse::<u64>() {
        return Some(v);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 => Some(v as u64),
        _ => None,
    }
}

/// Inverse of [`format_number`]: drop the separators and read the integer back.
pub fn parse_formatted(s: &str) -> Option<u64> {
    let digits: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    digits.parse().ok()
}

pub fn average(v: &[u64]) -> u64 {
    // Integer mean truncated toward zero; 0 for an empty slice.
    if v.is_empty() {
        return 0;
    }
    let sum: u128 = v.iter().map(|x| *x as u128).sum();
    (sum / v.len() as u128) as u64
}

pub fn median(mut v: Vec<u64>) -> u64 {
    // Taken by value so the slice can be sorted in place. For an even count
    // the two middle values are averaged and the result truncated.
    if v.is_empty() {
        return 0;
    }
    v.sort_unstable();
    let mid = v.len() / 2;
    if v.len() % 2 == 1 {
        v[mid]
    } else {
        ((v[mid - 1] as u128 + v[mid] as u128) / 2) as u64
    }
}

/// Format a population with a space as the thousands separator:
/// `12380664` becomes `"12 380 664"`. A missing value renders as `"0"`.
pub fn format_number(n: Option<u64>) -> String {
    match n {
        Some(n) => format_int(n),
        None => "0".to_string(),
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // `num-format` groups with the English locale, the commas are then
    // swapped for the plain space used on every page.
    n.to_formatted_string(&Locale::en).replace(',', " ")
}
