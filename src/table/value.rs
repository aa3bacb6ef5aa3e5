//! Typed value encoding
//!
//! Everything in the table is a string. Numbers and booleans are written in
//! their canonical text form and parsed back on read; a value that does not
//! parse yields `None` so callers can substitute their default.

pub fn format_int(value: i64) -> String {
    value.to_string()
}

pub fn format_double(value: f64) -> String {
    value.to_string()
}

pub fn format_bool(value: bool) -> String {
    value.to_string()
}

pub fn parse_int(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

pub fn parse_double(raw: &str) -> Option<f64> {
    raw.trim().parse().ok()
}

/// Parse a boolean, accepting `true`/`false` in any letter case
pub fn parse_bool(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
