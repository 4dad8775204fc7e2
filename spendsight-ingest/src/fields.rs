//! Locale-tolerant field parsers: price text, date text, currency symbol.
//!
//! All three recover instead of failing; scraped cell text is unreliable
//! and a bad value must never take the batch down.

use chrono::NaiveDate;
use regex::Regex;

use spendsight_core::FALLBACK_CURRENCY;

/// Parse a printed amount like "25,--€", "1.234,56€" or "$12.50".
///
/// Keeps only digits and `,.-+`, normalizes the no-cents marker `,--` to
/// `,00`, deletes any dot directly followed by three digits (treated as a
/// thousands separator), then turns the first comma into a decimal point.
/// Only the leading numeric run counts; sign characters stranded after the
/// number are ignored. Returns 0.0 when nothing parseable remains.
///
/// Known approximation: the thousands-dot rule also eats a genuine dot
/// before a three-digit decimal part (e.g. "0.500"), which some locales
/// can produce. Kept as-is rather than guessed around.
pub fn parse_amount(text: &str) -> f64 {
    let kept: String = text
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-' | '+'))
        .collect();
    let normalized = kept.replace(",--", ",00");

    let thousands = Regex::new(r"\.(\d{3})").expect("static pattern");
    let without_thousands = thousands.replace_all(&normalized, "$1");

    let decimal = without_thousands.replacen(',', ".", 1);
    let leading = Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)").expect("static pattern");
    leading
        .find(&decimal)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn month_from_abbrev(abbrev: &str) -> Option<u32> {
    match abbrev {
        "Jan" => Some(1),
        "Feb" => Some(2),
        "Mär" | "Mar" => Some(3),
        "Apr" => Some(4),
        "Mai" | "May" => Some(5),
        "Jun" => Some(6),
        "Jul" => Some(7),
        "Aug" => Some(8),
        "Sep" => Some(9),
        "Okt" | "Oct" => Some(10),
        "Nov" => Some(11),
        "Dez" | "Dec" => Some(12),
        _ => None,
    }
}

/// Parse a ledger date in German ("7. Dez. 2025") or English ("Dec 7, 2025")
/// form, with a numeric-format fallback. Returns `None` when nothing fits.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let cleaned = text.trim();
    if cleaned.is_empty() {
        return None;
    }

    let german = Regex::new(r"(\d{1,2})\.\s*(\w{3})\.?\s*(\d{4})").expect("static pattern");
    if let Some(caps) = german.captures(cleaned) {
        if let (Ok(day), Some(month), Ok(year)) = (
            caps[1].parse::<u32>(),
            month_from_abbrev(&caps[2]),
            caps[3].parse::<i32>(),
        ) {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return Some(date);
            }
        }
    }

    let english = Regex::new(r"(\w{3})\s+(\d{1,2}),?\s*(\d{4})").expect("static pattern");
    if let Some(caps) = english.captures(cleaned) {
        if let (Some(month), Ok(day), Ok(year)) = (
            month_from_abbrev(&caps[1]),
            caps[2].parse::<u32>(),
            caps[3].parse::<i32>(),
        ) {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return Some(date);
            }
        }
    }

    for format in ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(cleaned, format) {
            return Some(date);
        }
    }

    None
}

/// Detect the currency symbol in a price text.
///
/// Matches a known symbol character first, then ISO codes, then falls back
/// to the configured home-locale symbol.
pub fn extract_currency(text: &str) -> char {
    if let Some(symbol) = text.chars().find(|c| "$€£¥₹₽".contains(*c)) {
        return symbol;
    }
    if text.contains("USD") {
        return '$';
    }
    if text.contains("EUR") {
        return '€';
    }
    if text.contains("GBP") {
        return '£';
    }
    FALLBACK_CURRENCY
}
