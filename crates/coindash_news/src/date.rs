//! Publication timestamps arrive as RFC 3339 strings or unix epochs in
//! seconds, milliseconds or microseconds, either as JSON strings or numbers.
//! Everything leaves as RFC 3339 UTC with millisecond precision.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Epoch values at or above this are milliseconds (~1973 in ms, ~5138 in s).
const MILLIS_THRESHOLD: i64 = 100_000_000_000;
/// Epoch values at or above this are microseconds (~1973 in us).
const MICROS_THRESHOLD: i64 = 100_000_000_000_000;

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    parse_any(raw).filter(is_printable)
}

/// RFC 3339 has four-digit years only.
fn is_printable(timestamp: &DateTime<Utc>) -> bool {
    (0..=9999).contains(&timestamp.year())
}

fn parse_any(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(epoch) = raw.parse::<i64>() {
        return from_epoch(epoch);
    }
    if let Ok(epoch) = raw.parse::<f64>() {
        return epoch.is_finite().then(|| from_epoch(epoch as i64)).flatten();
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn from_epoch(epoch: i64) -> Option<DateTime<Utc>> {
    let magnitude = epoch.unsigned_abs();
    if magnitude >= MICROS_THRESHOLD as u64 {
        DateTime::from_timestamp_micros(epoch)
    } else if magnitude >= MILLIS_THRESHOLD as u64 {
        DateTime::from_timestamp_millis(epoch)
    } else {
        DateTime::from_timestamp(epoch, 0)
    }
}

pub fn to_iso(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Normalizes a textual timestamp; unparseable input becomes "now".
pub fn normalize_timestamp(raw: &str) -> String {
    to_iso(parse_timestamp(raw).unwrap_or_else(Utc::now))
}

/// Same as [`normalize_timestamp`] for a raw JSON field.
pub fn normalize_value(value: Option<&Value>) -> String {
    let parsed = match value {
        Some(Value::String(raw)) => parse_timestamp(raw),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .and_then(from_epoch)
            .filter(is_printable),
        _ => None,
    };
    to_iso(parsed.unwrap_or_else(Utc::now))
}
