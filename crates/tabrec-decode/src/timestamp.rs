//! Timestamp normalization.
//!
//! Sources encode the record time as ISO 8601 text (with or without an
//! offset), epoch seconds, or epoch microseconds. [`normalize`] tries each
//! interpretation in a fixed order and returns the first that succeeds.
//!
//! A bare integer is ambiguous between seconds and microseconds. Seconds are
//! tried first and win whenever the value is representable as seconds, so
//! only integers too large for a seconds instant fall through to the
//! microseconds reading. This is a heuristic: callers that know a column's
//! epoch unit should convert it themselves.
//!
//! Two readings go beyond strict RFC 3339 and instant parsing, which reject
//! them: ISO text without an offset is taken as UTC, and fractional epoch
//! seconds (`1.7041032E9`, the REST encoding of a `TIMESTAMP`) are accepted
//! after the integer readings.

use chrono::{DateTime, NaiveDateTime, Utc};
use tabrec_model::{NativeScalar, RawCell};

/// Date-time layouts that carry an explicit offset.
const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
];

/// Offset-less layouts, read as UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Normalize a raw cell into an instant.
///
/// A native instant is used as-is; anything else goes through
/// [`parse_timestamp`] on the cell's best textual form.
pub fn normalize(cell: &RawCell) -> Option<DateTime<Utc>> {
    if let Some(NativeScalar::Instant(instant)) = cell.native_scalar() {
        return Some(*instant);
    }
    let text = cell.text_form()?;
    parse_timestamp(&text)
}

/// Parse a textual timestamp through the cascade:
///
/// 1. ISO 8601 date-time with explicit offset (`Z`, `+01:00`, `+0100`)
/// 2. ISO 8601 date-time without offset, or with a trailing `UTC`, as UTC
/// 3. integer epoch seconds
/// 4. integer epoch microseconds
/// 5. fractional epoch seconds (`1.7041032E9`), the warehouse REST encoding
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    parse_with_offset(trimmed)
        .or_else(|| parse_without_offset(trimmed))
        .or_else(|| parse_epoch_integer(trimmed))
        .or_else(|| parse_epoch_fractional(trimmed))
}

fn parse_with_offset(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    OFFSET_FORMATS.iter().find_map(|format| {
        DateTime::parse_from_str(value, format)
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc))
    })
}

fn parse_without_offset(value: &str) -> Option<DateTime<Utc>> {
    let value = value
        .strip_suffix(" UTC")
        .or_else(|| value.strip_suffix("UTC"))
        .unwrap_or(value)
        .trim_end();
    NAIVE_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(value, format)
            .ok()
            .map(|naive| naive.and_utc())
    })
}

fn parse_epoch_integer(value: &str) -> Option<DateTime<Utc>> {
    let number: i64 = value.parse().ok()?;
    DateTime::from_timestamp(number, 0).or_else(|| DateTime::from_timestamp_micros(number))
}

fn parse_epoch_fractional(value: &str) -> Option<DateTime<Utc>> {
    let seconds: f64 = value.parse().ok()?;
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }
    let micros = ((seconds - whole) * 1_000_000.0).round() as u32;
    let (whole, micros) = if micros >= 1_000_000 {
        (whole as i64 + 1, 0)
    } else {
        (whole as i64, micros)
    };
    DateTime::from_timestamp(whole, micros * 1_000)
}
