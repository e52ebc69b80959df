//! Forgiving field decoders for backend payloads.
//!
//! Each helper is meant for `#[serde(deserialize_with = "...")]`. A value of
//! the wrong shape decodes as the field's default instead of failing the
//! whole record.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode `T`, or fall back to `T::default()` when the value has the wrong shape.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// A string. Numbers and booleans are written out, anything else is empty.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// A non-negative count. Floats are rounded, numeric strings are parsed,
/// and anything else is 0.
pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number(&value)
        .map(|n| n.round().clamp(0.0, u32::MAX as f64) as u32)
        .unwrap_or(0))
}

/// A percentage clamped into 0..=100.
pub fn percent<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number(&value)
        .map(|n| n.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0))
}

/// A timestamp.
///
/// RFC 3339 strings keep their offset. Strings without an offset (as
/// written by Python's `datetime.isoformat()`) are taken as UTC, and bare
/// numbers as Unix seconds. Anything unparseable becomes `None`.
pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n.as_f64().and_then(|secs| {
            DateTime::from_timestamp(secs.trunc() as i64, (secs.fract() * 1e9) as u32)
        }),
        _ => None,
    })
}

/// Parse a timestamp string, with or without an offset.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|t| t.and_utc())
}

/// Decode a JSON array element by element, dropping entries that do not fit `T`.
///
/// Returns the kept records and the number of entries dropped.
pub fn decode_list<T: DeserializeOwned>(items: Vec<Value>) -> (Vec<T>, usize) {
    let total = items.len();
    let kept: Vec<T> = items
        .into_iter()
        .filter_map(|item| T::deserialize(item).ok())
        .collect();
    let dropped = total - kept.len();
    (kept, dropped)
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|n: &f64| n.is_finite())
}
