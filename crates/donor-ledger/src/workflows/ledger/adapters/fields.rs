use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use super::super::domain::{EventTimestamp, UNKNOWN_BLOOD_TYPE};

/// Accepts any JSON value, keeping it only when it decodes as `T`.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Collections tolerate `null`, a non-array value, or individual elements that
/// are not records; all of these shrink the collection rather than failing it.
pub(crate) fn lenient_records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        _ => {
            warn!("expected a list of records; treating source as empty");
            return Ok(Vec::new());
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            warn!(index, "skipping entry that is not a record");
            continue;
        }
        match serde_json::from_value(item) {
            Ok(record) => records.push(record),
            Err(err) => warn!(index, error = %err, "skipping unreadable record"),
        }
    }
    Ok(records)
}

/// Strings are trimmed (blank becomes `None`); numbers are kept in their textual form.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(raw) => {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|number| number.is_finite()))
}

pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(flag) => Some(flag),
        Value::String(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        Value::Number(number) => number.as_i64().map(|n| n != 0),
        _ => None,
    })
}

/// Lowercases and collapses whitespace so status vocabularies compare reliably.
pub(crate) fn normalize_token(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

/// 12 digits of milliseconds reaches back to March 1973.
const EPOCH_MILLIS_MIN_DIGITS: usize = 12;

/// Parses RFC 3339, naive ISO timestamps (taken as UTC), bare dates, and epoch milliseconds.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    // Epoch milliseconds, as emitted by some upstream serializers. Shorter digit
    // runs (compact dates such as `20250601`) are not timestamps.
    if trimmed.len() >= EPOCH_MILLIS_MIN_DIGITS && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return trimmed
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis);
    }

    None
}

/// First parsable candidate wins; otherwise the event is placed at the start of today.
pub(crate) fn resolve_timestamp(
    candidates: &[Option<&str>],
    now: DateTime<Utc>,
) -> EventTimestamp {
    candidates
        .iter()
        .flatten()
        .find_map(|raw| parse_datetime(raw))
        .map(EventTimestamp::recorded)
        .unwrap_or_else(|| EventTimestamp::inferred(now))
}

pub(crate) fn blood_type_or_unknown(candidates: &[Option<&str>]) -> String {
    candidates
        .iter()
        .flatten()
        .map(|raw| raw.trim())
        .find(|raw| !raw.is_empty())
        .unwrap_or(UNKNOWN_BLOOD_TYPE)
        .to_string()
}
