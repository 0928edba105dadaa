use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes a session timestamp into its textual form without interpreting it
///
/// Session logs normally carry RFC3339 strings, older ones epoch milliseconds. The raw
/// text is kept for output fidelity; [`parse_timestamp`] interprets it for display.
pub fn deserialize_raw_timestamp<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| raw_timestamp(&v)))
}

/// Textual form of a timestamp field, if it is a string or a number
pub fn raw_timestamp(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Interprets a raw timestamp as RFC3339 or as epoch milliseconds
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ms) = raw.parse::<i64>() {
        return DateTime::from_timestamp_millis(ms);
    }
    raw.parse::<DateTime<Utc>>().ok()
}
