//! Dot-path lookup into fetched JSON.
//!
//! Paths like `sensor.temperature` or `items.0.name` walk objects by key and
//! arrays by base-10 index. Every failure (missing key, bad index, walking
//! into a scalar) is reported as "not found" rather than an error.

use serde_json::Value;

/// Look up `path` in `data`.
///
/// Returns `None` when the path is empty, any segment is missing, an array
/// index is not a valid in-range integer, the walk reaches a scalar before the
/// path ends, or any value along the way is `null`. A `null` leaf is therefore
/// indistinguishable from a missing key.
///
/// # Example
///
/// ```
/// use nodered_display::extract_value;
/// use serde_json::json;
///
/// let data = json!({"sensor": {"readings": [18.5, 21]}});
///
/// assert_eq!(extract_value(&data, "sensor.readings.1"), Some(&json!(21)));
/// assert_eq!(extract_value(&data, "sensor.missing"), None);
/// ```
pub fn extract_value<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }

    path.split('.').try_fold(data, |current, segment| {
        let next = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(parse_index(segment)?)?,
            _ => return None,
        };
        (!next.is_null()).then_some(next)
    })
}

/// Parse an array index segment. Negative or non-numeric segments are `None`.
fn parse_index(segment: &str) -> Option<usize> {
    let index: i64 = segment.trim().parse().ok()?;
    usize::try_from(index).ok()
}

/// Text form of an extracted value, as substituted into format strings.
///
/// Strings are used as-is and booleans are written `True`/`False`, as the
/// plugin has always shown them. Everything else is compact JSON (`21`,
/// `[1,2]`).
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        other => other.to_string(),
    }
}
