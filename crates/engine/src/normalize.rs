//! Record id extraction from Archer response payloads.
//!
//! The REST search endpoint answers in several shapes depending on the
//! platform version. Each recognized shape has a matcher: a pure function
//! that returns `Some(ids)` when the payload has that shape and `None`
//! otherwise. [`SEARCH_SHAPES`] lists them in priority order.
//!
//! Content API results have a single shape and are read by
//! [`record_ids_from_content`].

use serde_json::{Map, Value};
use tracing::debug;

const REQUESTED_OBJECT_KEY: &str = "RequestedObject";
const ID_KEY: &str = "Id";
const VALUE_KEY: &str = "value";

/// A shape matcher over a decoded search payload.
pub type ShapeMatcher = fn(&Value) -> Option<Vec<i64>>;

/// Recognized search payload shapes, tried in order.
pub const SEARCH_SHAPES: &[(&str, ShapeMatcher)] = &[
    ("record array", match_record_array),
    ("value envelope", match_value_envelope),
    ("single record", match_single_record),
];

/// Extract record ids from a REST search payload.
///
/// Payloads that match no known shape yield no ids.
pub fn record_ids_from_search(payload: &Value) -> Vec<i64> {
    for (shape, matcher) in SEARCH_SHAPES {
        if let Some(ids) = matcher(payload) {
            debug!(shape, count = ids.len(), "matched search payload shape");
            return ids;
        }
    }
    debug!(kind = json_kind(payload), "search returned unrecognized JSON shape");
    Vec::new()
}

/// `[{"RequestedObject": {"Id": 1}}, ...]`
pub fn match_record_array(payload: &Value) -> Option<Vec<i64>> {
    let items = payload.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| requested_object_id(item).and_then(search_record_id))
            .collect(),
    )
}

/// `{"value": [...]}` where items are records or carry an id-like key.
pub fn match_value_envelope(payload: &Value) -> Option<Vec<i64>> {
    let items = payload.as_object()?.get(VALUE_KEY)?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| {
                let object = item.as_object()?;
                let raw_id = if object.contains_key(REQUESTED_OBJECT_KEY) {
                    requested_object_id(item)
                } else {
                    first_id_like_value(object)
                };
                raw_id.and_then(search_record_id)
            })
            .collect(),
    )
}

/// `{"RequestedObject": {"Id": 1}}`
pub fn match_single_record(payload: &Value) -> Option<Vec<i64>> {
    let raw_id = requested_object_id(payload)?;
    Some(search_record_id(raw_id).into_iter().collect())
}

/// Extract record ids from a content API result (`{"value": [...]}`).
///
/// Each item contributes the value under `id_key` when present and non-null,
/// else the first key that is `id` or ends in `_id`, ignoring case.
pub fn record_ids_from_content(payload: &Value, id_key: &str) -> Vec<i64> {
    let Some(items) = payload.get(VALUE_KEY).and_then(Value::as_array) else {
        debug!(kind = json_kind(payload), "content API returned no value array");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|object| {
            let raw_id = object
                .get(id_key)
                .filter(|value| !value.is_null())
                .or_else(|| first_id_like_value(object))?;
            if raw_id.is_null() {
                return None;
            }
            coerce_logged(raw_id)
        })
        .collect()
}

/// Convert a JSON id to an integer.
///
/// Integers, integral floats, and numeric strings are accepted.
pub fn coerce_record_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|float| is_integral_in_range(*float)).map(|float| float as i64)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Floats outside the `i64` range would saturate into a fabricated id.
fn is_integral_in_range(float: f64) -> bool {
    float.fract() == 0.0 && float >= i64::MIN as f64 && float < i64::MAX as f64
}

/// Search results skip empty ids (`0`, `null`, `""`, `false`) before coercing.
fn search_record_id(value: &Value) -> Option<i64> {
    let is_empty = match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::String(text) => text.is_empty(),
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    };
    if is_empty {
        return None;
    }
    coerce_logged(value)
}

fn coerce_logged(value: &Value) -> Option<i64> {
    let coerced = coerce_record_id(value);
    if coerced.is_none() {
        debug!(%value, "skipping record id that is not an integer");
    }
    coerced
}

fn requested_object_id(item: &Value) -> Option<&Value> {
    item.get(REQUESTED_OBJECT_KEY)?.get(ID_KEY)
}

fn first_id_like_value(object: &Map<String, Value>) -> Option<&Value> {
    object.iter().find(|(key, _)| is_id_like_key(key)).map(|(_, value)| value)
}

fn is_id_like_key(key: &str) -> bool {
    let lowered = key.to_lowercase();
    lowered == "id" || lowered.ends_with("_id")
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
