//! Typed accessors over raw JSON objects
//!
//! Absent keys and explicit `null` are both treated as "not present".
//! Present values of the wrong type are schema errors naming `field`.

use crate::error::{NsgError, Result};
use serde_json::{Map, Value};

fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|value| !value.is_null())
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn wrong_type(field: &str, expected: &str, found: &Value) -> NsgError {
    NsgError::schema(
        field,
        format!("must be {}, found {}", expected, json_type(found)),
    )
}

pub(crate) fn optional_str<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    field: &str,
) -> Result<Option<&'a str>> {
    match present(obj, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(wrong_type(field, "a string", other)),
    }
}

pub(crate) fn required_str<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    field: &str,
) -> Result<&'a str> {
    optional_str(obj, key, field)?.ok_or_else(|| NsgError::schema(field, "is required"))
}

pub(crate) fn optional_f64(obj: &Map<String, Value>, key: &str, field: &str) -> Result<Option<f64>> {
    match present(obj, key) {
        None => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| NsgError::schema(field, "is not representable as a float")),
        Some(other) => Err(wrong_type(field, "a number", other)),
    }
}

/// Channel numbers arrive as JSON integers, whole floats or digit strings.
pub(crate) fn optional_channel(
    obj: &Map<String, Value>,
    key: &str,
    field: &str,
) -> Result<Option<u32>> {
    let out_of_range = || NsgError::schema(field, "must be a non-negative integer below 2^32");
    match present(obj, key) {
        None => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().and_then(integral))
            .and_then(|v| u32::try_from(v).ok())
            .map(Some)
            .ok_or_else(out_of_range),
        Some(Value::String(s)) => s.trim().parse::<u32>().map(Some).map_err(|_| out_of_range()),
        Some(other) => Err(wrong_type(field, "an integer", other)),
    }
}

/// Whole, non-negative floats such as `497.0`.
fn integral(value: f64) -> Option<u64> {
    (value.is_finite() && value.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&value))
        .then_some(value as u64)
}

pub(crate) fn optional_object<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    field: &str,
) -> Result<Option<&'a Map<String, Value>>> {
    match present(obj, key) {
        None => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(wrong_type(field, "an object", other)),
    }
}

pub(crate) fn optional_array<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    field: &str,
) -> Result<Option<&'a Vec<Value>>> {
    match present(obj, key) {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(other) => Err(wrong_type(field, "an array", other)),
    }
}

/// First present key wins; `keys` are tried in order.
pub(crate) fn first_str<'a>(
    obj: &'a Map<String, Value>,
    keys: &[&str],
    prefix: &str,
) -> Result<Option<(&'a str, String)>> {
    for key in keys {
        let field = format!("{}{}", prefix, key);
        if let Some(text) = optional_str(obj, key, &field)? {
            return Ok(Some((text, field)));
        }
    }
    Ok(None)
}
