// src/models/lenient.rs

//! Field decoders that never fail on a well-formed JSON value.
//!
//! Attempt records come from hand-edited JSON, so a bad field falls back to a
//! default instead of rejecting the whole request.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::attempt::{Attempt, Tier};

pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(optional_text(deserializer)?.unwrap_or_default())
}

/// Strings and numbers are kept. `null`, empty strings and anything else become `None`.
pub fn optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(number_label(&n)),
        _ => None,
    })
}

/// Integral floats print without a fraction, so `1.0` and `1` group together.
fn number_label(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if !n.is_i64() && !n.is_u64() => f.to_string(),
        _ => n.to_string(),
    }
}

pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(as_number(&value).unwrap_or(0.0))
}

pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let n = as_number(&value).unwrap_or(0.0).max(0.0).floor();
    Ok(if n >= u32::MAX as f64 { u32::MAX } else { n as u32 })
}

pub fn tier<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Tier,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(label) => T::from_label(&label),
        _ => T::default(),
    })
}

/// Anything other than a JSON array decodes to `None`, so request validation
/// can report it with the same message as a missing field.
///
/// Array items must still be objects; a bare number or string inside the array
/// is a shape error.
pub fn attempt_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<Attempt>>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| Attempt::deserialize(item).map_err(serde::de::Error::custom))
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        _ => Ok(None),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}
