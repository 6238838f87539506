//! Coercion helpers for backend JSON and content fingerprints.
//!
//! The dashboard payload is built by several backend services and a frontend
//! fallback, so its shape is not guaranteed. Everything here absorbs bad input
//! instead of failing: missing or non-numeric values become 0, wrong container
//! shapes become empty collections.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Coerce a JSON value to a finite number. Numeric strings are parsed;
/// anything else (null, bool, text, objects) is 0.
pub fn coerce_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Coerce a JSON value to an integer count, rounding fractional numbers.
pub fn coerce_count(value: &Value) -> i64 {
    if let Value::Number(n) = value {
        if let Some(i) = n.as_i64() {
            return i;
        }
    }
    // `as` saturates out-of-range floats
    coerce_number(value).round() as i64
}

pub fn lenient_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_count(&value))
}

pub fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_number(&value))
}

/// Strings stay as-is, numbers and bools are stringified, everything else is empty.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
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

/// Deserialize a payload section, falling back to its default when the
/// section is null, has the wrong shape, or fails to parse.
pub fn lenient_section<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        log::warn!("Dashboard payload section ignored: {}", e);
        T::default()
    }))
}

/// `{"CGCEL": [...], "CGPISL": [...]}` with every level tolerated:
/// a non-object map is empty, a non-array company entry is empty, and rows
/// that are not objects are dropped.
pub fn lenient_company_rows<'de, D, T>(deserializer: D) -> Result<HashMap<String, Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Object(map) = value else {
        return Ok(HashMap::new());
    };
    Ok(map
        .into_iter()
        .map(|(company, rows)| {
            let rows = rows_from_value(&company, rows);
            (company, rows)
        })
        .collect())
}

fn rows_from_value<T: DeserializeOwned>(company: &str, value: Value) -> Vec<T> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|item| {
            if !item.is_object() {
                log::debug!("Dropping non-object row for {}: {}", company, item);
                return None;
            }
            match serde_json::from_value(item) {
                Ok(row) => Some(row),
                Err(e) => {
                    log::debug!("Dropping unparseable row for {}: {}", company, e);
                    None
                }
            }
        })
        .collect()
}

/// `{"CGCEL": 10, "CGPISL": 4}` with non-object maps treated as empty and
/// each value coerced through [`coerce_count`].
pub fn lenient_company_totals<'de, D>(deserializer: D) -> Result<HashMap<String, i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Object(map) = value else {
        return Ok(HashMap::new());
    };
    Ok(map
        .into_iter()
        .map(|(company, total)| (company, coerce_count(&total)))
        .collect())
}

/// Stable content fingerprint: SHA-256 of the JSON serialization, hex encoded.
pub fn fingerprint<T: Serialize + ?Sized>(value: &T) -> String {
    let bytes = serde_json::to_vec(value).unwrap_or_default();
    hex::encode(Sha256::digest(&bytes))
}
