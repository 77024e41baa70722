// src/payload/mod.rs

use crate::rows::Row;
use serde::Serialize;
use std::{collections::BTreeMap, fmt};

/// Source field renamed on the way out; every other name passes through.
const PW_FIELD: &str = "pw";
const PW_KEY: &str = "PW";

/// A raw CSV value after best-effort numeric coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    /// Non-negative integers above `i64::MAX`.
    Unsigned(u64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Coerce one raw value.
    ///
    /// Values containing `.` are tried as floats, everything else as
    /// integers. Anything that fails its parse is kept verbatim as text,
    /// so `"007"` becomes `7` but `""` and `"N/A"` stay strings.
    pub fn coerce(raw: &str) -> Self {
        let trimmed = raw.trim();
        let parsed = if raw.contains('.') {
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(FieldValue::Float)
        } else {
            trimmed
                .parse::<i64>()
                .map(FieldValue::Integer)
                .or_else(|_| trimmed.parse::<u64>().map(FieldValue::Unsigned))
                .ok()
        };
        parsed.unwrap_or_else(|| FieldValue::Text(raw.to_string()))
    }
}

/// JSON body sent for one row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Payload(BTreeMap<String, FieldValue>);

#[cfg(test)]
impl Payload {
    fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Build the payload for one row: coerce every value and rename `pw` to `PW`.
pub fn convert(row: &Row<'_>) -> Payload {
    convert_fields(row.fields())
}

/// Same as [`convert`] over any `(name, raw value)` sequence. A repeated
/// name keeps its last value.
pub fn convert_fields<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Payload {
    let map = fields
        .into_iter()
        .map(|(name, raw)| {
            let key = if name == PW_FIELD { PW_KEY } else { name };
            (key.to_string(), FieldValue::coerce(raw))
        })
        .collect();
    Payload(map)
}
