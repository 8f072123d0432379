//! Conversion between values and JSON
//!
//! Hosts usually hand over event payloads and page data as JSON, and the
//! tracker reports collected data back as JSON.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Number};

use super::*;

/// Nesting beyond this is reported as a circular structure.
const MAX_JSON_DEPTH: usize = 128;

impl Value {
    /// Build a value from parsed JSON. Object key order is preserved.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::string(s.clone()),
            serde_json::Value::Array(items) => {
                Value::array(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(fields) => {
                let map: IndexMap<String, Value> = fields
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect();
                Value::from(map)
            }
        }
    }

    /// Convert to JSON.
    ///
    /// Returns `Ok(None)` for values that have no JSON form at the top
    /// level (`undefined`, functions). Inside objects such fields are
    /// skipped; inside arrays they become `null`. Non-finite numbers
    /// become `null`.
    pub fn to_json(&self) -> Result<Option<serde_json::Value>, String> {
        to_json_depth(self, 0)
    }

    /// Convert to JSON, mapping values without a JSON form to `null`.
    pub fn to_json_lossy(&self) -> serde_json::Value {
        match self.to_json() {
            Ok(Some(json)) => json,
            _ => serde_json::Value::Null,
        }
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if !n.is_finite() {
        return serde_json::Value::Null;
    }
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return serde_json::Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

fn to_json_depth(value: &Value, depth: usize) -> Result<Option<serde_json::Value>, String> {
    if depth > MAX_JSON_DEPTH {
        return Err("Converting circular structure to JSON".to_string());
    }

    let json = match value {
        Value::Undefined | Value::Function(_) => return Ok(None),
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => number_to_json(*n),
        Value::String(s) => serde_json::Value::String(s.as_str().to_string()),
        Value::RegExp(_) => serde_json::Value::Object(Map::new()),
        Value::Array(items) => {
            let items = items.read();
            let mut out = Vec::with_capacity(items.len());
            for item in items.iter() {
                out.push(to_json_depth(item, depth + 1)?.unwrap_or(serde_json::Value::Null));
            }
            serde_json::Value::Array(out)
        }
        Value::Object(fields) => {
            let fields = fields.read();
            let mut out = Map::new();
            for (k, v) in fields.iter() {
                if let Some(json) = to_json_depth(v, depth + 1)? {
                    out.insert(k.clone(), json);
                }
            }
            serde_json::Value::Object(out)
        }
    };
    Ok(Some(json))
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let json = self.to_json().map_err(serde::ser::Error::custom)?;
        json.unwrap_or(serde_json::Value::Null).serialize(serializer)
    }
}
