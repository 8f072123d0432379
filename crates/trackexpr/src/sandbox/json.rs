//! `JSON.stringify` and `JSON.parse`

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use super::namespace;
use crate::value::{arg, Value};

pub(super) fn install(globals: &mut IndexMap<String, Value>) {
    let json = namespace(&[("stringify", 3, stringify), ("parse", 1, parse)], &[]);
    globals.insert("JSON".to_string(), json);
}

/// `JSON.stringify(value[, replacer, indent])`. The replacer is ignored;
/// `indent` is a space count (at most 10) or a string prefix.
fn stringify(_this: &Value, args: &[Value]) -> Result<Value, String> {
    let Some(json) = arg(args, 0).to_json()? else {
        return Ok(Value::Undefined);
    };

    let indent = match arg(args, 2) {
        Value::Number(n) if *n >= 1.0 => " ".repeat((*n as usize).min(10)),
        Value::String(s) => s.chars().take(10).collect(),
        _ => String::new(),
    };

    let text = if indent.is_empty() {
        serde_json::to_string(&json).map_err(|e| e.to_string())?
    } else {
        let mut out = Vec::new();
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = Serializer::with_formatter(&mut out, formatter);
        json.serialize(&mut serializer).map_err(|e| e.to_string())?;
        String::from_utf8(out).map_err(|e| e.to_string())?
    };
    Ok(Value::string(text))
}

fn parse(_this: &Value, args: &[Value]) -> Result<Value, String> {
    let text = arg(args, 0).to_js_string();
    serde_json::from_str::<serde_json::Value>(&text)
        .map(|json| Value::from_json(&json))
        .map_err(|e| format!("Unexpected token in JSON: {}", e))
}
