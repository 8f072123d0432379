//! `String`, `Number`, `Boolean`, `Array` and `Object`
//!
//! Called as functions these convert their argument. Their statics carry
//! the usual helpers (`Number.isInteger`, `Object.keys`, ...).

use indexmap::IndexMap;

use super::math::{parse_float, parse_int};
use crate::value::{arg, NativeFn, Value};

/// Largest integer a double represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Longest array `Array(n)` and `Array.from` will allocate.
const MAX_ARRAY_LENGTH: usize = 1 << 20;

pub(super) fn install(globals: &mut IndexMap<String, Value>) {
    let string = NativeFn::new("String", 1, |_, args| {
        Ok(match args.first() {
            None => Value::string(""),
            Some(value) => Value::string(value.to_js_string()),
        })
    })
    .with_static("fromCharCode", Value::native("fromCharCode", 1, from_char_code));

    let number = NativeFn::new("Number", 1, |_, args| {
        Ok(Value::Number(args.first().map_or(0.0, Value::to_number)))
    })
    .with_static(
        "isInteger",
        Value::native("isInteger", 1, |_, a| {
            Ok(Value::Bool(matches!(arg(a, 0), Value::Number(n) if n.is_finite() && n.fract() == 0.0)))
        }),
    )
    .with_static(
        "isSafeInteger",
        Value::native("isSafeInteger", 1, |_, a| {
            Ok(Value::Bool(matches!(
                arg(a, 0),
                Value::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER
            )))
        }),
    )
    .with_static(
        "isFinite",
        Value::native("isFinite", 1, |_, a| {
            Ok(Value::Bool(matches!(arg(a, 0), Value::Number(n) if n.is_finite())))
        }),
    )
    .with_static(
        "isNaN",
        Value::native("isNaN", 1, |_, a| {
            Ok(Value::Bool(matches!(arg(a, 0), Value::Number(n) if n.is_nan())))
        }),
    )
    .with_static(
        "parseFloat",
        Value::native("parseFloat", 1, |_, a| {
            Ok(Value::Number(parse_float(&arg(a, 0).to_js_string())))
        }),
    )
    .with_static(
        "parseInt",
        Value::native("parseInt", 2, |_, a| {
            let radix = match arg(a, 1) {
                Value::Undefined => 0,
                other => other.to_int32(),
            };
            Ok(Value::Number(parse_int(&arg(a, 0).to_js_string(), radix)))
        }),
    )
    .with_static("MAX_SAFE_INTEGER", Value::Number(MAX_SAFE_INTEGER))
    .with_static("MIN_SAFE_INTEGER", Value::Number(-MAX_SAFE_INTEGER))
    .with_static("EPSILON", Value::Number(f64::EPSILON))
    .with_static("MAX_VALUE", Value::Number(f64::MAX))
    .with_static("MIN_VALUE", Value::Number(5e-324))
    .with_static("POSITIVE_INFINITY", Value::Number(f64::INFINITY))
    .with_static("NEGATIVE_INFINITY", Value::Number(f64::NEG_INFINITY))
    .with_static("NaN", Value::Number(f64::NAN));

    let boolean = NativeFn::new("Boolean", 1, |_, a| Ok(Value::Bool(arg(a, 0).is_truthy())));

    let array = NativeFn::new("Array", 1, array_construct)
        .with_static(
            "isArray",
            Value::native("isArray", 1, |_, a| Ok(Value::Bool(arg(a, 0).is_array()))),
        )
        .with_static("of", Value::native("of", 0, |_, a| Ok(Value::array(a.to_vec()))))
        .with_static("from", Value::native("from", 1, array_from))
        .with_instance_check(|v| v.is_array());

    let object = NativeFn::new("Object", 1, |_, a| {
        Ok(match arg(a, 0) {
            Value::Undefined | Value::Null => Value::empty_object(),
            other => other.clone(),
        })
    })
    .with_static("keys", Value::native("keys", 1, object_keys))
    .with_static("values", Value::native("values", 1, object_values))
    .with_static("entries", Value::native("entries", 1, object_entries))
    .with_static("assign", Value::native("assign", 2, object_assign))
    .with_instance_check(|v| !v.is_primitive());

    globals.insert("String".to_string(), Value::function(string));
    globals.insert("Number".to_string(), Value::function(number));
    globals.insert("Boolean".to_string(), Value::function(boolean));
    globals.insert("Array".to_string(), Value::function(array));
    globals.insert("Object".to_string(), Value::function(object));
}

fn from_char_code(_this: &Value, args: &[Value]) -> Result<Value, String> {
    let units: Vec<u16> = args.iter().map(|a| a.to_uint32() as u16).collect();
    Ok(Value::string(String::from_utf16_lossy(&units)))
}

fn array_construct(_this: &Value, args: &[Value]) -> Result<Value, String> {
    match args {
        [Value::Number(n)] => {
            if n.fract() != 0.0 || *n < 0.0 {
                return Err("Invalid array length".to_string());
            }
            Ok(Value::array(vec![Value::Undefined; checked_length(*n)?]))
        }
        _ => Ok(Value::array(args.to_vec())),
    }
}

fn checked_length(n: f64) -> Result<usize, String> {
    if n > MAX_ARRAY_LENGTH as f64 {
        return Err("Invalid array length".to_string());
    }
    Ok(n as usize)
}

fn array_from(_this: &Value, args: &[Value]) -> Result<Value, String> {
    Ok(match arg(args, 0) {
        Value::Array(items) => Value::array(items.to_vec()),
        Value::String(s) => Value::array(s.chars().map(|c| Value::string(c.to_string())).collect()),
        Value::Object(fields) => {
            // Array-likes: `{ length: 2, 0: 'a', 1: 'b' }`
            let len = fields.get("length").map_or(0.0, |l| l.to_number());
            let len = if len > 0.0 { checked_length(len.floor())? } else { 0 };
            Value::array(
                (0..len)
                    .map(|i| fields.get(&i.to_string()).unwrap_or(Value::Undefined))
                    .collect(),
            )
        }
        Value::Undefined | Value::Null => {
            return Err("Array.from requires an array-like object".to_string())
        }
        _ => Value::array(vec![]),
    })
}

/// Own enumerable keys of `value`, as `Object.keys` reports them.
fn own_keys(value: &Value) -> Result<Vec<String>, String> {
    match value {
        Value::Undefined | Value::Null => {
            Err("Cannot convert undefined or null to object".to_string())
        }
        Value::Object(fields) => Ok(fields.keys()),
        Value::Array(items) => Ok((0..items.len()).map(|i| i.to_string()).collect()),
        Value::String(s) => Ok((0..s.chars().count()).map(|i| i.to_string()).collect()),
        _ => Ok(Vec::new()),
    }
}

fn object_keys(_this: &Value, args: &[Value]) -> Result<Value, String> {
    let keys = own_keys(arg(args, 0))?;
    Ok(Value::array(keys.into_iter().map(Value::from).collect()))
}

fn object_values(_this: &Value, args: &[Value]) -> Result<Value, String> {
    let target = arg(args, 0);
    let keys = own_keys(target)?;
    Ok(Value::array(
        keys.iter().map(|k| target.get_member(k)).collect(),
    ))
}

fn object_entries(_this: &Value, args: &[Value]) -> Result<Value, String> {
    let target = arg(args, 0);
    let keys = own_keys(target)?;
    Ok(Value::array(
        keys.into_iter()
            .map(|k| {
                let value = target.get_member(&k);
                Value::array(vec![Value::from(k), value])
            })
            .collect(),
    ))
}

fn object_assign(_this: &Value, args: &[Value]) -> Result<Value, String> {
    let target = match arg(args, 0) {
        Value::Object(fields) => fields.clone(),
        Value::Undefined | Value::Null => {
            return Err("Cannot convert undefined or null to object".to_string())
        }
        other => return Ok(other.clone()),
    };
    for source in args.iter().skip(1) {
        if source.is_nullish() {
            continue;
        }
        for key in own_keys(source)? {
            let value = source.get_member(&key);
            target.insert(key, value);
        }
    }
    Ok(Value::Object(target))
}
