//! `RegExp(pattern[, flags])`

use std::sync::Arc;

use indexmap::IndexMap;

use crate::value::{arg, NativeFn, RegExpValue, Value};

pub(super) fn install(globals: &mut IndexMap<String, Value>) {
    let regexp = NativeFn::new("RegExp", 2, construct)
        .with_instance_check(|v| matches!(v, Value::RegExp(_)));
    globals.insert("RegExp".to_string(), Value::function(regexp));
}

fn construct(_this: &Value, args: &[Value]) -> Result<Value, String> {
    let (source, inherited_flags) = match arg(args, 0) {
        Value::RegExp(re) => {
            if arg(args, 1).is_undefined() {
                return Ok(Value::RegExp(re.clone()));
            }
            (re.source.clone(), re.flags.clone())
        }
        Value::Undefined => ("(?:)".to_string(), String::new()),
        other => (other.to_js_string(), String::new()),
    };
    let flags = match arg(args, 1) {
        Value::Undefined => inherited_flags,
        other => other.to_js_string(),
    };
    Ok(Value::RegExp(Arc::new(RegExpValue::new(&source, &flags)?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construct_with_flags() {
        let v = construct(&Value::Undefined, &["^a".into(), "i".into()]).unwrap();
        assert_eq!(v.get_member("flags"), Value::string("i"));
        assert_eq!(v.get_member("source"), Value::string("^a"));
    }

    #[test]
    fn test_construct_from_regexp_shares() {
        let original = construct(&Value::Undefined, &["x".into()]).unwrap();
        let copy = construct(&Value::Undefined, &[original.clone()]).unwrap();
        assert!(copy.strict_equals(&original));
    }

    #[test]
    fn test_invalid_pattern_is_error() {
        assert!(construct(&Value::Undefined, &["(".into()]).is_err());
    }
}
