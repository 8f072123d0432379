//! Default capability set
//!
//! Every evaluation sees these bindings unless the caller shadows them.
//! The set is built once on first use and only ever cloned afterwards;
//! clones share the underlying values, so building a [`Context`] per call
//! stays cheap.
//!
//! Nothing here can evaluate source text: there is no `eval` and no
//! `Function` constructor.
//!
//! [`Context`]: crate::Context

mod console;
mod constructors;
mod date;
mod errors;
mod json;
mod math;
mod regexp;
mod timers;
mod uri;

use std::sync::OnceLock;

use indexmap::IndexMap;

use crate::value::Value;

pub use timers::active_timers;

/// The default bindings, in registration order.
pub fn defaults() -> &'static IndexMap<String, Value> {
    static DEFAULTS: OnceLock<IndexMap<String, Value>> = OnceLock::new();
    DEFAULTS.get_or_init(build_defaults)
}

fn build_defaults() -> IndexMap<String, Value> {
    let mut globals = IndexMap::new();

    // Sentinels
    globals.insert("undefined".to_string(), Value::Undefined);
    globals.insert("null".to_string(), Value::Null);
    globals.insert("Infinity".to_string(), Value::Number(f64::INFINITY));
    globals.insert("NaN".to_string(), Value::Number(f64::NAN));

    math::install(&mut globals);
    constructors::install(&mut globals);
    date::install(&mut globals);
    json::install(&mut globals);
    regexp::install(&mut globals);
    timers::install(&mut globals);
    console::install(&mut globals);
    errors::install(&mut globals);
    uri::install(&mut globals);

    globals
}

/// Register a plain native function under its own name.
fn define(
    globals: &mut IndexMap<String, Value>,
    name: &'static str,
    arity: usize,
    func: fn(&Value, &[Value]) -> Result<Value, String>,
) {
    globals.insert(name.to_string(), Value::native(name, arity, func));
}

/// Build a namespace object (`Math`, `JSON`, `console`) from native
/// functions and constants.
fn namespace(
    functions: &[(&'static str, usize, fn(&Value, &[Value]) -> Result<Value, String>)],
    constants: &[(&'static str, Value)],
) -> Value {
    let mut fields: IndexMap<String, Value> = IndexMap::new();
    for &(name, arity, func) in functions {
        fields.insert(name.to_string(), Value::native(name, arity, func));
    }
    for (name, value) in constants {
        fields.insert(name.to_string(), value.clone());
    }
    Value::from(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_shared() {
        let a = defaults();
        let b = defaults();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_expected_names_present() {
        let names = [
            "Math", "Infinity", "NaN", "isFinite", "isNaN", "parseFloat", "parseInt", "Date",
            "JSON", "String", "Number", "Boolean", "Array", "Object", "RegExp", "setTimeout",
            "setInterval", "clearTimeout", "clearInterval", "undefined", "null", "console",
            "Error", "RangeError", "TypeError", "encodeURI", "encodeURIComponent", "decodeURI",
            "decodeURIComponent", "escape", "unescape",
        ];
        for name in names {
            assert!(defaults().contains_key(name), "missing {}", name);
        }
    }

    #[test]
    fn test_no_source_evaluation() {
        assert!(!defaults().contains_key("eval"));
        assert!(!defaults().contains_key("Function"));
    }
}
