//! `Error`, `RangeError` and `TypeError`
//!
//! Error values are plain objects carrying `name` and `message`;
//! `instanceof` recognises them by name.

use indexmap::IndexMap;

use crate::value::{arg, InstanceCheck, NativeFn, Value};

pub(super) fn install(globals: &mut IndexMap<String, Value>) {
    register(globals, "Error", |v| {
        matches!(error_name(v).as_deref(), Some("Error" | "RangeError" | "TypeError"))
    });
    register(globals, "RangeError", |v| error_name(v).as_deref() == Some("RangeError"));
    register(globals, "TypeError", |v| error_name(v).as_deref() == Some("TypeError"));
}

fn register(globals: &mut IndexMap<String, Value>, name: &'static str, check: InstanceCheck) {
    let constructor = NativeFn::new(name, 1, move |_, args| Ok(make_error(name, arg(args, 0))))
        .with_instance_check(check);
    globals.insert(name.to_string(), Value::function(constructor));
}

fn make_error(name: &str, message: &Value) -> Value {
    let message = match message {
        Value::Undefined => String::new(),
        other => other.to_js_string(),
    };
    Value::object([("name", Value::string(name)), ("message", Value::string(message))])
}

fn error_name(value: &Value) -> Option<String> {
    value
        .as_object()
        .and_then(|o| o.get("name"))
        .and_then(|n| n.as_str().map(str::to_string))
}
