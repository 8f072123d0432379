//! Display and Debug implementations for Value

use std::fmt;

use super::*;

/// Nesting beyond this prints as `[Circular]`.
const MAX_INSPECT_DEPTH: usize = 32;

fn inspect(value: &Value, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    match value {
        Value::Undefined => write!(f, "undefined"),
        Value::Null => write!(f, "null"),
        Value::Bool(b) => write!(f, "{}", b),
        Value::Number(n) => write!(f, "{}", number_to_string(*n)),
        Value::String(s) => write!(f, "{:?}", s.as_str()),

        Value::Array(items) => {
            if depth >= MAX_INSPECT_DEPTH {
                return write!(f, "[Circular]");
            }
            write!(f, "[")?;
            for (i, item) in items.read().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                inspect(item, f, depth + 1)?;
            }
            write!(f, "]")
        }

        Value::Object(fields) => {
            if depth >= MAX_INSPECT_DEPTH {
                return write!(f, "[Circular]");
            }
            let fields = fields.read();
            if fields.is_empty() {
                return write!(f, "{{}}");
            }
            write!(f, "{{ ")?;
            for (i, (k, v)) in fields.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: ", k)?;
                inspect(v, f, depth + 1)?;
            }
            write!(f, " }}")
        }

        Value::RegExp(re) => write!(f, "/{}/{}", re.source, re.flags),
        Value::Function(func) => write!(f, "[Function: {}]", func.name),
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        inspect(self, f, 0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Display is more user-friendly, Debug is more detailed
        match self {
            Value::String(s) => write!(f, "{}", s.as_str()), // No quotes for Display
            _ => fmt::Debug::fmt(self, f),
        }
    }
}
