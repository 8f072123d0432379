//! Coercions between value kinds
//!
//! These follow the host platform's scripting rules so that an expression
//! such as `$DATA.count + 1` or `$EVENT.detail.x == '3'` produces the
//! same result a tracking config author would expect from the host.

use super::Value;

impl Value {
    /// Truthiness as used by `!`, `&&`, `||` and `?:`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => !(*n == 0.0 || n.is_nan()),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::RegExp(_) | Value::Function(_) => true,
        }
    }

    /// The `typeof` name of the value.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) | Value::Object(_) | Value::RegExp(_) => "object",
            Value::Function(_) => "function",
        }
    }

    /// Numeric conversion.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::String(s) => string_to_number(s),
            Value::Array(_) => string_to_number(&self.to_js_string()),
            Value::Object(_) | Value::RegExp(_) | Value::Function(_) => f64::NAN,
        }
    }

    /// String conversion.
    pub fn to_js_string(&self) -> String {
        self.to_js_string_depth(0)
    }

    fn to_js_string_depth(&self, depth: usize) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => number_to_string(*n),
            Value::String(s) => s.as_str().to_string(),
            Value::Array(items) => {
                // Self-referencing arrays would otherwise recurse forever
                if depth > 64 {
                    return String::new();
                }
                items
                    .read()
                    .iter()
                    .map(|item| match item {
                        Value::Undefined | Value::Null => String::new(),
                        other => other.to_js_string_depth(depth + 1),
                    })
                    .collect::<Vec<_>>()
                    .join(",")
            }
            Value::Object(_) => "[object Object]".to_string(),
            Value::RegExp(re) => format!("/{}/{}", re.source, re.flags),
            Value::Function(f) => format!("function {}() {{ [native code] }}", f.name),
        }
    }

    /// Reduce compound values to a primitive (their string form).
    pub fn to_primitive(&self) -> Value {
        if self.is_primitive() {
            self.clone()
        } else {
            Value::string(self.to_js_string())
        }
    }

    /// Convert to a property key for member access.
    pub fn to_property_key(&self) -> String {
        match self {
            Value::String(s) => s.as_str().to_string(),
            other => other.to_js_string(),
        }
    }

    /// 32-bit signed integer conversion used by bitwise operators.
    pub fn to_int32(&self) -> i32 {
        self.to_uint32() as i32
    }

    /// 32-bit unsigned integer conversion used by `>>>` and shift counts.
    pub fn to_uint32(&self) -> u32 {
        let n = self.to_number();
        if !n.is_finite() || n == 0.0 {
            return 0;
        }
        let modulus = 4_294_967_296.0_f64;
        let wrapped = n.trunc().rem_euclid(modulus);
        wrapped as u32
    }

    /// `===`: no coercion; compound values compare by identity.
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::RegExp(a), Value::RegExp(b)) => std::sync::Arc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => std::sync::Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Like `===` but `NaN` equals itself. Used by `includes`.
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) if a.is_nan() && b.is_nan() => true,
            _ => self.strict_equals(other),
        }
    }

    /// `==`: equality after the host's implicit conversions.
    pub fn loose_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
            (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
            (Value::Number(a), Value::String(_)) => *a == other.to_number(),
            (Value::String(_), Value::Number(b)) => self.to_number() == *b,
            (Value::Bool(_), _) => Value::Number(self.to_number()).loose_equals(other),
            (_, Value::Bool(_)) => self.loose_equals(&Value::Number(other.to_number())),
            (a, b) if a.is_primitive() && !b.is_primitive() => a.loose_equals(&b.to_primitive()),
            (a, b) if !a.is_primitive() && b.is_primitive() => a.to_primitive().loose_equals(b),
            _ => self.strict_equals(other),
        }
    }
}

/// Format a number the way the host prints it: integers without a
/// fractional part, `NaN`, `Infinity`, and exponent form outside
/// `[1e-6, 1e21)`.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let abs = n.abs();
    if abs >= 1e21 || abs < 1e-6 {
        let formatted = format!("{:e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        };
    }
    if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}

/// Parse a string as a number: surrounding whitespace ignored, empty is
/// zero, `0x`/`0o`/`0b` prefixes and `Infinity` accepted, anything else
/// malformed is `NaN`.
pub fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix_prefixed = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)];
    for (prefix, radix) in radix_prefixed {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix)
                .map(|v| v as f64)
                .unwrap_or(f64::NAN);
        }
    }

    // Rust's float parser also accepts words like "inf" and "nan"
    let numeric_chars = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !numeric_chars {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}
