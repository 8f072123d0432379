//! Property access on values
//!
//! Objects expose their own fields; arrays, strings, numbers, booleans and
//! regular expressions expose a small built-in member set (`length`,
//! indices and methods such as `indexOf` or `toFixed`). Methods read their
//! receiver from `this`, so `'abc'.toUpperCase()` works because the
//! evaluator passes the member's object as the receiver.

use std::sync::OnceLock;

use indexmap::IndexMap;

use super::*;

// ═══════════════════════════════════════════════════════════════════════
// Member Access
// ═══════════════════════════════════════════════════════════════════════

impl Value {
    /// Read a member. Missing members (and members of `null`/`undefined`)
    /// are `undefined`.
    pub fn get_member(&self, key: &str) -> Value {
        match self {
            Value::Undefined | Value::Null => Value::Undefined,
            Value::Bool(_) => method(bool_methods(), key),
            Value::Number(_) => method(number_methods(), key),
            Value::String(s) => {
                if key == "length" {
                    return Value::from(s.chars().count());
                }
                if let Some(index) = array_index(key) {
                    return s
                        .chars()
                        .nth(index)
                        .map(|c| Value::string(c.to_string()))
                        .unwrap_or(Value::Undefined);
                }
                method(string_methods(), key)
            }
            Value::Array(items) => {
                if key == "length" {
                    return Value::from(items.len());
                }
                if let Some(index) = array_index(key) {
                    return items.get(index).unwrap_or(Value::Undefined);
                }
                method(array_methods(), key)
            }
            Value::Object(fields) => fields
                .get(key)
                .unwrap_or_else(|| method(object_methods(), key)),
            Value::RegExp(re) => match key {
                "source" => Value::string(re.source.clone()),
                "flags" => Value::string(re.flags.clone()),
                "global" => Value::Bool(re.is_global()),
                "ignoreCase" => Value::Bool(re.flags.contains('i')),
                "multiline" => Value::Bool(re.flags.contains('m')),
                _ => method(regexp_methods(), key),
            },
            Value::Function(f) => match key {
                "name" => Value::string(f.name.clone()),
                "length" => Value::from(f.arity),
                _ => f.statics.get(key).cloned().unwrap_or(Value::Undefined),
            },
        }
    }

    /// Remove a member, as `delete` does. Returns whether the member is
    /// gone afterwards. Array elements become holes.
    pub fn delete_member(&self, key: &str) -> bool {
        match self {
            Value::Object(fields) => {
                fields.remove(key);
                true
            }
            Value::Array(items) => {
                if key == "length" {
                    return false;
                }
                if let Some(index) = array_index(key) {
                    if let Some(slot) = items.write().get_mut(index) {
                        *slot = Value::Undefined;
                    }
                }
                true
            }
            Value::String(s) => {
                key != "length" && array_index(key).map_or(true, |i| i >= s.chars().count())
            }
            Value::Function(f) => !f.statics.contains_key(key) && key != "name" && key != "length",
            _ => true,
        }
    }

    /// Whether `key in self` holds. Only objects, arrays, functions and
    /// regular expressions can be searched.
    pub fn has_property(&self, key: &str) -> Result<bool, String> {
        match self {
            Value::Object(fields) => {
                Ok(fields.contains_key(key) || object_methods().contains_key(key))
            }
            Value::Array(items) => Ok(key == "length"
                || array_index(key).map_or(false, |i| i < items.len())
                || array_methods().contains_key(key)),
            Value::Function(f) => {
                Ok(key == "name" || key == "length" || f.statics.contains_key(key))
            }
            Value::RegExp(_) => Ok(matches!(
                key,
                "source" | "flags" | "global" | "ignoreCase" | "multiline"
            ) || regexp_methods().contains_key(key)),
            other => Err(format!(
                "Cannot use 'in' operator to search for '{}' in {}",
                key,
                other.to_js_string()
            )),
        }
    }
}

/// Parse a canonical array index (`"0"`, `"12"`, not `"01"` or `"-1"`).
pub fn array_index(key: &str) -> Option<usize> {
    let index: usize = key.parse().ok()?;
    if index.to_string() == key {
        Some(index)
    } else {
        None
    }
}

fn method(table: &IndexMap<&'static str, Value>, key: &str) -> Value {
    table.get(key).cloned().unwrap_or(Value::Undefined)
}

type MethodTable = IndexMap<&'static str, Value>;

fn table(entries: &[(&'static str, usize, NativeFnImpl)]) -> MethodTable {
    entries
        .iter()
        .map(|&(name, arity, func)| (name, Value::native(name, arity, func)))
        .collect()
}

type NativeFnImpl = fn(&Value, &[Value]) -> Result<Value, String>;

// ═══════════════════════════════════════════════════════════════════════
// Index Helpers
// ═══════════════════════════════════════════════════════════════════════

/// Resolve a possibly negative position against `len` (`slice` semantics).
fn relative_index(value: &Value, len: usize, default: usize) -> usize {
    if value.is_undefined() {
        return default;
    }
    let n = value.to_number();
    if n.is_nan() {
        return 0;
    }
    let n = n.trunc();
    if n < 0.0 {
        (len as f64 + n).max(0.0) as usize
    } else {
        n.min(len as f64) as usize
    }
}

/// Clamp a position into `[0, len]` (`substring` semantics).
fn clamped_index(value: &Value, len: usize, default: usize) -> usize {
    if value.is_undefined() {
        return default;
    }
    let n = value.to_number();
    if n.is_nan() {
        return 0;
    }
    n.trunc().clamp(0.0, len as f64) as usize
}

fn find_chars(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from.min(haystack.len()));
    }
    if needle.len() > haystack.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&start| &haystack[start..start + needle.len()] == needle)
}

// ═══════════════════════════════════════════════════════════════════════
// String Methods
// ═══════════════════════════════════════════════════════════════════════

fn string_methods() -> &'static MethodTable {
    static TABLE: OnceLock<MethodTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        table(&[
            ("charAt", 1, string_char_at),
            ("indexOf", 1, string_index_of),
            ("includes", 1, string_includes),
            ("startsWith", 1, string_starts_with),
            ("endsWith", 1, string_ends_with),
            ("slice", 2, string_slice),
            ("substring", 2, string_substring),
            ("toUpperCase", 0, |this, _| Ok(Value::string(this.to_js_string().to_uppercase()))),
            ("toLowerCase", 0, |this, _| Ok(Value::string(this.to_js_string().to_lowercase()))),
            ("trim", 0, |this, _| Ok(Value::string(this.to_js_string().trim()))),
            ("split", 2, string_split),
            ("replace", 2, string_replace),
            ("concat", 1, string_concat),
            ("toString", 0, |this, _| Ok(Value::string(this.to_js_string()))),
        ])
    })
}

fn string_char_at(this: &Value, args: &[Value]) -> Result<Value, String> {
    let s = this.to_js_string();
    let index = arg(args, 0).to_number();
    let index = if index.is_nan() { 0.0 } else { index.trunc() };
    if index < 0.0 {
        return Ok(Value::string(""));
    }
    Ok(s.chars()
        .nth(index as usize)
        .map(|c| Value::string(c.to_string()))
        .unwrap_or_else(|| Value::string("")))
}

fn string_index_of(this: &Value, args: &[Value]) -> Result<Value, String> {
    let haystack: Vec<char> = this.to_js_string().chars().collect();
    let needle: Vec<char> = arg(args, 0).to_js_string().chars().collect();
    let from = clamped_index(arg(args, 1), haystack.len(), 0);
    Ok(find_chars(&haystack, &needle, from)
        .map(Value::from)
        .unwrap_or(Value::Number(-1.0)))
}

fn string_includes(this: &Value, args: &[Value]) -> Result<Value, String> {
    if let Value::RegExp(_) = arg(args, 0) {
        return Err("First argument to String.prototype.includes must not be a regular expression".to_string());
    }
    let haystack: Vec<char> = this.to_js_string().chars().collect();
    let needle: Vec<char> = arg(args, 0).to_js_string().chars().collect();
    let from = clamped_index(arg(args, 1), haystack.len(), 0);
    Ok(Value::Bool(find_chars(&haystack, &needle, from).is_some()))
}

fn string_starts_with(this: &Value, args: &[Value]) -> Result<Value, String> {
    let haystack: Vec<char> = this.to_js_string().chars().collect();
    let needle: Vec<char> = arg(args, 0).to_js_string().chars().collect();
    let start = clamped_index(arg(args, 1), haystack.len(), 0);
    Ok(Value::Bool(haystack[start..].starts_with(&needle)))
}

fn string_ends_with(this: &Value, args: &[Value]) -> Result<Value, String> {
    let haystack: Vec<char> = this.to_js_string().chars().collect();
    let needle: Vec<char> = arg(args, 0).to_js_string().chars().collect();
    let end = clamped_index(arg(args, 1), haystack.len(), haystack.len());
    Ok(Value::Bool(haystack[..end].ends_with(&needle)))
}

fn string_slice(this: &Value, args: &[Value]) -> Result<Value, String> {
    let chars: Vec<char> = this.to_js_string().chars().collect();
    let start = relative_index(arg(args, 0), chars.len(), 0);
    let end = relative_index(arg(args, 1), chars.len(), chars.len());
    if start >= end {
        return Ok(Value::string(""));
    }
    Ok(Value::string(chars[start..end].iter().collect::<String>()))
}

fn string_substring(this: &Value, args: &[Value]) -> Result<Value, String> {
    let chars: Vec<char> = this.to_js_string().chars().collect();
    let a = clamped_index(arg(args, 0), chars.len(), 0);
    let b = clamped_index(arg(args, 1), chars.len(), chars.len());
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    Ok(Value::string(chars[start..end].iter().collect::<String>()))
}

fn string_split(this: &Value, args: &[Value]) -> Result<Value, String> {
    let s = this.to_js_string();
    let limit = match arg(args, 1) {
        Value::Undefined => usize::MAX,
        other => other.to_uint32() as usize,
    };

    let parts: Vec<Value> = match arg(args, 0) {
        Value::Undefined => vec![Value::string(s)],
        Value::RegExp(re) => re.regex.split(&s).map(Value::from).collect(),
        separator => {
            let separator = separator.to_js_string();
            if separator.is_empty() {
                s.chars().map(|c| Value::string(c.to_string())).collect()
            } else {
                s.split(separator.as_str()).map(Value::from).collect()
            }
        }
    };
    Ok(Value::array(parts.into_iter().take(limit).collect()))
}

fn string_replace(this: &Value, args: &[Value]) -> Result<Value, String> {
    let s = this.to_js_string();
    let replacement = arg(args, 1);

    // A callable replacement receives the matched text
    let substitute = |matched: &str| -> Result<String, String> {
        match replacement {
            Value::Function(f) => Ok(f
                .call(&Value::Undefined, &[Value::string(matched)])?
                .to_js_string()),
            other => Ok(other.to_js_string()),
        }
    };

    match arg(args, 0) {
        Value::RegExp(re) => {
            let limit = if re.is_global() { usize::MAX } else { 1 };
            let mut out = String::with_capacity(s.len());
            let mut last = 0;
            for caps in re.regex.captures_iter(&s).take(limit) {
                let Some(whole) = caps.get(0) else { continue };
                out.push_str(&s[last..whole.start()]);
                match replacement {
                    Value::Function(_) => out.push_str(&substitute(whole.as_str())?),
                    other => caps.expand(&other.to_js_string(), &mut out),
                }
                last = whole.end();
            }
            out.push_str(&s[last..]);
            Ok(Value::string(out))
        }
        pattern => {
            let pattern = pattern.to_js_string();
            match s.find(pattern.as_str()) {
                Some(pos) => {
                    let mut out = String::with_capacity(s.len());
                    out.push_str(&s[..pos]);
                    out.push_str(&substitute(&pattern)?);
                    out.push_str(&s[pos + pattern.len()..]);
                    Ok(Value::string(out))
                }
                None => Ok(Value::string(s)),
            }
        }
    }
}

fn string_concat(this: &Value, args: &[Value]) -> Result<Value, String> {
    let mut s = this.to_js_string();
    for a in args {
        s.push_str(&a.to_js_string());
    }
    Ok(Value::string(s))
}

// ═══════════════════════════════════════════════════════════════════════
// Array Methods
// ═══════════════════════════════════════════════════════════════════════

fn array_methods() -> &'static MethodTable {
    static TABLE: OnceLock<MethodTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        table(&[
            ("join", 1, array_join),
            ("indexOf", 1, array_index_of),
            ("includes", 1, array_includes),
            ("slice", 2, array_slice),
            ("concat", 1, array_concat),
            ("toString", 0, |this, _| array_join(this, &[])),
        ])
    })
}

fn this_array(this: &Value, method: &str) -> Result<Vec<Value>, String> {
    match this {
        Value::Array(items) => Ok(items.to_vec()),
        other => Err(format!(
            "Array.prototype.{} called on {}",
            method,
            other.type_of()
        )),
    }
}

fn array_join(this: &Value, args: &[Value]) -> Result<Value, String> {
    let items = this_array(this, "join")?;
    let separator = match arg(args, 0) {
        Value::Undefined => ",".to_string(),
        other => other.to_js_string(),
    };
    let joined = items
        .iter()
        .map(|item| match item {
            Value::Undefined | Value::Null => String::new(),
            other => other.to_js_string(),
        })
        .collect::<Vec<_>>()
        .join(&separator);
    Ok(Value::string(joined))
}

fn array_index_of(this: &Value, args: &[Value]) -> Result<Value, String> {
    let items = this_array(this, "indexOf")?;
    let target = arg(args, 0);
    let from = relative_index(arg(args, 1), items.len(), 0);
    Ok(items
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, item)| item.strict_equals(target))
        .map(|(i, _)| Value::from(i))
        .unwrap_or(Value::Number(-1.0)))
}

fn array_includes(this: &Value, args: &[Value]) -> Result<Value, String> {
    let items = this_array(this, "includes")?;
    let target = arg(args, 0);
    Ok(Value::Bool(items.iter().any(|item| item.same_value_zero(target))))
}

fn array_slice(this: &Value, args: &[Value]) -> Result<Value, String> {
    let items = this_array(this, "slice")?;
    let start = relative_index(arg(args, 0), items.len(), 0);
    let end = relative_index(arg(args, 1), items.len(), items.len());
    if start >= end {
        return Ok(Value::array(vec![]));
    }
    Ok(Value::array(items[start..end].to_vec()))
}

fn array_concat(this: &Value, args: &[Value]) -> Result<Value, String> {
    let mut items = this_array(this, "concat")?;
    for a in args {
        match a {
            Value::Array(more) => items.extend(more.to_vec()),
            other => items.push(other.clone()),
        }
    }
    Ok(Value::array(items))
}

// ═══════════════════════════════════════════════════════════════════════
// Number, Boolean, Object and RegExp Methods
// ═══════════════════════════════════════════════════════════════════════

fn number_methods() -> &'static MethodTable {
    static TABLE: OnceLock<MethodTable> = OnceLock::new();
    TABLE.get_or_init(|| table(&[("toFixed", 1, number_to_fixed), ("toString", 1, number_to_radix)]))
}

fn number_to_fixed(this: &Value, args: &[Value]) -> Result<Value, String> {
    let n = this.to_number();
    let digits = match arg(args, 0) {
        Value::Undefined => 0.0,
        other => other.to_number().trunc(),
    };
    if !(0.0..=100.0).contains(&digits) {
        return Err("toFixed() digits argument must be between 0 and 100".to_string());
    }
    if !n.is_finite() || n.abs() >= 1e21 {
        return Ok(Value::string(number_to_string(n)));
    }
    Ok(Value::string(format!("{:.*}", digits as usize, n)))
}

fn number_to_radix(this: &Value, args: &[Value]) -> Result<Value, String> {
    let n = this.to_number();
    let radix = match arg(args, 0) {
        Value::Undefined => 10.0,
        other => other.to_number().trunc(),
    };
    if !(2.0..=36.0).contains(&radix) {
        return Err("toString() radix must be between 2 and 36".to_string());
    }
    let radix = radix as u32;
    if radix == 10 || !n.is_finite() || n.fract() != 0.0 || n.abs() > 9_007_199_254_740_992.0 {
        return Ok(Value::string(number_to_string(n)));
    }

    let mut magnitude = n.abs() as u64;
    if magnitude == 0 {
        return Ok(Value::string("0"));
    }
    let mut digits = Vec::new();
    while magnitude > 0 {
        let digit = (magnitude % radix as u64) as u32;
        digits.push(std::char::from_digit(digit, radix).unwrap_or('0'));
        magnitude /= radix as u64;
    }
    if n < 0.0 {
        digits.push('-');
    }
    Ok(Value::string(digits.into_iter().rev().collect::<String>()))
}

fn bool_methods() -> &'static MethodTable {
    static TABLE: OnceLock<MethodTable> = OnceLock::new();
    TABLE.get_or_init(|| table(&[("toString", 0, |this, _| Ok(Value::string(this.to_js_string())))]))
}

fn object_methods() -> &'static MethodTable {
    static TABLE: OnceLock<MethodTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        table(&[
            ("hasOwnProperty", 1, |this, args| {
                let key = arg(args, 0).to_property_key();
                Ok(Value::Bool(
                    this.as_object().map_or(false, |o| o.contains_key(&key)),
                ))
            }),
            ("toString", 0, |this, _| Ok(Value::string(this.to_js_string()))),
        ])
    })
}

fn regexp_methods() -> &'static MethodTable {
    static TABLE: OnceLock<MethodTable> = OnceLock::new();
    TABLE.get_or_init(|| table(&[("test", 1, regexp_test), ("exec", 1, regexp_exec)]))
}

fn this_regexp<'a>(this: &'a Value, method: &str) -> Result<&'a RegExpValue, String> {
    match this {
        Value::RegExp(re) => Ok(re),
        other => Err(format!(
            "RegExp.prototype.{} called on {}",
            method,
            other.type_of()
        )),
    }
}

fn regexp_test(this: &Value, args: &[Value]) -> Result<Value, String> {
    let re = this_regexp(this, "test")?;
    Ok(Value::Bool(re.regex.is_match(&arg(args, 0).to_js_string())))
}

fn regexp_exec(this: &Value, args: &[Value]) -> Result<Value, String> {
    let re = this_regexp(this, "exec")?;
    let input = arg(args, 0).to_js_string();
    match re.regex.captures(&input) {
        Some(caps) => Ok(Value::array(
            caps.iter()
                .map(|group| {
                    group
                        .map(|m| Value::string(m.as_str()))
                        .unwrap_or(Value::Undefined)
                })
                .collect(),
        )),
        None => Ok(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn call(value: &Value, name: &str, args: &[Value]) -> Value {
        match value.get_member(name) {
            Value::Function(f) => f.call(value, args).unwrap(),
            other => panic!("{} is not a method: {:?}", name, other),
        }
    }

    #[test]
    fn test_array_index_canonical() {
        assert_eq!(array_index("0"), Some(0));
        assert_eq!(array_index("12"), Some(12));
        assert_eq!(array_index("01"), None);
        assert_eq!(array_index("-1"), None);
        assert_eq!(array_index("x"), None);
    }

    #[test]
    fn test_object_member() {
        let obj = Value::object([("a", Value::Number(1.0))]);
        assert_eq!(obj.get_member("a"), Value::Number(1.0));
        assert_eq!(obj.get_member("b"), Value::Undefined);
    }

    #[test]
    fn test_string_length_and_index() {
        let s = Value::string("héllo");
        assert_eq!(s.get_member("length"), Value::Number(5.0));
        assert_eq!(s.get_member("1"), Value::string("é"));
        assert_eq!(s.get_member("9"), Value::Undefined);
    }

    #[test]
    fn test_string_methods() {
        let s = Value::string("Hello, World");
        assert_eq!(call(&s, "indexOf", &["World".into()]), Value::Number(7.0));
        assert_eq!(call(&s, "indexOf", &["x".into()]), Value::Number(-1.0));
        assert_eq!(call(&s, "slice", &[Value::Number(-5.0)]), Value::string("World"));
        assert_eq!(
            call(&s, "substring", &[Value::Number(5.0), Value::Number(0.0)]),
            Value::string("Hello")
        );
        assert_eq!(call(&s, "toUpperCase", &[]), Value::string("HELLO, WORLD"));
        assert_eq!(call(&s, "startsWith", &["Hell".into()]), Value::Bool(true));
        assert_eq!(call(&s, "endsWith", &["World".into()]), Value::Bool(true));
        assert_eq!(call(&s, "charAt", &[Value::Number(4.0)]), Value::string("o"));
    }

    #[test]
    fn test_string_split_and_replace() {
        let s = Value::string("a-b-c");
        assert_eq!(
            call(&s, "split", &["-".into()]),
            Value::array(vec!["a".into(), "b".into(), "c".into()])
        );
        assert_eq!(
            call(&s, "split", &["-".into(), Value::Number(2.0)]),
            Value::array(vec!["a".into(), "b".into()])
        );
        assert_eq!(call(&s, "replace", &["-".into(), "+".into()]), Value::string("a+b-c"));

        let global = Value::RegExp(Arc::new(RegExpValue::new("-", "g").unwrap()));
        assert_eq!(call(&s, "replace", &[global, "".into()]), Value::string("abc"));
    }

    #[test]
    fn test_array_members() {
        let arr = Value::array(vec![1.into(), 2.into(), Value::Null, 3.into()]);
        assert_eq!(arr.get_member("length"), Value::Number(4.0));
        assert_eq!(arr.get_member("1"), Value::Number(2.0));
        assert_eq!(call(&arr, "join", &["|".into()]), Value::string("1|2||3"));
        assert_eq!(call(&arr, "indexOf", &[3.into()]), Value::Number(3.0));
        assert_eq!(call(&arr, "includes", &[2.into()]), Value::Bool(true));
        assert_eq!(
            call(&arr, "slice", &[Value::Number(1.0), Value::Number(2.0)]),
            Value::array(vec![2.into()])
        );
    }

    #[test]
    fn test_number_methods() {
        let n = Value::Number(3.14159);
        assert_eq!(call(&n, "toFixed", &[Value::Number(2.0)]), Value::string("3.14"));
        assert_eq!(
            call(&Value::Number(255.0), "toString", &[Value::Number(16.0)]),
            Value::string("ff")
        );
        assert_eq!(
            call(&Value::Number(-5.0), "toString", &[Value::Number(2.0)]),
            Value::string("-101")
        );
    }

    #[test]
    fn test_delete_member() {
        let obj = Value::object([("a", Value::Number(1.0))]);
        assert!(obj.delete_member("a"));
        assert_eq!(obj.get_member("a"), Value::Undefined);

        let arr = Value::array(vec![1.into(), 2.into()]);
        assert!(arr.delete_member("0"));
        assert_eq!(arr, Value::array(vec![Value::Undefined, 2.into()]));
        assert!(!arr.delete_member("length"));
    }

    #[test]
    fn test_has_property() {
        let obj = Value::object([("a", Value::Null)]);
        assert_eq!(obj.has_property("a"), Ok(true));
        assert_eq!(obj.has_property("b"), Ok(false));
        let arr = Value::array(vec![1.into()]);
        assert_eq!(arr.has_property("0"), Ok(true));
        assert_eq!(arr.has_property("1"), Ok(false));
        assert!(Value::string("abc").has_property("length").is_err());
    }

    #[test]
    fn test_regexp_members() {
        let re = Value::RegExp(Arc::new(RegExpValue::new(r"(\d+)-(\d+)", "").unwrap()));
        assert_eq!(re.get_member("source"), Value::string(r"(\d+)-(\d+)"));
        assert_eq!(call(&re, "test", &["10-20".into()]), Value::Bool(true));
        assert_eq!(
            call(&re, "exec", &["a 10-20".into()]),
            Value::array(vec!["10-20".into(), "10".into(), "20".into()])
        );
        assert_eq!(call(&re, "exec", &["none".into()]), Value::Null);
    }

    #[test]
    fn test_function_members() {
        let f = Value::function(
            NativeFn::new("F", 2, |_, _| Ok(Value::Undefined)).with_static("X", Value::Number(1.0)),
        );
        assert_eq!(f.get_member("name"), Value::string("F"));
        assert_eq!(f.get_member("length"), Value::Number(2.0));
        assert_eq!(f.get_member("X"), Value::Number(1.0));
    }
}
