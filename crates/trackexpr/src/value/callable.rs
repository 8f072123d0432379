//! Callable value types: native capabilities

use std::sync::Arc;

use indexmap::IndexMap;

use super::Value;

/// Type alias for native function pointers.
///
/// The first argument is the receiver (`this`), the second the call
/// arguments. Failures are plain messages; the evaluator attaches the
/// function name.
pub type NativeFnPtr = Arc<dyn Fn(&Value, &[Value]) -> Result<Value, String> + Send + Sync>;

/// Predicate backing `value instanceof F`.
pub type InstanceCheck = fn(&Value) -> bool;

/// A native function exposed to expressions.
///
/// Besides being callable, a function can carry static members
/// (`Math`-style namespaces are plain objects, but constructors such as
/// `Number` or `Array` expose helpers like `Number.isInteger`).
#[derive(Clone)]
pub struct NativeFn {
    /// Function name (for display/debugging)
    pub name: String,

    /// Declared parameter count, reported as `length`
    pub arity: usize,

    /// The actual function pointer
    pub func: NativeFnPtr,

    /// Members reachable as `F.member`
    pub statics: IndexMap<String, Value>,

    /// Backs `instanceof` when this function acts as a constructor
    pub instance_check: Option<InstanceCheck>,
}

impl NativeFn {
    /// Create a function without statics.
    pub fn new<F>(name: impl Into<String>, arity: usize, func: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            func: Arc::new(func),
            statics: IndexMap::new(),
            instance_check: None,
        }
    }

    /// Add a static member (builder pattern).
    pub fn with_static(mut self, name: impl Into<String>, value: Value) -> Self {
        self.statics.insert(name.into(), value);
        self
    }

    /// Make `instanceof` consult `check` (builder pattern).
    pub fn with_instance_check(mut self, check: InstanceCheck) -> Self {
        self.instance_check = Some(check);
        self
    }

    /// Invoke with an explicit receiver.
    pub fn call(&self, this: &Value, args: &[Value]) -> Result<Value, String> {
        (self.func)(this, args)
    }

    /// Whether `value` counts as an instance of this function.
    pub fn is_instance(&self, value: &Value) -> bool {
        self.instance_check.map(|check| check(value)).unwrap_or(false)
    }
}

impl std::fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NativeFn({})", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_call_receives_this() {
        let f = NativeFn::new("id", 0, |this, _args| Ok(this.clone()));
        let result = f.call(&Value::Number(3.0), &[]).unwrap();
        assert_eq!(result, Value::Number(3.0));
    }

    #[test]
    fn test_statics_builder() {
        let f = NativeFn::new("F", 1, |_, _| Ok(Value::Undefined))
            .with_static("ANSWER", Value::Number(42.0));
        assert_eq!(f.statics.get("ANSWER"), Some(&Value::Number(42.0)));
    }

    #[test]
    fn test_instance_check_defaults_to_false() {
        let f = NativeFn::new("F", 0, |_, _| Ok(Value::Undefined));
        assert!(!f.is_instance(&Value::Null));

        let g = f.with_instance_check(|v| v.is_null());
        assert!(g.is_instance(&Value::Null));
    }

    #[test]
    fn test_debug_shows_name() {
        let f = NativeFn::new("parseInt", 2, |_, _| Ok(Value::Undefined));
        assert_eq!(format!("{:?}", f), "NativeFn(parseInt)");
    }
}
