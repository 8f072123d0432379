//! Evaluation inputs: caller bindings and per-call settings

use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::EvalError;
use crate::sandbox;
use crate::value::Value;

/// Default ceiling for parser and evaluator nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

// ═══════════════════════════════════════════════════════════════════════
// Context
// ═══════════════════════════════════════════════════════════════════════

/// The bindings an expression can see.
///
/// A context starts from the default capability set (`Math`, `JSON`,
/// `Date`, ...) and layers caller values on top; later entries win on
/// name collisions.
///
/// # Example
///
/// ```
/// use trackexpr::{Context, Value};
///
/// let ctx = Context::new().with_external([("flag", Value::Bool(true))]);
/// assert!(ctx.contains("Math"));
/// assert_eq!(ctx.get("flag"), Some(&Value::Bool(true)));
/// ```
#[derive(Debug, Clone)]
pub struct Context {
    bindings: IndexMap<String, Value>,
    this: Option<Value>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// A context holding only the default capability set.
    pub fn new() -> Self {
        Self {
            bindings: sandbox::defaults().clone(),
            this: None,
        }
    }

    /// A context with no bindings at all, not even the defaults.
    pub fn empty() -> Self {
        Self {
            bindings: IndexMap::new(),
            this: None,
        }
    }

    /// Overlay caller bindings (builder pattern).
    pub fn with_external<K, I>(mut self, external: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        self.add_context(external);
        self
    }

    /// Bind the receiver seen by `this` (builder pattern).
    pub fn with_this(mut self, this: Value) -> Self {
        self.this = Some(this);
        self
    }

    /// Build a context from a JSON object: the defaults overlaid by each
    /// top-level field. Non-object JSON contributes nothing.
    pub fn from_json(json: &serde_json::Value) -> Self {
        let mut ctx = Self::new();
        if let serde_json::Value::Object(fields) = json {
            ctx.add_context(fields.iter().map(|(k, v)| (k.clone(), Value::from_json(v))));
        }
        ctx
    }

    /// Overlay further bindings; later entries replace earlier ones.
    pub fn add_context<K, I>(&mut self, entries: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        for (name, value) in entries {
            self.bindings.insert(name.into(), value);
        }
    }

    /// Bind a single name.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Set or clear the receiver.
    pub fn set_this(&mut self, this: Option<Value>) {
        self.this = this;
    }

    /// The receiver, if one was bound.
    pub fn this(&self) -> Option<&Value> {
        self.this.as_ref()
    }

    /// Look up a binding.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Whether `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.bindings.iter()
    }

    /// Bound names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Evaluation Settings
// ═══════════════════════════════════════════════════════════════════════

/// Configuration and state for one evaluation.
///
/// This is passed through all evaluation calls and carries the nesting
/// ceiling plus the sink for unresolved identifiers. The depth counter
/// makes it single-use per call; it is not shared between threads.
pub struct EvalContext {
    /// Maximum nesting depth before evaluation is aborted
    pub max_depth: usize,

    depth: Cell<usize>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl Default for EvalContext {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            depth: Cell::new(0),
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }
}

impl fmt::Debug for EvalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalContext")
            .field("max_depth", &self.max_depth)
            .field("depth", &self.depth.get())
            .finish_non_exhaustive()
    }
}

impl EvalContext {
    /// Create a context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with a custom depth limit.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Default::default()
        }
    }

    /// Route resolution misses to `diagnostics` (builder pattern).
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Report an unresolved identifier.
    pub fn report_miss(&self, name: &str, offset: usize) {
        self.diagnostics.report(name, offset);
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Enter one level of nesting. The returned guard leaves it on drop.
    pub fn enter(&self) -> Result<DepthGuard<'_>, EvalError> {
        let depth = self.depth.get() + 1;
        if depth > self.max_depth {
            return Err(EvalError::DepthExceeded {
                depth,
                max: self.max_depth,
            });
        }
        self.depth.set(depth);
        Ok(DepthGuard { ctx: self })
    }
}

/// RAII guard that restores the depth counter when dropped.
pub struct DepthGuard<'a> {
    ctx: &'a EvalContext,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.ctx.depth.set(self.ctx.depth.get().saturating_sub(1));
    }
}
