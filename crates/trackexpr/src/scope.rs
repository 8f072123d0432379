//! Lexical binding chain used during evaluation

use indexmap::IndexMap;

use crate::context::Context;
use crate::value::Value;

/// Reserved binding name for the receiver of `this` expressions.
pub const THIS_BINDING: &str = "this";

/// A single name binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// The binding's name
    pub name: String,

    /// The bound value
    pub value: Value,
}

/// What introduced a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// The per-call root holding the context bindings
    Root,

    /// A nested scope layered over a parent
    Block,
}

/// One link of the scope chain.
///
/// Lookups check the local bindings first, then walk the parent chain.
/// The root is built fresh for every evaluation and owns its bindings;
/// children only borrow their parent, so a chain can never outlive the
/// call that built it.
///
/// # Example
///
/// ```
/// use trackexpr::{Scope, ScopeKind, Value};
///
/// let mut root = Scope::new();
/// root.define("x", Value::Number(1.0));
///
/// let mut inner = Scope::child(&root, ScopeKind::Block);
/// inner.define("x", Value::Number(10.0)); // shadows outer x
/// inner.define("y", Value::Number(2.0));
///
/// assert_eq!(inner.get("x"), Some(&Value::Number(10.0)));
/// assert_eq!(root.get("x"), Some(&Value::Number(1.0)));
/// assert!(root.get("y").is_none());
/// ```
#[derive(Debug)]
pub struct Scope<'p> {
    bindings: IndexMap<String, Binding>,
    parent: Option<&'p Scope<'p>>,
    kind: ScopeKind,
    level: usize,
}

impl Default for Scope<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope<'static> {
    /// Create an empty root scope.
    pub fn new() -> Self {
        Self {
            bindings: IndexMap::new(),
            parent: None,
            kind: ScopeKind::Root,
            level: 0,
        }
    }

    /// Create the root scope for one evaluation.
    ///
    /// Every context entry becomes a binding; the context's receiver, if
    /// any, is bound under [`THIS_BINDING`].
    pub fn root(context: &Context) -> Self {
        let mut scope = Self::new();
        for (name, value) in context.iter() {
            scope.define(name.clone(), value.clone());
        }
        if let Some(this) = context.this() {
            scope.define(THIS_BINDING, this.clone());
        }
        scope
    }
}

impl<'p> Scope<'p> {
    /// Create a scope nested in `parent`.
    pub fn child(parent: &'p Scope<'p>, kind: ScopeKind) -> Self {
        Self {
            bindings: IndexMap::new(),
            parent: Some(parent),
            kind,
            level: parent.level + 1,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding Definition
    // ═══════════════════════════════════════════════════════════════════

    /// Bind `name` in this scope, replacing any local binding of that name.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        self.bindings.insert(name.clone(), Binding { name, value });
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding Lookup
    // ═══════════════════════════════════════════════════════════════════

    /// Find the nearest binding for `name`, searching outward.
    pub fn has_binding(&self, name: &str) -> Option<&Binding> {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some(binding) = current.bindings.get(name) {
                return Some(binding);
            }
            scope = current.parent;
        }
        None
    }

    /// Value of the nearest binding for `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.has_binding(name).map(|b| &b.value)
    }

    /// Whether `name` is bound anywhere in the chain.
    pub fn contains(&self, name: &str) -> bool {
        self.has_binding(name).is_some()
    }

    /// Whether `name` is bound in this scope itself.
    pub fn contains_local(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// The current receiver, `null` when nothing is bound.
    pub fn this_value(&self) -> Value {
        self.get(THIS_BINDING).cloned().unwrap_or(Value::Null)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Inspection
    // ═══════════════════════════════════════════════════════════════════

    /// What introduced this scope.
    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    /// Distance from the root (the root is level 0).
    pub fn level(&self) -> usize {
        self.level
    }

    /// The enclosing scope.
    pub fn parent(&self) -> Option<&Scope<'p>> {
        self.parent
    }

    /// Local bindings in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.values()
    }

    /// Every name visible from this scope, innermost first, without
    /// duplicates.
    pub fn visible_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        let mut scope = Some(self);
        while let Some(current) = scope {
            for name in current.bindings.keys() {
                if !names.contains(&name.as_str()) {
                    names.push(name.as_str());
                }
            }
            scope = current.parent;
        }
        names
    }

    /// Number of local bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether this scope has no local bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
