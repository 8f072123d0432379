//! Tracking payload resolution
//!
//! A host platform hands over a [`HostSnapshot`] each time a tracked method
//! runs. The [`Tracker`] turns it into the conventional tracking context
//! and resolves the data paths of a [`MethodRule`] against it:
//!
//! | Name | Bound to |
//! |------|----------|
//! | `$APP` | the application instance |
//! | `$DATASET` | `event.currentTarget.dataset` |
//! | `$EVENT` | the event (first method argument) |
//! | `$OPTIONS` | page launch options |
//! | `$APPOPTIONS` | application launch options |
//! | `$DATA` | the instance's `data` |
//! | `$ARGS` | all method arguments |
//! | `$THIS` | the page or component instance (also bound as `this`) |
//!
//! Global context providers registered with
//! [`Tracker::add_global_context`] are merged underneath these names.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::engine::Engine;
use crate::value::Value;

/// Produces extra bindings for every tracking context.
pub type GlobalContextFn = Arc<dyn Fn() -> IndexMap<String, Value> + Send + Sync>;

// ═══════════════════════════════════════════════════════════════════════
// Host Snapshot
// ═══════════════════════════════════════════════════════════════════════

/// The values a host supplies for one tracked invocation.
#[derive(Debug, Clone, Default)]
pub struct HostSnapshot {
    /// Application instance
    pub app: Value,
    /// Explicit event; defaults to the first argument
    pub event: Option<Value>,
    /// Page launch options
    pub options: Value,
    /// Application launch options
    pub app_options: Value,
    /// Explicit instance data; defaults to `instance.data`
    pub data: Option<Value>,
    /// Arguments of the tracked method
    pub args: Vec<Value>,
    /// Page or component instance
    pub instance: Value,
}

impl HostSnapshot {
    /// An empty snapshot: every namespace resolves to `undefined`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application instance.
    pub fn with_app(mut self, app: Value) -> Self {
        self.app = app;
        self
    }

    /// Set the event explicitly.
    pub fn with_event(mut self, event: Value) -> Self {
        self.event = Some(event);
        self
    }

    /// Set the page launch options.
    pub fn with_options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }

    /// Set the application launch options.
    pub fn with_app_options(mut self, app_options: Value) -> Self {
        self.app_options = app_options;
        self
    }

    /// Set the instance data explicitly.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Set the method arguments.
    pub fn with_args(mut self, args: impl IntoIterator<Item = Value>) -> Self {
        self.args = args.into_iter().collect();
        self
    }

    /// Set the page or component instance.
    pub fn with_instance(mut self, instance: Value) -> Self {
        self.instance = instance;
        self
    }

    /// The event: explicit, else the first argument.
    pub fn event(&self) -> Value {
        self.event
            .clone()
            .or_else(|| self.args.first().cloned())
            .unwrap_or(Value::Undefined)
    }

    /// The instance data: explicit, else `instance.data`.
    pub fn data(&self) -> Value {
        self.data
            .clone()
            .unwrap_or_else(|| self.instance.get_member("data"))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Rules and Results
// ═══════════════════════════════════════════════════════════════════════

/// A remotely configured rule: report `event_name` whenever `method` runs
/// and `condition` (if any) holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodRule {
    /// Name of the reported event
    pub event_name: String,
    /// Name of the tracked method
    pub method: String,
    /// Expression gating the report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// Report field name to data path
    #[serde(default)]
    pub data: IndexMap<String, String>,
}

/// A resolved report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectedEvent {
    /// Name of the reported event
    pub event_name: String,
    /// Name of the tracked method
    pub method: String,
    /// Resolved data fields, in rule order
    pub data: IndexMap<String, Value>,
}

// ═══════════════════════════════════════════════════════════════════════
// Tracker
// ═══════════════════════════════════════════════════════════════════════

/// Resolves tracking rules against host snapshots.
#[derive(Clone, Default)]
pub struct Tracker {
    engine: Engine,
    globals: Vec<GlobalContextFn>,
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("engine", &self.engine)
            .field("globals", &self.globals.len())
            .finish()
    }
}

impl Tracker {
    /// A tracker using a default [`Engine`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracker using `engine`.
    pub fn with_engine(engine: Engine) -> Self {
        Self {
            engine,
            globals: Vec::new(),
        }
    }

    /// Register a provider of extra bindings. Providers run on every
    /// resolution, in registration order; later providers win.
    pub fn add_global_context<F>(&mut self, provider: F)
    where
        F: Fn() -> IndexMap<String, Value> + Send + Sync + 'static,
    {
        self.globals.push(Arc::new(provider));
    }

    /// Build the tracking context for `snapshot`.
    pub fn context_for(&self, snapshot: &HostSnapshot) -> Context {
        let mut context = Context::new();
        for provider in &self.globals {
            context.add_context(provider());
        }

        let event = snapshot.event();
        context.add_context([
            ("$APP", snapshot.app.clone()),
            ("$DATASET", safe_get(&event, "currentTarget.dataset")),
            ("$EVENT", event),
            ("$OPTIONS", snapshot.options.clone()),
            ("$APPOPTIONS", snapshot.app_options.clone()),
            ("$DATA", snapshot.data()),
            ("$ARGS", Value::array(snapshot.args.clone())),
            ("$THIS", snapshot.instance.clone()),
        ]);
        context.set_this(Some(snapshot.instance.clone()));
        context
    }

    /// Resolve one data path; a path that fails to parse or evaluate is
    /// returned as its own text.
    pub fn get_data(&self, path: &str, snapshot: &HostSnapshot) -> Value {
        let context = self.context_for(snapshot);
        self.engine.evaluate_or_source(path, &context)
    }

    /// Resolve `rule` for `snapshot`. `None` when the rule's condition is
    /// falsy.
    pub fn collect(&self, rule: &MethodRule, snapshot: &HostSnapshot) -> Option<CollectedEvent> {
        let context = self.context_for(snapshot);

        if let Some(condition) = &rule.condition {
            if !self.engine.evaluate_or_source(condition, &context).is_truthy() {
                tracing::debug!(event = %rule.event_name, condition = %condition, "condition not met");
                return None;
            }
        }

        let data = rule
            .data
            .iter()
            .map(|(key, path)| (key.clone(), self.engine.evaluate_or_source(path, &context)))
            .collect();

        tracing::debug!(event = %rule.event_name, method = %rule.method, "collected event");
        Some(CollectedEvent {
            event_name: rule.event_name.clone(),
            method: rule.method.clone(),
            data,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Path Lookup
// ═══════════════════════════════════════════════════════════════════════

/// Read a nested value by path (`a.b`, `a[0].b`, `a["b"]`). Any missing
/// step yields `undefined`.
pub fn safe_get(value: &Value, path: &str) -> Value {
    split_path(path)
        .iter()
        .fold(value.clone(), |current, key| current.get_member(key))
}

fn split_path(path: &str) -> Vec<String> {
    let mut keys = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if !current.is_empty() {
                    keys.push(std::mem::take(&mut current));
                }
            }
            '[' => {
                if !current.is_empty() {
                    keys.push(std::mem::take(&mut current));
                }
                let quote = chars.next_if(|&q| q == '"' || q == '\'');
                let mut key = String::new();
                for k in chars.by_ref() {
                    if Some(k) == quote {
                        continue;
                    }
                    if k == ']' {
                        break;
                    }
                    key.push(k);
                }
                keys.push(key);
            }
            other => current.push(other),
        }
    }
    if !current.is_empty() {
        keys.push(current);
    }
    keys
}
