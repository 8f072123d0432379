//! # trackexpr
//!
//! A sandboxed expression engine for event-tracking data paths.
//!
//! Tracking rules arrive as configuration: an event name, a method to watch
//! and small expressions such as `$DATA.items[0].id` or
//! `$EVENT.detail.x > 10`. trackexpr parses those expressions into an AST
//! and walks it against a layered, read-only context of host values and a
//! fixed set of safe capabilities (`Math`, `JSON`, `Date`, ...).
//!
//! ## Architecture
//!
//! - **Parser**: source text to [`ast::Node`], with character offsets in errors
//! - **Evaluator**: exhaustive tree walk over [`ast::Node`] via [`Evaluate`]
//! - **Scope / Context**: lexical binding chain over the default capabilities
//!   plus caller bindings
//! - **Engine**: one fresh parser and root scope per call, with a
//!   fall-back-to-source helper
//! - **Tracker**: the `$APP`/`$EVENT`/`$DATA`/... namespaces and rule
//!   collection
//!
//! Unresolved names never fail an evaluation: they evaluate to `undefined`
//! and are reported to a [`Diagnostics`] sink.
//!
//! ```
//! use trackexpr::{run_in_context, Context, Value};
//!
//! let ctx = Context::new().with_external([(
//!     "X",
//!     Value::object([("index", Value::Number(0.0))]),
//! )]);
//! assert_eq!(run_in_context("X.index || 1", &ctx).unwrap(), Value::Number(1.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod context;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod eval;
pub mod parser;
pub mod sandbox;
pub mod scope;
pub mod tracker;
pub mod value;

// Re-export main types
pub use ast::Node;
pub use context::{Context, DepthGuard, EvalContext, DEFAULT_MAX_DEPTH};
pub use diagnostics::{
    CollectingDiagnostics, Diagnostics, ResolutionMiss, SilentDiagnostics, TracingDiagnostics,
};
pub use engine::{run_in_context, Engine, EngineConfig};
pub use error::{Error, EvalError, ParseError, Result};
pub use eval::{eval_node, Evaluate};
pub use parser::{parse, Parser, ParserOptions};
pub use scope::{Binding, Scope, ScopeKind, THIS_BINDING};
pub use tracker::{safe_get, CollectedEvent, HostSnapshot, MethodRule, Tracker};
pub use value::{ArrayRef, NativeFn, ObjectRef, RegExpValue, Value};

/// trackexpr version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
