//! Entry point: parse and evaluate in one call
//!
//! Every call builds a fresh parser and a fresh root scope, so calls share
//! nothing but the read-only default capability set.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::Node;
use crate::context::{Context, EvalContext, DEFAULT_MAX_DEPTH};
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::Result;
use crate::eval::eval_node;
use crate::parser::{Parser, ParserOptions};
use crate::value::Value;

/// Parse `source` and evaluate it against `context` with default settings.
///
/// Unresolved identifiers are logged through `tracing` and evaluate to
/// `undefined`; parse failures and runtime faults are returned.
pub fn run_in_context(source: &str, context: &Context) -> Result<Value> {
    Engine::new().evaluate(source, context)
}

/// Engine settings, deserialisable from remote configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Nesting ceiling for both parsing and evaluation
    pub max_depth: usize,

    /// Enable `typeof`, `void`, `delete`, `in` and `instanceof`
    pub keyword_operators: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            keyword_operators: false,
        }
    }
}

impl EngineConfig {
    /// The parser options this configuration implies.
    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            keyword_operators: self.keyword_operators,
            max_depth: self.max_depth,
        }
    }
}

/// Parses and evaluates expressions.
///
/// # Example
///
/// ```
/// use trackexpr::{Context, Engine, Value};
///
/// let engine = Engine::new();
/// let ctx = Context::new().with_external([("x", Value::Number(2.0))]);
/// assert_eq!(engine.evaluate("x * 3 + 1", &ctx).unwrap(), Value::Number(7.0));
/// ```
#[derive(Clone)]
pub struct Engine {
    config: EngineConfig,
    diagnostics: Arc<dyn Diagnostics>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// An engine with default settings that logs misses through `tracing`.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// An engine with explicit settings.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }

    /// Route resolution misses to `diagnostics` (builder pattern).
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// The active settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse `source` without evaluating it.
    pub fn parse(&self, source: &str) -> Result<Node> {
        let node = Parser::with_options(source, self.config.parser_options()).parse()?;
        tracing::trace!(source, kind = node.kind_name(), "parsed expression");
        Ok(node)
    }

    /// Parse and evaluate `source` against `context`.
    pub fn evaluate(&self, source: &str, context: &Context) -> Result<Value> {
        let node = self.parse(source)?;
        let ctx = EvalContext::with_max_depth(self.config.max_depth)
            .with_diagnostics(self.diagnostics.clone());
        Ok(eval_node(&node, context, &ctx)?)
    }

    /// Like [`evaluate`](Self::evaluate), but any failure yields the source
    /// text itself as a string value.
    pub fn evaluate_or_source(&self, source: &str, context: &Context) -> Value {
        match self.evaluate(source, context) {
            Ok(value) => value,
            Err(error) => {
                tracing::debug!(source, %error, "expression failed, using source text");
                Value::string(source)
            }
        }
    }
}
