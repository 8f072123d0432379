//! Error types for parsing and evaluation

use thiserror::Error;

use crate::value::Value;

/// A syntax error in an expression.
///
/// Always carries the character offset where parsing stopped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at character {offset}")]
pub struct ParseError {
    /// Human-readable description
    pub message: String,

    /// Character offset of the failure
    pub offset: usize,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

/// Runtime faults raised while evaluating a parsed expression.
///
/// Unresolved identifiers are not errors; they are reported through
/// [`Diagnostics`](crate::Diagnostics) and evaluate to `undefined`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// An operation was applied to a value of the wrong kind
    #[error("TypeError: {message}")]
    TypeError {
        /// Description of the fault
        message: String,
    },

    /// The callee of a call expression is not a function
    #[error("TypeError: {callee} is not a function")]
    NotCallable {
        /// Source rendering of the callee expression
        callee: String,
    },

    /// A sandboxed capability failed
    #[error("{name}: {message}")]
    BuiltinError {
        /// Name of the capability
        name: String,
        /// Failure reported by the capability
        message: String,
    },

    /// The expression nests deeper than the configured ceiling
    #[error("maximum evaluation depth exceeded ({depth} > {max})")]
    DepthExceeded {
        /// Depth that was reached
        depth: usize,
        /// Configured ceiling
        max: usize,
    },
}

impl EvalError {
    /// Shorthand for [`EvalError::TypeError`].
    pub fn type_error(message: impl Into<String>) -> Self {
        EvalError::TypeError {
            message: message.into(),
        }
    }
}

/// Any failure raised by [`Engine::evaluate`](crate::Engine::evaluate).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The source could not be parsed
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Evaluation raised a runtime fault
    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Get the `typeof` name of a value, for error messages.
pub fn type_name(value: &Value) -> &'static str {
    value.type_of()
}
