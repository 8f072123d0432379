//! Expression evaluation

pub mod array;
pub mod binary;
pub mod call;
pub mod conditional;
pub mod identifier;
pub mod literal;
pub mod logical;
pub mod member;
pub mod program;
pub mod unary;

use crate::ast::Node;
use crate::{Context, EvalContext, EvalError, Scope, Value};

/// Trait for evaluating AST nodes to values.
///
/// This is the core abstraction for the tree-walking interpreter. Every
/// node payload implements it; [`Node`] dispatches to them.
pub trait Evaluate {
    /// Evaluate this AST node against `scope`.
    fn eval(&self, scope: &Scope<'_>, ctx: &EvalContext) -> Result<Value, EvalError>;
}

// ═══════════════════════════════════════════════════════════════════════
// Main Expression Dispatcher
// ═══════════════════════════════════════════════════════════════════════

impl Evaluate for Node {
    fn eval(&self, scope: &Scope<'_>, ctx: &EvalContext) -> Result<Value, EvalError> {
        let _guard = ctx.enter()?;

        match self {
            Node::Literal(lit) => lit.eval(scope, ctx),
            Node::Identifier(id) => id.eval(scope, ctx),
            Node::This => Ok(scope.this_value()),
            Node::Member(member) => member.eval(scope, ctx),
            Node::Call(call) => call.eval(scope, ctx),
            Node::Unary(unary) => unary.eval(scope, ctx),
            Node::Binary(binary) => binary.eval(scope, ctx),
            Node::Logical(logical) => logical.eval(scope, ctx),
            Node::Conditional(cond) => cond.eval(scope, ctx),
            Node::Array(array) => array.eval(scope, ctx),
            Node::Program(program) => program.eval(scope, ctx),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Convenience Functions
// ═══════════════════════════════════════════════════════════════════════

/// Evaluate `node` in a fresh root scope built from `context`.
pub fn eval_node(node: &Node, context: &Context, ctx: &EvalContext) -> Result<Value, EvalError> {
    let scope = Scope::root(context);
    node.eval(&scope, ctx)
}
