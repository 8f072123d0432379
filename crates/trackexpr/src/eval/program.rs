//! Program evaluation

use crate::ast::Program;
use crate::{EvalContext, EvalError, Scope, Value};

use super::Evaluate;

impl Evaluate for Program {
    /// Every expression runs for its effects; the program itself has no
    /// value.
    fn eval(&self, scope: &Scope<'_>, ctx: &EvalContext) -> Result<Value, EvalError> {
        for node in &self.body {
            node.eval(scope, ctx)?;
        }
        Ok(Value::Undefined)
    }
}
