//! Short-circuit evaluation for `&&` and `||`
//!
//! The result is the operand that decided the outcome, not a boolean.

use crate::ast::{LogicalExpr, LogicalOperator};
use crate::{EvalContext, EvalError, Scope, Value};

use super::Evaluate;

impl Evaluate for LogicalExpr {
    fn eval(&self, scope: &Scope<'_>, ctx: &EvalContext) -> Result<Value, EvalError> {
        let left = self.left.eval(scope, ctx)?;
        let decided = match self.operator {
            LogicalOperator::And => !left.is_truthy(),
            LogicalOperator::Or => left.is_truthy(),
        };
        if decided {
            Ok(left)
        } else {
            self.right.eval(scope, ctx)
        }
    }
}
