//! Ternary evaluation

use crate::ast::ConditionalExpr;
use crate::{EvalContext, EvalError, Scope, Value};

use super::Evaluate;

impl Evaluate for ConditionalExpr {
    fn eval(&self, scope: &Scope<'_>, ctx: &EvalContext) -> Result<Value, EvalError> {
        // Only the taken branch runs
        if self.test.eval(scope, ctx)?.is_truthy() {
            self.consequent.eval(scope, ctx)
        } else {
            self.alternate.eval(scope, ctx)
        }
    }
}
