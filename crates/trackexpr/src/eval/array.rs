//! Array literal evaluation

use crate::ast::ArrayExpr;
use crate::{EvalContext, EvalError, Scope, Value};

use super::Evaluate;

impl Evaluate for ArrayExpr {
    fn eval(&self, scope: &Scope<'_>, ctx: &EvalContext) -> Result<Value, EvalError> {
        let items = self
            .elements
            .iter()
            .map(|element| match element {
                Some(node) => node.eval(scope, ctx),
                None => Ok(Value::Undefined),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::array(items))
    }
}
