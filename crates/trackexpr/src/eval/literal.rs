//! Literal evaluation

use crate::ast::{Literal, LiteralValue};
use crate::{EvalContext, EvalError, Scope, Value};

use super::Evaluate;

impl Evaluate for Literal {
    fn eval(&self, _scope: &Scope<'_>, _ctx: &EvalContext) -> Result<Value, EvalError> {
        Ok(eval_lit(&self.value))
    }
}

/// Convert a literal payload to a runtime value.
pub fn eval_lit(lit: &LiteralValue) -> Value {
    match lit {
        LiteralValue::Null => Value::Null,
        LiteralValue::Bool(b) => Value::Bool(*b),
        LiteralValue::Number(n) => Value::Number(*n),
        LiteralValue::String(s) => Value::string(s.as_str()),
    }
}
