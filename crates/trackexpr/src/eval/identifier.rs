//! Identifier resolution
//!
//! A name that is bound nowhere in the scope chain is a soft failure: the
//! miss goes to the diagnostics sink and the expression continues with
//! `undefined`.

use crate::ast::Identifier;
use crate::{EvalContext, EvalError, Scope, Value};

use super::Evaluate;

/// The one name that always means `undefined`, whatever the bindings say.
const UNDEFINED_NAME: &str = "undefined";

impl Evaluate for Identifier {
    fn eval(&self, scope: &Scope<'_>, ctx: &EvalContext) -> Result<Value, EvalError> {
        if self.name == UNDEFINED_NAME {
            return Ok(Value::Undefined);
        }
        match scope.get(&self.name) {
            Some(value) => Ok(value.clone()),
            None => {
                ctx.report_miss(&self.name, self.offset);
                Ok(Value::Undefined)
            }
        }
    }
}
