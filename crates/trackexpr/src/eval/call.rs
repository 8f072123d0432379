//! Call evaluation
//!
//! The callee is evaluated first, then the arguments left to right. A
//! member callee (`obj.method(...)`) receives its object as `this`; the
//! object expression is evaluated again for that. Any other callee gets the
//! current `this`, or `null`.

use crate::ast::{CallExpr, Node};
use crate::{EvalContext, EvalError, Scope, Value};

use super::Evaluate;

impl Evaluate for CallExpr {
    fn eval(&self, scope: &Scope<'_>, ctx: &EvalContext) -> Result<Value, EvalError> {
        let callee = self.callee.eval(scope, ctx)?;
        let args = self
            .arguments
            .iter()
            .map(|arg| arg.eval(scope, ctx))
            .collect::<Result<Vec<_>, _>>()?;

        let Value::Function(func) = callee else {
            return Err(EvalError::NotCallable {
                callee: self.callee.to_string(),
            });
        };

        let receiver = match self.callee.as_ref() {
            Node::Member(member) => member.object.eval(scope, ctx)?,
            _ => scope.this_value(),
        };

        func.call(&receiver, &args)
            .map_err(|message| EvalError::BuiltinError {
                name: func.name.clone(),
                message,
            })
    }
}
