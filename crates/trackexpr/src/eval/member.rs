//! Member access evaluation

use crate::ast::{MemberExpr, MemberProperty};
use crate::{EvalContext, EvalError, Scope, Value};

use super::Evaluate;

impl Evaluate for MemberExpr {
    fn eval(&self, scope: &Scope<'_>, ctx: &EvalContext) -> Result<Value, EvalError> {
        let object = self.object.eval(scope, ctx)?;
        // Reading through null or undefined yields undefined
        if object.is_nullish() {
            return Ok(Value::Undefined);
        }
        let key = property_key(&self.property, scope, ctx)?;
        Ok(object.get_member(&key))
    }
}

/// The key named by a member property: the literal name, or the computed
/// expression converted to a property key.
pub fn property_key(
    property: &MemberProperty,
    scope: &Scope<'_>,
    ctx: &EvalContext,
) -> Result<String, EvalError> {
    match property {
        MemberProperty::Named(name) => Ok(name.clone()),
        MemberProperty::Computed(expr) => Ok(expr.eval(scope, ctx)?.to_property_key()),
    }
}
