//! Unary operation evaluation

use crate::ast::{Node, UnaryExpr, UnaryOperator};
use crate::{EvalContext, EvalError, Scope, Value};

use super::member::property_key;
use super::Evaluate;

impl Evaluate for UnaryExpr {
    fn eval(&self, scope: &Scope<'_>, ctx: &EvalContext) -> Result<Value, EvalError> {
        match self.operator {
            UnaryOperator::Typeof => eval_typeof(&self.argument, scope, ctx),
            UnaryOperator::Delete => eval_delete(&self.argument, scope, ctx),
            op => {
                let operand = self.argument.eval(scope, ctx)?;
                Ok(apply_unary(op, &operand))
            }
        }
    }
}

/// Apply an operator that only needs its operand's value.
pub fn apply_unary(op: UnaryOperator, operand: &Value) -> Value {
    match op {
        UnaryOperator::Minus => Value::Number(-operand.to_number()),
        UnaryOperator::Plus => Value::Number(operand.to_number()),
        UnaryOperator::Not => Value::Bool(!operand.is_truthy()),
        UnaryOperator::BitNot => Value::Number(f64::from(!operand.to_int32())),
        UnaryOperator::Void => Value::Undefined,
        UnaryOperator::Typeof => Value::string(operand.type_of()),
        UnaryOperator::Delete => Value::Bool(true),
    }
}

/// `typeof x` on an unbound name is `"undefined"` and is not reported as
/// a miss.
fn eval_typeof(argument: &Node, scope: &Scope<'_>, ctx: &EvalContext) -> Result<Value, EvalError> {
    if let Node::Identifier(id) = argument {
        if !scope.contains(&id.name) {
            return Ok(Value::string("undefined"));
        }
    }
    let operand = argument.eval(scope, ctx)?;
    Ok(Value::string(operand.type_of()))
}

/// `delete obj.key` removes the member; `delete name` removes `name` from
/// the current `this` object. Anything else is evaluated and discarded.
fn eval_delete(argument: &Node, scope: &Scope<'_>, ctx: &EvalContext) -> Result<Value, EvalError> {
    match argument {
        Node::Member(member) => {
            let object = member.object.eval(scope, ctx)?;
            if object.is_nullish() {
                return Err(EvalError::type_error(format!(
                    "Cannot convert {} to object",
                    object.to_js_string()
                )));
            }
            let key = property_key(&member.property, scope, ctx)?;
            Ok(Value::Bool(object.delete_member(&key)))
        }
        Node::Identifier(id) => match scope.this_value() {
            Value::Object(fields) => {
                fields.remove(&id.name);
                Ok(Value::Bool(true))
            }
            _ => Ok(Value::Bool(false)),
        },
        other => {
            other.eval(scope, ctx)?;
            Ok(Value::Bool(true))
        }
    }
}
