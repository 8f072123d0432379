//! Binary operation evaluation
//!
//! Both operands are always evaluated, left first. Short-circuit operators
//! live in [`logical`](super::logical).

use std::cmp::Ordering;

use crate::ast::{BinaryExpr, BinaryOperator};
use crate::{EvalContext, EvalError, Scope, Value};

use super::Evaluate;

impl Evaluate for BinaryExpr {
    fn eval(&self, scope: &Scope<'_>, ctx: &EvalContext) -> Result<Value, EvalError> {
        let left = self.left.eval(scope, ctx)?;
        let right = self.right.eval(scope, ctx)?;
        apply_binary(self.operator, &left, &right)
    }
}

/// Apply `op` to two evaluated operands.
pub fn apply_binary(op: BinaryOperator, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let value = match op {
        // Equality
        BinaryOperator::Eq => Value::Bool(left.loose_equals(right)),
        BinaryOperator::NotEq => Value::Bool(!left.loose_equals(right)),
        BinaryOperator::StrictEq => Value::Bool(left.strict_equals(right)),
        BinaryOperator::StrictNotEq => Value::Bool(!left.strict_equals(right)),

        // Relational
        BinaryOperator::Lt => compare(left, right, Ordering::is_lt),
        BinaryOperator::Gt => compare(left, right, Ordering::is_gt),
        BinaryOperator::LtEq => compare(left, right, Ordering::is_le),
        BinaryOperator::GtEq => compare(left, right, Ordering::is_ge),
        BinaryOperator::In => return eval_in(left, right),
        BinaryOperator::Instanceof => return eval_instanceof(left, right),

        // Arithmetic
        BinaryOperator::Add => eval_add(left, right),
        BinaryOperator::Sub => Value::Number(left.to_number() - right.to_number()),
        BinaryOperator::Mul => Value::Number(left.to_number() * right.to_number()),
        BinaryOperator::Div => Value::Number(left.to_number() / right.to_number()),
        BinaryOperator::Rem => Value::Number(left.to_number() % right.to_number()),

        // Bitwise
        BinaryOperator::BitAnd => int32(left.to_int32() & right.to_int32()),
        BinaryOperator::BitOr => int32(left.to_int32() | right.to_int32()),
        BinaryOperator::BitXor => int32(left.to_int32() ^ right.to_int32()),
        BinaryOperator::Shl => int32(left.to_int32().wrapping_shl(shift_count(right))),
        BinaryOperator::Shr => int32(left.to_int32().wrapping_shr(shift_count(right))),
        BinaryOperator::UShr => {
            Value::Number(f64::from(left.to_uint32().wrapping_shr(shift_count(right))))
        }
    };
    Ok(value)
}

fn int32(n: i32) -> Value {
    Value::Number(f64::from(n))
}

fn shift_count(value: &Value) -> u32 {
    value.to_uint32() & 0x1f
}

/// `+` concatenates when either primitive operand is a string.
fn eval_add(left: &Value, right: &Value) -> Value {
    let left = left.to_primitive();
    let right = right.to_primitive();
    if left.is_string() || right.is_string() {
        let mut text = left.to_js_string();
        text.push_str(&right.to_js_string());
        Value::string(text)
    } else {
        Value::Number(left.to_number() + right.to_number())
    }
}

/// Two strings compare lexically; anything else numerically. Comparisons
/// involving `NaN` are false.
fn compare(left: &Value, right: &Value, accept: fn(Ordering) -> bool) -> Value {
    let left = left.to_primitive();
    let right = right.to_primitive();
    let ordering = match (&left, &right) {
        (Value::String(a), Value::String(b)) => Some(a.as_str().cmp(b.as_str())),
        _ => left.to_number().partial_cmp(&right.to_number()),
    };
    Value::Bool(ordering.is_some_and(accept))
}

fn eval_in(key: &Value, target: &Value) -> Result<Value, EvalError> {
    target
        .has_property(&key.to_property_key())
        .map(Value::Bool)
        .map_err(EvalError::type_error)
}

fn eval_instanceof(value: &Value, constructor: &Value) -> Result<Value, EvalError> {
    match constructor {
        Value::Function(func) => Ok(Value::Bool(func.is_instance(value))),
        other => Err(EvalError::type_error(format!(
            "Right-hand side of 'instanceof' is not callable ({})",
            other.type_of()
        ))),
    }
}
