//! Value representation for runtime values

mod callable;
mod coerce;
mod compound;
mod display;
mod impls;
mod json;
mod members;
mod regexp;

pub use callable::{InstanceCheck, NativeFn, NativeFnPtr};
pub use coerce::{number_to_string, string_to_number};
pub use compound::{ArrayRef, ObjectRef};
pub use members::array_index;
pub use regexp::RegExpValue;

use std::sync::Arc;

/// Runtime value representation for the expression evaluator.
///
/// Values mirror the dynamic values a tracking host hands over:
/// - Tier 1: Inline primitives (no allocation)
/// - Tier 2: Shared compound types (`Arc`-wrapped, interior mutability so
///   `delete` is visible through every handle)
/// - Tier 3: Callable capabilities
#[derive(Clone, Default)]
pub enum Value {
    // ═══════════════════════════════════════════════════════════════════
    // Tier 1: Inline Primitives
    // ═══════════════════════════════════════════════════════════════════
    /// The absent value
    #[default]
    Undefined,

    /// The explicit empty value
    Null,

    /// Boolean: `true` or `false`
    Bool(bool),

    /// Double-precision number (the only numeric type)
    Number(f64),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 2: Shared Compound Types
    // ═══════════════════════════════════════════════════════════════════
    /// Immutable string
    String(Arc<String>),

    /// Ordered sequence
    Array(ArrayRef),

    /// Ordered string-keyed record
    Object(ObjectRef),

    /// Compiled regular expression
    RegExp(Arc<RegExpValue>),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 3: Callable Types
    // ═══════════════════════════════════════════════════════════════════
    /// Native function exposed to expressions
    Function(Arc<NativeFn>),
}

/// Shared `undefined`, handed out for missing arguments.
pub(crate) static UNDEFINED: Value = Value::Undefined;

/// Fetch argument `index`, or `undefined` when the caller passed fewer.
pub fn arg(args: &[Value], index: usize) -> &Value {
    args.get(index).unwrap_or(&UNDEFINED)
}
