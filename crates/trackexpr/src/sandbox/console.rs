//! `console.*`, routed into `tracing` under the `trackexpr::console` target

use indexmap::IndexMap;

use super::namespace;
use crate::value::Value;

pub(super) fn install(globals: &mut IndexMap<String, Value>) {
    let console = namespace(
        &[
            ("log", 0, |_, a| {
                tracing::info!(target: "trackexpr::console", "{}", format_args(a));
                Ok(Value::Undefined)
            }),
            ("info", 0, |_, a| {
                tracing::info!(target: "trackexpr::console", "{}", format_args(a));
                Ok(Value::Undefined)
            }),
            ("debug", 0, |_, a| {
                tracing::debug!(target: "trackexpr::console", "{}", format_args(a));
                Ok(Value::Undefined)
            }),
            ("warn", 0, |_, a| {
                tracing::warn!(target: "trackexpr::console", "{}", format_args(a));
                Ok(Value::Undefined)
            }),
            ("error", 0, |_, a| {
                tracing::error!(target: "trackexpr::console", "{}", format_args(a));
                Ok(Value::Undefined)
            }),
        ],
        &[],
    );
    globals.insert("console".to_string(), console);
}

/// Join arguments with spaces; strings print bare, everything else in
/// inspect form.
fn format_args(args: &[Value]) -> String {
    args.iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
