//! Reporting channel for unresolved identifiers
//!
//! An identifier that is not bound anywhere in the scope chain is not an
//! error: evaluation continues with `undefined` and the miss is handed to
//! a [`Diagnostics`] sink. The engine never decides how misses surface.

use parking_lot::Mutex;

/// Receives resolution misses during evaluation.
pub trait Diagnostics: Send + Sync {
    /// An identifier `name` at character `offset` resolved to nothing.
    fn report(&self, name: &str, offset: usize);
}

/// Emits each miss as a `tracing` warning. This is the default sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, name: &str, offset: usize) {
        tracing::warn!(name, offset, "identifier '{}' is not defined", name);
    }
}

/// Discards every miss.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentDiagnostics;

impl Diagnostics for SilentDiagnostics {
    fn report(&self, _name: &str, _offset: usize) {}
}

/// A single unresolved identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionMiss {
    /// The identifier text
    pub name: String,

    /// Character offset of the identifier in the source
    pub offset: usize,
}

/// Records misses so callers can inspect them afterwards.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use trackexpr::{CollectingDiagnostics, Context, Engine};
///
/// let sink = Arc::new(CollectingDiagnostics::new());
/// let engine = Engine::new().with_diagnostics(sink.clone());
///
/// engine.evaluate("missing", &Context::new()).unwrap();
/// assert_eq!(sink.misses()[0].name, "missing");
/// ```
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    misses: Mutex<Vec<ResolutionMiss>>,
}

impl CollectingDiagnostics {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn misses(&self) -> Vec<ResolutionMiss> {
        self.misses.lock().clone()
    }

    /// Drain the recorded misses.
    pub fn take(&self) -> Vec<ResolutionMiss> {
        std::mem::take(&mut *self.misses.lock())
    }

    /// Number of recorded misses.
    pub fn len(&self) -> usize {
        self.misses.lock().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.misses.lock().is_empty()
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn report(&self, name: &str, offset: usize) {
        self.misses.lock().push(ResolutionMiss {
            name: name.to_string(),
            offset,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_records_in_order() {
        let sink = CollectingDiagnostics::new();
        sink.report("a", 0);
        sink.report("b", 4);
        assert_eq!(sink.len(), 2);
        assert_eq!(
            sink.misses(),
            vec![
                ResolutionMiss {
                    name: "a".to_string(),
                    offset: 0
                },
                ResolutionMiss {
                    name: "b".to_string(),
                    offset: 4
                },
            ]
        );
    }

    #[test]
    fn test_take_drains() {
        let sink = CollectingDiagnostics::new();
        sink.report("x", 1);
        assert_eq!(sink.take().len(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_trait_objects() {
        let sinks: Vec<Box<dyn Diagnostics>> =
            vec![Box::new(TracingDiagnostics), Box::new(SilentDiagnostics)];
        for sink in &sinks {
            sink.report("y", 2);
        }
    }
}
