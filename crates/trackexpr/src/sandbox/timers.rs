//! `setTimeout`, `setInterval` and their `clear*` counterparts
//!
//! Each timer runs its callback on its own detached thread. Cancellation
//! flags live in a process-wide registry keyed by timer id; clearing a
//! timer flips its flag and the thread exits at its next wake-up.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::Duration;

use dashmap::DashMap;
use indexmap::IndexMap;

use super::define;
use crate::value::{arg, NativeFn, Value};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn registry() -> &'static DashMap<u64, Arc<AtomicBool>> {
    static TIMERS: OnceLock<DashMap<u64, Arc<AtomicBool>>> = OnceLock::new();
    TIMERS.get_or_init(DashMap::new)
}

/// Number of timers that are scheduled and not yet finished or cleared.
pub fn active_timers() -> usize {
    registry().len()
}

pub(super) fn install(globals: &mut IndexMap<String, Value>) {
    define(globals, "setTimeout", 2, |_, a| schedule(a, false));
    define(globals, "setInterval", 2, |_, a| schedule(a, true));
    define(globals, "clearTimeout", 1, |_, a| {
        cancel(arg(a, 0));
        Ok(Value::Undefined)
    });
    define(globals, "clearInterval", 1, |_, a| {
        cancel(arg(a, 0));
        Ok(Value::Undefined)
    });
}

fn schedule(args: &[Value], repeat: bool) -> Result<Value, String> {
    let callback: Arc<NativeFn> = match arg(args, 0) {
        Value::Function(f) => f.clone(),
        other => {
            return Err(format!(
                "The \"callback\" argument must be a function, received {}",
                other.type_of()
            ))
        }
    };
    let delay = arg(args, 1).to_number();
    let delay = if delay.is_finite() && delay > 0.0 { delay as u64 } else { 0 };
    // Repeating with no delay would spin
    let delay = if repeat { delay.max(1) } else { delay };
    let extra: Vec<Value> = args.iter().skip(2).cloned().collect();

    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let cancelled = Arc::new(AtomicBool::new(false));
    registry().insert(id, cancelled.clone());

    let spawned = thread::Builder::new()
        .name(format!("trackexpr-timer-{}", id))
        .spawn(move || {
            loop {
                thread::sleep(Duration::from_millis(delay));
                if cancelled.load(Ordering::Acquire) {
                    break;
                }
                if let Err(message) = callback.call(&Value::Undefined, &extra) {
                    tracing::warn!(timer = id, callback = %callback.name, "timer callback failed: {}", message);
                }
                if !repeat {
                    break;
                }
            }
            registry().remove(&id);
        });

    if let Err(e) = spawned {
        registry().remove(&id);
        return Err(format!("failed to start timer: {}", e));
    }
    Ok(Value::Number(id as f64))
}

fn cancel(handle: &Value) {
    let id = handle.to_number();
    if !id.is_finite() || id < 1.0 {
        return;
    }
    if let Some((_, flag)) = registry().remove(&(id as u64)) {
        flag.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Instant;

    fn wait_until(deadline_ms: u64, done: impl Fn() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < Duration::from_millis(deadline_ms) {
            if done() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        done()
    }

    #[test]
    fn test_timeout_fires_once() {
        static HITS: AtomicUsize = AtomicUsize::new(0);
        let callback = Value::native("cb", 0, |_, _| {
            HITS.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Undefined)
        });
        let id = schedule(&[callback, Value::Number(1.0)], false).unwrap();
        assert!(id.as_f64().unwrap() >= 1.0);
        assert!(wait_until(2_000, || HITS.load(Ordering::SeqCst) == 1));
    }

    #[test]
    fn test_interval_can_be_cleared() {
        static TICKS: AtomicUsize = AtomicUsize::new(0);
        let callback = Value::native("tick", 0, |_, _| {
            TICKS.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Undefined)
        });
        let id = schedule(&[callback, Value::Number(1.0)], true).unwrap();
        assert!(wait_until(2_000, || TICKS.load(Ordering::SeqCst) >= 2));
        cancel(&id);
        thread::sleep(Duration::from_millis(50));
        let after_cancel = TICKS.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(TICKS.load(Ordering::SeqCst), after_cancel);
    }

    #[test]
    fn test_non_function_callback_rejected() {
        let err = schedule(&["code".into(), Value::Number(1.0)], false).unwrap_err();
        assert!(err.contains("must be a function"));
    }

    #[test]
    fn test_cancel_unknown_id_is_noop() {
        cancel(&Value::Number(9_999_999.0));
        cancel(&Value::Undefined);
    }
}
