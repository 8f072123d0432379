//! `Math` and the numeric globals

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;

use super::{define, namespace};
use crate::value::{arg, Value};

pub(super) fn install(globals: &mut IndexMap<String, Value>) {
    let math = namespace(
        &[
            ("abs", 1, |_, a| unary(a, f64::abs)),
            ("ceil", 1, |_, a| unary(a, f64::ceil)),
            ("floor", 1, |_, a| unary(a, f64::floor)),
            ("round", 1, |_, a| unary(a, round_half_up)),
            ("trunc", 1, |_, a| unary(a, f64::trunc)),
            ("sign", 1, |_, a| unary(a, sign)),
            ("sqrt", 1, |_, a| unary(a, f64::sqrt)),
            ("cbrt", 1, |_, a| unary(a, f64::cbrt)),
            ("exp", 1, |_, a| unary(a, f64::exp)),
            ("log", 1, |_, a| unary(a, f64::ln)),
            ("log2", 1, |_, a| unary(a, f64::log2)),
            ("log10", 1, |_, a| unary(a, f64::log10)),
            ("sin", 1, |_, a| unary(a, f64::sin)),
            ("cos", 1, |_, a| unary(a, f64::cos)),
            ("tan", 1, |_, a| unary(a, f64::tan)),
            ("asin", 1, |_, a| unary(a, f64::asin)),
            ("acos", 1, |_, a| unary(a, f64::acos)),
            ("atan", 1, |_, a| unary(a, f64::atan)),
            ("atan2", 2, |_, a| {
                Ok(Value::Number(num(a, 0).atan2(num(a, 1))))
            }),
            ("pow", 2, |_, a| Ok(Value::Number(pow(num(a, 0), num(a, 1))))),
            ("min", 2, math_min),
            ("max", 2, math_max),
            ("hypot", 2, |_, a| {
                let sum: f64 = a.iter().map(|v| v.to_number().powi(2)).sum();
                Ok(Value::Number(sum.sqrt()))
            }),
            ("random", 0, |_, _| Ok(Value::Number(random()))),
        ],
        &[
            ("PI", Value::Number(std::f64::consts::PI)),
            ("E", Value::Number(std::f64::consts::E)),
            ("LN2", Value::Number(std::f64::consts::LN_2)),
            ("LN10", Value::Number(std::f64::consts::LN_10)),
            ("LOG2E", Value::Number(std::f64::consts::LOG2_E)),
            ("LOG10E", Value::Number(std::f64::consts::LOG10_E)),
            ("SQRT2", Value::Number(std::f64::consts::SQRT_2)),
            ("SQRT1_2", Value::Number(std::f64::consts::FRAC_1_SQRT_2)),
        ],
    );
    globals.insert("Math".to_string(), math);

    define(globals, "isFinite", 1, |_, a| Ok(Value::Bool(num(a, 0).is_finite())));
    define(globals, "isNaN", 1, |_, a| Ok(Value::Bool(num(a, 0).is_nan())));
    define(globals, "parseFloat", 1, |_, a| {
        Ok(Value::Number(parse_float(&arg(a, 0).to_js_string())))
    });
    define(globals, "parseInt", 2, |_, a| {
        let radix = match arg(a, 1) {
            Value::Undefined => 0,
            other => other.to_int32(),
        };
        Ok(Value::Number(parse_int(&arg(a, 0).to_js_string(), radix)))
    });
}

fn num(args: &[Value], index: usize) -> f64 {
    arg(args, index).to_number()
}

fn unary(args: &[Value], f: fn(f64) -> f64) -> Result<Value, String> {
    Ok(Value::Number(f(num(args, 0))))
}

/// Rounds halves towards positive infinity (`-2.5` becomes `-2`).
fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

fn sign(x: f64) -> f64 {
    if x.is_nan() || x == 0.0 {
        x
    } else {
        x.signum()
    }
}

/// `powf` except that a `NaN` exponent always yields `NaN`, and
/// `(±1) ** ±Infinity` is `NaN`.
fn pow(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exponent)
}

fn math_min(_this: &Value, args: &[Value]) -> Result<Value, String> {
    let mut result = f64::INFINITY;
    for value in args {
        let n = value.to_number();
        if n.is_nan() {
            return Ok(Value::Number(f64::NAN));
        }
        if n < result || (n == 0.0 && result == 0.0 && n.is_sign_negative()) {
            result = n;
        }
    }
    Ok(Value::Number(result))
}

fn math_max(_this: &Value, args: &[Value]) -> Result<Value, String> {
    let mut result = f64::NEG_INFINITY;
    for value in args {
        let n = value.to_number();
        if n.is_nan() {
            return Ok(Value::Number(f64::NAN));
        }
        if n > result || (n == 0.0 && result == 0.0 && n.is_sign_positive()) {
            result = n;
        }
    }
    Ok(Value::Number(result))
}

/// Uniform value in `[0, 1)`, seeded from the process's random hasher
/// keys and a call counter.
fn random() -> f64 {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u64(COUNTER.fetch_add(1, Ordering::Relaxed));
    let bits = hasher.finish() >> 11;
    bits as f64 / (1u64 << 53) as f64
}

/// Longest numeric prefix of `s` after leading whitespace, else `NaN`.
pub(super) fn parse_float(s: &str) -> f64 {
    let trimmed = s.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1.0, &trimmed[1..]),
        Some(b'+') => (1.0, &trimmed[1..]),
        _ => (1.0, trimmed),
    };
    if rest.starts_with("Infinity") {
        return sign * f64::INFINITY;
    }

    let bytes = rest.as_bytes();
    let mut end = 0;
    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    rest[..end]
        .parse::<f64>()
        .map(|n| sign * n)
        .unwrap_or(f64::NAN)
}

/// Integer prefix of `s` in `radix` (0 means detect: `0x` is hex, else
/// decimal), else `NaN`.
pub(super) fn parse_int(s: &str, radix: i32) -> f64 {
    let trimmed = s.trim_start();
    let (sign, mut rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1.0, &trimmed[1..]),
        Some(b'+') => (1.0, &trimmed[1..]),
        _ => (1.0, trimmed),
    };

    let mut radix = radix;
    if radix != 0 && !(2..=36).contains(&radix) {
        return f64::NAN;
    }
    if radix == 0 || radix == 16 {
        if let Some(stripped) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
            rest = stripped;
            radix = 16;
        }
    }
    if radix == 0 {
        radix = 10;
    }

    let mut result = 0.0_f64;
    let mut any = false;
    for c in rest.chars() {
        match c.to_digit(radix as u32) {
            Some(d) => {
                result = result * radix as f64 + d as f64;
                any = true;
            }
            None => break,
        }
    }
    if any {
        sign * result
    } else {
        f64::NAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(0.49999999999999994), 0.0);
        assert_eq!(round_half_up(-0.4), -0.0);
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float("  3.14abc"), 3.14);
        assert_eq!(parse_float("-1e3x"), -1000.0);
        assert_eq!(parse_float("1e"), 1.0);
        assert_eq!(parse_float(".5"), 0.5);
        assert_eq!(parse_float("-Infinity"), f64::NEG_INFINITY);
        assert!(parse_float("abc").is_nan());
        assert!(parse_float(".").is_nan());
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("42px", 0), 42.0);
        assert_eq!(parse_int("  -17", 0), -17.0);
        assert_eq!(parse_int("0x1F", 0), 31.0);
        assert_eq!(parse_int("ff", 16), 255.0);
        assert_eq!(parse_int("101", 2), 5.0);
        assert_eq!(parse_int("3.9", 10), 3.0);
        assert!(parse_int("x", 10).is_nan());
        assert!(parse_int("1", 99).is_nan());
    }

    #[test]
    fn test_min_max() {
        let args = [Value::Number(3.0), Value::string("1"), Value::Number(2.0)];
        assert_eq!(math_min(&Value::Undefined, &args).unwrap(), Value::Number(1.0));
        assert_eq!(math_max(&Value::Undefined, &args).unwrap(), Value::Number(3.0));
        assert_eq!(
            math_max(&Value::Undefined, &[]).unwrap(),
            Value::Number(f64::NEG_INFINITY)
        );
        assert!(math_min(&Value::Undefined, &[Value::Undefined])
            .unwrap()
            .as_f64()
            .unwrap()
            .is_nan());
    }

    #[test]
    fn test_random_in_range() {
        for _ in 0..100 {
            let r = random();
            assert!((0.0..1.0).contains(&r));
        }
    }

    #[test]
    fn test_pow_edge_cases() {
        assert_eq!(pow(2.0, 10.0), 1024.0);
        assert!(pow(1.0, f64::INFINITY).is_nan());
        assert!(pow(2.0, f64::NAN).is_nan());
    }
}
