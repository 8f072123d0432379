use std::sync::Arc;

use pretty_assertions::assert_eq;
use trackexpr::*;

// Helper to parse and evaluate against the defaults only
fn eval(src: &str) -> Result<Value> {
    run_in_context(src, &Context::new())
}

// Helper with caller bindings
fn eval_with(src: &str, bindings: Vec<(&str, Value)>) -> Result<Value> {
    run_in_context(src, &Context::new().with_external(bindings))
}

// Helper with keyword operators enabled
fn eval_kw(src: &str, context: &Context) -> Result<Value> {
    Engine::with_config(EngineConfig {
        keyword_operators: true,
        ..EngineConfig::default()
    })
    .evaluate(src, context)
}

fn num(n: f64) -> Value {
    Value::Number(n)
}

fn is_nan(value: &Value) -> bool {
    value.as_f64().is_some_and(f64::is_nan)
}

// ═══════════════════════════════════════════════════════════════════════
// Arithmetic and Precedence
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_eval_precedence() {
    assert_eq!(eval("1+2*3").unwrap(), num(7.0));
    assert_eq!(eval("(1+2)*3").unwrap(), num(9.0));
    assert_eq!(eval("10 - 4 - 3").unwrap(), num(3.0));
    assert_eq!(eval("2 * 3 % 4").unwrap(), num(2.0));
    assert_eq!(eval("1 - -1").unwrap(), num(2.0));
}

#[test]
fn test_eval_division() {
    assert_eq!(eval("1 / 0").unwrap(), num(f64::INFINITY));
    assert!(is_nan(&eval("0 / 0").unwrap()));
    assert_eq!(eval("-7 % 3").unwrap(), num(-1.0));
}

#[test]
fn test_eval_string_concatenation() {
    assert_eq!(eval("'a' + 1 + 2").unwrap(), Value::string("a12"));
    assert_eq!(eval("1 + 2 + 'a'").unwrap(), Value::string("3a"));
    assert_eq!(eval("'n: ' + null").unwrap(), Value::string("n: null"));
}

#[test]
fn test_eval_bitwise() {
    assert_eq!(eval("5 & 3").unwrap(), num(1.0));
    assert_eq!(eval("5 | 3").unwrap(), num(7.0));
    assert_eq!(eval("5 ^ 3").unwrap(), num(6.0));
    assert_eq!(eval("~5").unwrap(), num(-6.0));
    assert_eq!(eval("1 << 4").unwrap(), num(16.0));
    assert_eq!(eval("-1 >>> 28").unwrap(), num(15.0));
}

#[test]
fn test_eval_unary() {
    assert_eq!(eval("+'3'").unwrap(), num(3.0));
    assert!(is_nan(&eval("-'x'").unwrap()));
    assert_eq!(eval("!0").unwrap(), Value::Bool(true));
    assert_eq!(eval("!!'a'").unwrap(), Value::Bool(true));
}

// ═══════════════════════════════════════════════════════════════════════
// Comparison and Equality
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_eval_member_comparison() {
    let x = Value::object([("a", num(0.0)), ("b", num(1.0))]);
    assert_eq!(eval_with("X.a > X.b", vec![("X", x)]).unwrap(), Value::Bool(false));
}

#[test]
fn test_eval_equality() {
    assert_eq!(eval("1 == '1'").unwrap(), Value::Bool(true));
    assert_eq!(eval("1 === '1'").unwrap(), Value::Bool(false));
    assert_eq!(eval("null == undefined").unwrap(), Value::Bool(true));
    assert_eq!(eval("null === undefined").unwrap(), Value::Bool(false));
    assert_eq!(eval("NaN == NaN").unwrap(), Value::Bool(false));
    assert_eq!(eval("'a' !== 'b'").unwrap(), Value::Bool(true));
}

#[test]
fn test_eval_relational_strings() {
    assert_eq!(eval("'b' > 'a'").unwrap(), Value::Bool(true));
    assert_eq!(eval("'10' < '9'").unwrap(), Value::Bool(true));
    assert_eq!(eval("'10' < 9").unwrap(), Value::Bool(false));
    assert_eq!(eval("NaN <= NaN").unwrap(), Value::Bool(false));
}

// ═══════════════════════════════════════════════════════════════════════
// Logical and Conditional
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_eval_logical_returns_operand() {
    let x = Value::object([("index", num(0.0))]);
    assert_eq!(eval_with("X.index || 1", vec![("X", x)]).unwrap(), num(1.0));
    assert_eq!(eval("'a' && 'b'").unwrap(), Value::string("b"));
    assert_eq!(eval("0 && missing()").unwrap(), num(0.0));
    assert_eq!(eval("'' || null").unwrap(), Value::Null);
}

#[test]
fn test_eval_conditional() {
    assert_eq!(eval_with("flag ? 1 : 0", vec![("flag", Value::Bool(true))]).unwrap(), num(1.0));
    assert_eq!(eval_with("flag ? 1 : 0", vec![("flag", Value::Bool(false))]).unwrap(), num(0.0));
}

#[test]
fn test_eval_conditional_skips_untaken_branch() {
    // The untaken branch would fail if it ran
    assert_eq!(eval("true ? 1 : nothing()").unwrap(), num(1.0));
    assert_eq!(eval("false ? nothing() : 2").unwrap(), num(2.0));
}

// ═══════════════════════════════════════════════════════════════════════
// Member Access
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_eval_member_access() {
    let a = Value::object([
        ("b", Value::string("1")),
        ("c", Value::array(vec![num(2.0)])),
    ]);
    assert_eq!(eval_with("a.b", vec![("a", a.clone())]).unwrap(), Value::string("1"));
    assert_eq!(eval_with("a['c'][0]", vec![("a", a.clone())]).unwrap(), num(2.0));
    assert_eq!(eval_with("a.c.length", vec![("a", a.clone())]).unwrap(), num(1.0));
    assert_eq!(eval_with("a.zzz", vec![("a", a)]).unwrap(), Value::Undefined);
}

#[test]
fn test_eval_member_of_nullish() {
    assert_eq!(eval("null.a").unwrap(), Value::Undefined);
    assert_eq!(eval("undefined.a.b.c").unwrap(), Value::Undefined);
}

#[test]
fn test_eval_member_of_primitive() {
    let data = Value::Number(1.0);
    let value = eval_with("$DATA.data['1'] + 1", vec![("$DATA", data)]).unwrap();
    assert!(is_nan(&value));
    assert_eq!(eval("'abc'.length").unwrap(), num(3.0));
    assert_eq!(eval("'abc'[1]").unwrap(), Value::string("b"));
}

#[test]
fn test_eval_computed_key_coercion() {
    let arr = Value::array(vec![Value::string("x"), Value::string("y")]);
    assert_eq!(eval_with("arr[0 + 1]", vec![("arr", arr.clone())]).unwrap(), Value::string("y"));
    assert_eq!(eval_with("arr['1']", vec![("arr", arr)]).unwrap(), Value::string("y"));
}

// ═══════════════════════════════════════════════════════════════════════
// Calls
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_eval_method_receives_object_as_this() {
    let obj = Value::object([
        ("val", num(5.0)),
        ("get", Value::native("get", 0, |this, _| Ok(this.get_member("val")))),
    ]);
    assert_eq!(eval_with("obj.get()", vec![("obj", obj)]).unwrap(), num(5.0));
}

#[test]
fn test_eval_plain_call_receives_context_this() {
    let whoami = Value::native("whoami", 0, |this, _| Ok(this.clone()));
    let ctx = Context::new()
        .with_external([("whoami", whoami)])
        .with_this(Value::string("me"));
    assert_eq!(run_in_context("whoami()", &ctx).unwrap(), Value::string("me"));

    let ctx = Context::new().with_external([(
        "whoami",
        Value::native("whoami", 0, |this, _| Ok(this.clone())),
    )]);
    assert_eq!(run_in_context("whoami()", &ctx).unwrap(), Value::Null);
}

#[test]
fn test_eval_builtin_methods() {
    assert_eq!(eval("'Hello'.toUpperCase()").unwrap(), Value::string("HELLO"));
    assert_eq!(eval("'a,b,c'.split(',').length").unwrap(), num(3.0));
    assert_eq!(eval("[1, 2, 3].join('-')").unwrap(), Value::string("1-2-3"));
    assert_eq!(eval("(3.14159).toFixed(2)").unwrap(), Value::string("3.14"));
    assert_eq!(eval("Math.max(1, 5, 3)").unwrap(), num(5.0));
}

#[test]
fn test_eval_not_callable() {
    let err = eval_with("a.b()", vec![("a", Value::empty_object())]).unwrap_err();
    match err {
        Error::Eval(EvalError::NotCallable { callee }) => assert_eq!(callee, "a.b"),
        other => panic!("unexpected {:?}", other),
    }
    assert!(eval("1()").is_err());
}

#[test]
fn test_eval_builtin_error_carries_name() {
    let err = eval("JSON.parse('{')").unwrap_err();
    match err {
        Error::Eval(EvalError::BuiltinError { name, .. }) => assert_eq!(name, "parse"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_eval_arguments_in_order() {
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let log = {
        let seen = seen.clone();
        Value::native("log", 1, move |_, args| {
            seen.lock().push(args[0].clone());
            Ok(args[0].clone())
        })
    };
    let pair = Value::native("pair", 2, |_, args| Ok(Value::array(args.to_vec())));
    let value = eval_with("pair(log(1), log(2))", vec![("log", log), ("pair", pair)]).unwrap();
    assert_eq!(value, Value::array(vec![num(1.0), num(2.0)]));
    assert_eq!(*seen.lock(), vec![num(1.0), num(2.0)]);
}

// ═══════════════════════════════════════════════════════════════════════
// Identifiers and Diagnostics
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_eval_unbound_identifier_is_soft() {
    let sink = Arc::new(CollectingDiagnostics::new());
    let engine = Engine::new().with_diagnostics(sink.clone());
    let value = engine.evaluate("UNBOUND", &Context::new()).unwrap();
    assert_eq!(value, Value::Undefined);
    assert_eq!(
        sink.misses(),
        vec![ResolutionMiss {
            name: "UNBOUND".to_string(),
            offset: 0
        }]
    );
}

#[test]
fn test_eval_miss_offsets() {
    let sink = Arc::new(CollectingDiagnostics::new());
    let engine = Engine::new().with_diagnostics(sink.clone());
    engine.evaluate("a + foo.bar", &Context::new()).unwrap();
    let offsets: Vec<usize> = sink.misses().iter().map(|m| m.offset).collect();
    assert_eq!(offsets, vec![0, 4]);
}

#[test]
fn test_eval_undefined_name_always_undefined() {
    let ctx = Context::new().with_external([("undefined", num(1.0))]);
    assert_eq!(run_in_context("undefined", &ctx).unwrap(), Value::Undefined);
}

#[test]
fn test_eval_this() {
    assert_eq!(eval("this").unwrap(), Value::Null);
    let ctx = Context::new().with_this(Value::object([("x", num(3.0))]));
    assert_eq!(run_in_context("this.x", &ctx).unwrap(), num(3.0));
}

// ═══════════════════════════════════════════════════════════════════════
// Arrays and Programs
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_eval_array_holes() {
    assert_eq!(
        eval("[1,,3]").unwrap(),
        Value::array(vec![num(1.0), Value::Undefined, num(3.0)])
    );
    assert_eq!(eval("[]").unwrap(), Value::array(vec![]));
}

#[test]
fn test_eval_program_is_undefined() {
    assert_eq!(eval("1; 2").unwrap(), Value::Undefined);
    assert_eq!(eval("").unwrap(), Value::Undefined);
}

// ═══════════════════════════════════════════════════════════════════════
// Keyword Operators
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_eval_typeof() {
    let ctx = Context::new().with_external([("s", Value::string("x"))]);
    assert_eq!(eval_kw("typeof s", &ctx).unwrap(), Value::string("string"));
    assert_eq!(eval_kw("typeof Math.abs", &ctx).unwrap(), Value::string("function"));
    assert_eq!(eval_kw("typeof null", &ctx).unwrap(), Value::string("object"));
}

#[test]
fn test_eval_typeof_unbound_not_reported() {
    let sink = Arc::new(CollectingDiagnostics::new());
    let engine = Engine::with_config(EngineConfig {
        keyword_operators: true,
        ..EngineConfig::default()
    })
    .with_diagnostics(sink.clone());
    let value = engine.evaluate("typeof nope", &Context::new()).unwrap();
    assert_eq!(value, Value::string("undefined"));
    assert!(sink.is_empty());
}

#[test]
fn test_eval_void() {
    assert_eq!(eval_kw("void 1", &Context::new()).unwrap(), Value::Undefined);
}

#[test]
fn test_eval_delete_member() {
    let obj = Value::object([("a", num(1.0)), ("b", num(2.0))]);
    let ctx = Context::new().with_external([("obj", obj.clone())]);
    assert_eq!(eval_kw("delete obj.a", &ctx).unwrap(), Value::Bool(true));
    assert_eq!(obj, Value::object([("b", num(2.0))]));
}

#[test]
fn test_eval_delete_array_element_leaves_hole() {
    let arr = Value::array(vec![num(1.0), num(2.0)]);
    let ctx = Context::new().with_external([("arr", arr.clone())]);
    assert_eq!(eval_kw("delete arr[0]", &ctx).unwrap(), Value::Bool(true));
    assert_eq!(arr, Value::array(vec![Value::Undefined, num(2.0)]));
}

#[test]
fn test_eval_delete_identifier_targets_this() {
    let this = Value::object([("gone", num(1.0))]);
    let ctx = Context::new().with_this(this.clone());
    assert_eq!(eval_kw("delete gone", &ctx).unwrap(), Value::Bool(true));
    assert_eq!(this, Value::empty_object());

    assert_eq!(eval_kw("delete gone", &Context::new()).unwrap(), Value::Bool(false));
}

#[test]
fn test_eval_delete_on_nullish_fails() {
    let err = eval_kw("delete nothing.a", &Context::new()).unwrap_err();
    assert!(matches!(err, Error::Eval(EvalError::TypeError { .. })));
}

#[test]
fn test_eval_in_operator() {
    let ctx = Context::new().with_external([
        ("obj", Value::object([("a", num(1.0))])),
        ("arr", Value::array(vec![num(1.0), Value::Undefined])),
    ]);
    assert_eq!(eval_kw("'a' in obj", &ctx).unwrap(), Value::Bool(true));
    assert_eq!(eval_kw("'b' in obj", &ctx).unwrap(), Value::Bool(false));
    assert_eq!(eval_kw("1 in arr", &ctx).unwrap(), Value::Bool(true));
    assert_eq!(eval_kw("2 in arr", &ctx).unwrap(), Value::Bool(false));
    assert!(eval_kw("'a' in 'abc'", &ctx).is_err());
}

#[test]
fn test_eval_instanceof() {
    let ctx = Context::new();
    assert_eq!(eval_kw("[] instanceof Array", &ctx).unwrap(), Value::Bool(true));
    assert_eq!(eval_kw("RangeError('x') instanceof Error", &ctx).unwrap(), Value::Bool(true));
    assert_eq!(eval_kw("1 instanceof Object", &ctx).unwrap(), Value::Bool(false));
    assert!(eval_kw("1 instanceof 1", &ctx).is_err());
}

// ═══════════════════════════════════════════════════════════════════════
// Depth Guard
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_eval_depth_exceeded() {
    let ctx = Context::new();
    let node = parse("[[[[1]]]]").unwrap();
    let err = eval_node(&node, &ctx, &EvalContext::with_max_depth(3)).unwrap_err();
    assert!(matches!(err, EvalError::DepthExceeded { max: 3, .. }));
    assert!(eval_node(&node, &ctx, &EvalContext::with_max_depth(5)).is_ok());
}

#[test]
fn test_eval_depth_resets_between_siblings() {
    let ctx = EvalContext::with_max_depth(4);
    let node = parse("[[1], [2], [3], [4], [5]]").unwrap();
    assert!(eval_node(&node, &Context::new(), &ctx).is_ok());
    assert_eq!(ctx.depth(), 0);
}

fn sum_of_ones(terms: usize) -> String {
    vec!["1"; terms].join("+")
}

#[test]
fn test_flat_sum_at_depth_ceiling() {
    let at_ceiling = sum_of_ones(DEFAULT_MAX_DEPTH);
    assert_eq!(eval(&at_ceiling).unwrap(), num(DEFAULT_MAX_DEPTH as f64));

    let over = sum_of_ones(DEFAULT_MAX_DEPTH + 1);
    match eval(&over).unwrap_err() {
        Error::Parse(err) => assert_eq!(err.message, "Expression nested too deeply"),
        other => panic!("unexpected {:?}", other),
    }

    let flat = sum_of_ones(300);
    assert!(matches!(eval(&flat), Err(Error::Parse(_))));
}

#[test]
fn test_long_binary_chain_falls_back_to_source() {
    let source = sum_of_ones(20_000);
    let value = Engine::new().evaluate_or_source(&source, &Context::new());
    assert_eq!(value, Value::string(source));
}

#[test]
fn test_long_member_chain_falls_back_to_source() {
    let source = format!("a{}", ".b".repeat(50_000));
    let value = Engine::new().evaluate_or_source(&source, &Context::new());
    assert_eq!(value, Value::string(source));

    let source = format!("a{}", "[0]".repeat(50_000));
    let value = Engine::new().evaluate_or_source(&source, &Context::new());
    assert_eq!(value, Value::string(source));

    let source = format!("f{}", "()".repeat(50_000));
    let value = Engine::new().evaluate_or_source(&source, &Context::new());
    assert_eq!(value, Value::string(source));
}
