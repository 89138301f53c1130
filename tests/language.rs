use ktinterp::{
    Outcome, RunOptions,
    error::{KtError, RuntimeError},
    interpreter::{
        lexer::{TokenKind, TokenValue, tokenize},
        value::core::Value,
    },
    parse, run_source, tokenize_named,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn run_with(src: &str, options: &RunOptions) -> (Result<Outcome, KtError>, String) {
    let mut output = Vec::new();
    let result = run_source(src, options, &mut output);
    (result, String::from_utf8(output).expect("program output is UTF-8"))
}

fn assert_success(src: &str) -> (Value, String) {
    match run_with(src, &RunOptions::default()) {
        (Ok(outcome), output) => (outcome.value, output),
        (Err(e), _) => panic!("Script failed: {e}"),
    }
}

fn assert_failure(src: &str) -> KtError {
    match run_with(src, &RunOptions::default()) {
        (Ok(_), _) => panic!("Script succeeded but was expected to fail"),
        (Err(e), _) => e,
    }
}

fn output_of(src: &str) -> String {
    assert_success(src).1
}

fn runtime_error(src: &str) -> RuntimeError {
    match assert_failure(src) {
        KtError::Runtime(e) => e,
        other => panic!("expected a runtime error, got: {other}"),
    }
}

#[test]
fn variables_and_arithmetic() {
    let (value, output) =
        assert_success("fun main() { val x = 10; var y = 20; y = y + x; println(y) }");
    assert_eq!(output, "30\n");
    assert_eq!(value, Value::Unit);

    assert_eq!(output_of("fun main() {\n val x = 10\n var y = 20\n y = y + x\n println(y)\n}"),
               "30\n");
}

#[test]
fn function_call_with_return() {
    let src = "fun add(a: Int, b: Int): Int { return a + b } fun main() { println(add(5,3)) }";
    assert_eq!(output_of(src), "8\n");
}

#[test]
fn division_by_zero_produces_no_output() {
    let (result, output) = run_with("fun main() { val y = 100 / 0 }", &RunOptions::default());
    assert!(matches!(result, Err(KtError::Runtime(RuntimeError::DivisionByZero { .. }))));
    assert_eq!(output, "");

    assert!(matches!(runtime_error("fun main() { println(1 % 0) }"),
                     RuntimeError::ModuloByZero { .. }));
}

#[test]
fn invalid_operand_types() {
    let err = runtime_error("fun main() { val x = 10 - \"hello\" }");
    assert!(matches!(err, RuntimeError::InvalidOperands { op: "-", .. }));
    assert_eq!(err.to_string(), "Error at 1:25: Invalid operands for -: Int, String");

    assert!(matches!(runtime_error("fun main() { println(-true) }"),
                     RuntimeError::InvalidOperand { op: "-", .. }));
}

#[test]
fn while_body_does_not_mutate_shadowed_outer_binding() {
    let src = "fun main() {
                   val x = 1
                   var i = 0
                   while (i < 3) {
                       var x = 100
                       x = x + i
                       i = i + 1
                   }
                   println(x)
                   println(i)
               }";
    assert_eq!(output_of(src), "1\n3\n");
}

#[test]
fn functions_observe_reassigned_globals() {
    let src = "var x = 1
               fun show() { println(x) }
               fun main() {
                   show()
                   x = 2
                   show()
               }";
    assert_eq!(output_of(src), "1\n2\n");
}

#[test]
fn functions_may_be_declared_after_use() {
    let src = "val eight = double(4)
               fun main() { println(eight)\n println(triple(2)) }
               fun double(n: Int): Int { return n * 2 }
               fun triple(n: Int): Int { return n * 3 }";
    assert_eq!(output_of(src), "8\n6\n");
}

#[test]
fn main_result_is_the_run_result() {
    assert_eq!(assert_success("fun main(): Int { return 42 }").0, Value::Int(42));
    assert_eq!(assert_success("val x = 3").0, Value::Unit);
    assert_eq!(assert_success("fun main(): String { \"last\" }").0, Value::from("last"));
}

#[test]
fn val_bindings_are_immutable() {
    let err = runtime_error("fun main() { val x = 1\n x = 2 }");
    assert_eq!(err.to_string(), "Error at 2:4: Cannot assign to val 'x'");

    assert_eq!(output_of("fun main() { val x: Int\n x = 5\n println(x) }"), "5\n");
    assert!(matches!(runtime_error("fun main() { val x: Int\n x = 5\n x = 6 }"),
                     RuntimeError::ImmutableAssignment { .. }));
}

#[test]
fn uninitialized_variables_read_as_unit() {
    assert_eq!(output_of("fun main() { var x: Int\n println(x) }"), "kotlin.Unit\n");
}

#[test]
fn declared_types_are_enforced() {
    let err = runtime_error("fun main() { val x: Int = \"s\" }");
    assert_eq!(err.to_string(), "Error at 1:27: Type mismatch: expected Int, got String");

    assert!(matches!(runtime_error("fun main() { var b: Boolean = true\n b = 1 }"),
                     RuntimeError::TypeMismatch { .. }));
}

#[test]
fn logical_operators_short_circuit() {
    let src = "fun boom(): Boolean { println(\"boom\")\n return true }
               fun main() {
                   println(false && boom())
                   println(true || boom())
                   println(true && boom())
               }";
    assert_eq!(output_of(src), "false\ntrue\nboom\ntrue\n");
}

#[test]
fn conditions_must_be_boolean() {
    let err = runtime_error("fun main() { if (1) println(1) }");
    assert_eq!(err.to_string(), "Error at 1:18: Type Int cannot be used as condition");

    assert!(matches!(runtime_error("fun main() { while (\"yes\") { } }"),
                     RuntimeError::InvalidCondition { .. }));
}

#[test]
fn undefined_names() {
    let err = runtime_error("fun main() { println(y) }");
    assert_eq!(err.to_string(), "Error at 1:22: Undefined variable: 'y'");

    assert!(matches!(runtime_error("fun main() { y = 3 }"),
                     RuntimeError::UndefinedVariable { .. }));
    assert!(matches!(runtime_error("fun main() { missing() }"),
                     RuntimeError::UndefinedVariable { .. }));
}

#[test]
fn if_expressions_and_statements() {
    let src = "fun max(a: Int, b: Int): Int { return if (a > b) a else b }
               fun main() {
                   println(max(3, 9))
                   if (max(1, 2) == 2) println(\"two\") else println(\"other\")
               }";
    assert_eq!(output_of(src), "9\ntwo\n");
}

#[test]
fn string_concatenation_and_templates() {
    assert_eq!(output_of("fun main() { println(\"a\" + 1 + 2)\n println(1 + 2 + \"a\") }"),
               "a12\n3a\n");

    let src = "val who = \"world\"
               fun main() { val n = 2\n println(\"hello $who, ${n * 21} \\$x\") }";
    assert_eq!(output_of(src), "hello world, 42 $x\n");
}

#[test]
fn equality() {
    let src = "fun main() {
                   println(\"a\" == \"a\")
                   println(1 != 2)
                   println(true == false)
               }";
    assert_eq!(output_of(src), "true\ntrue\nfalse\n");
    assert!(matches!(runtime_error("fun main() { println(1 == \"1\") }"),
                     RuntimeError::InvalidOperands { op: "==", .. }));
}

#[test]
fn integer_arithmetic_wraps() {
    assert_eq!(output_of("fun main() { println(9223372036854775807 + 1) }"),
               "-9223372036854775808\n");
    assert_eq!(output_of("fun main() { println(-7 / 2)\n println(-7 % 2) }"), "-3\n-1\n");
}

#[test]
fn print_and_println() {
    assert_eq!(output_of("fun main() { print(1)\n print(\"a\")\n println()\n println(true) }"),
               "1a\ntrue\n");
    assert!(matches!(runtime_error("fun main() { print() }"),
                     RuntimeError::ArgumentCountMismatch { .. }));
}

#[test]
fn semantic_errors_withhold_execution() {
    let src = "fun main() { println(1) }\nfun main() { println(2) }";
    match assert_failure(src) {
        KtError::Semantic(diagnostics) => {
            assert_eq!(diagnostics.errors().len(), 1);
            assert_eq!(diagnostics.errors()[0].message, "Redefinition of function 'main'");
        },
        other => panic!("expected semantic errors, got: {other}"),
    }

    let options = RunOptions { check_semantics: false,
                               ..RunOptions::default() };
    let (result, output) = run_with(src, &options);
    assert!(result.unwrap().diagnostics.has_errors());
    assert_eq!(output, "2\n");
}

#[test]
fn warnings_do_not_block() {
    let (result, output) =
        run_with("fun main() { println(1); return; println(2) }", &RunOptions::default());
    let outcome = result.unwrap();
    assert!(outcome.diagnostics.has_warnings());
    assert_eq!(outcome.diagnostics.warnings()[0].message, "Unreachable code detected");
    assert_eq!(output, "1\n");
}

#[test]
fn front_end_errors() {
    assert!(matches!(assert_failure("fun main() { val s = \"abc }"), KtError::Lex(_)));
    assert!(matches!(assert_failure("fun main() { val x = 1 @ 2 }"), KtError::Lex(_)));
    assert!(matches!(assert_failure("fun main() { println(1 }"), KtError::Parse(_)));
    assert!(matches!(assert_failure("println(1)"), KtError::Parse(_)));
}

#[test]
fn errors_carry_the_file_name() {
    let options = RunOptions { filename: Some("main.kt".to_string()),
                               ..RunOptions::default() };
    let (result, _) = run_with("fun main() {\n  val y = 1 / 0\n}", &options);
    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "Error at main.kt:2:13: Division by zero");

    let tokens = tokenize_named("fun main() {\n  println(1)\n}", Some("main.kt")).unwrap();
    assert_eq!(tokens[5].location.to_string(), "main.kt:2:3");
    assert!(tokens.iter().all(|t| t.location.to_string().starts_with("main.kt:")));
}

#[test]
fn unicode_identifiers() {
    assert_eq!(output_of("val café = 1\nfun main() { val größe = café + 1\n println(\"$größe\") }"),
               "2\n");
}

/// Runs `f` on a thread with a fixed 16 MiB stack. Dropping a deep AST
/// recurses without a stack guard.
fn with_fixed_stack<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    std::thread::Builder::new().stack_size(16 * 1024 * 1024)
                               .spawn(f)
                               .unwrap()
                               .join()
                               .unwrap()
}

#[test]
fn long_operator_chains_do_not_overflow() {
    let output = with_fixed_stack(|| {
        let sum = vec!["1"; 100_000].join(" + ");
        output_of(&format!("fun main() {{ println({sum}) }}"))
    });
    assert_eq!(output, "100000\n");
}

#[test]
fn deeply_nested_unary_operators_do_not_overflow() {
    let output = with_fixed_stack(|| {
        let nots = "!".repeat(100_000);
        let negs = "-".repeat(99_999);
        output_of(&format!("fun main() {{ println({nots}true)\n println({negs}5) }}"))
    });
    assert_eq!(output, "true\n-5\n");
}

#[test]
fn printed_program_reparses_identically() {
    let src = "fun add(a: Int, b: Int): Int { return a + b }
               var total = 0
               fun main() {
                   var i = 0
                   while (i < 5) { total = add(total, i * 2); i = i + 1 }
                   println(\"total = $total\")
               }";
    let printed = parse(src).unwrap().to_string();
    assert_eq!(parse(&printed).unwrap().to_string(), printed);
    assert_eq!(output_of(&printed), output_of(src));
}

fn expression() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![(0..1000i64).prop_map(|n| n.to_string()),
                           Just("a".to_string()),
                           Just("b".to_string()),];
    leaf.prop_recursive(4, 32, 2, |inner| {
            prop_oneof![(inner.clone(),
                         prop::sample::select(vec!["+", "-", "*", "/", "%", "<", "==", "&&"]),
                         inner.clone()).prop_map(|(l, op, r)| format!("{l} {op} {r}")),
                        inner.clone().prop_map(|e| format!("-({e})")),
                        inner.clone().prop_map(|e| format!("!({e})")),
                        (inner.clone(), inner).prop_map(|(c, t)| format!("if ({c}) {t} else {c}")),]
        })
}

proptest! {
    #[test]
    fn integer_literals_tokenize_to_one_token(n in 0..=i64::MAX) {
        let tokens = tokenize(&n.to_string()).unwrap();
        prop_assert_eq!(tokens.len(), 2);
        prop_assert_eq!(tokens[0].kind, TokenKind::IntLiteral);
        prop_assert_eq!(&tokens[0].value, &TokenValue::Int(n));
    }

    #[test]
    fn printing_is_a_fixed_point(expr in expression()) {
        let printed = parse(&format!("val x = {expr}")).unwrap().to_string();
        let reprinted = parse(&printed).unwrap().to_string();
        prop_assert_eq!(printed, reprinted);
    }

    #[test]
    fn arithmetic_matches_wrapping_i64(a in 0..=i64::MAX, b in 0..=i64::MAX) {
        let src = format!("fun main() {{ println({a} + {b})\n println({a} * {b})\n println(-{a} - {b}) }}");
        let expected = format!("{}\n{}\n{}\n",
                               a.wrapping_add(b),
                               a.wrapping_mul(b),
                               a.wrapping_neg().wrapping_sub(b));
        prop_assert_eq!(output_of(&src), expected);
    }
}
