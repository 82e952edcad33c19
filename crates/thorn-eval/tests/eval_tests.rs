//! End-to-end evaluation scenarios, exercised through the public
//! `Interpreter` surface rather than any internal module.

use pretty_assertions::assert_eq;
use thorn_eval::Interpreter;

fn run(source: &str) -> String {
    Interpreter::new().eval(source).to_string()
}

#[test]
fn operator_precedence_and_unary_minus() {
    assert_eq!(run("(5 + 10 * 2 + 15 / 3) * 2 + -10"), "50");
}

#[test]
fn nested_if_return_scenario() {
    let source = "if (10 > 1) {\
                    if (10 > 1) {\
                      return 10;\
                    }\
                    return 1;\
                  }";
    assert_eq!(run(source), "10");
}

#[test]
fn type_mismatch_between_int_and_bool() {
    assert_eq!(run("5 + true"), "ERROR: type mismatch: INTEGER + BOOLEAN");
}

#[test]
fn closures_capture_arguments_by_value() {
    let source = "let new_adder = fn(x) { fn(y) { x + y } };\
                   let add_two = new_adder(2);\
                   add_two(2);";
    assert_eq!(run(source), "4");
}

#[test]
fn arity_mismatch_is_reported() {
    let source = "let add = fn(a, b) { a + b };\
                   add(1);";
    assert_eq!(
        run(source),
        "ERROR: invalid function call: expected 2 arguments, got 1"
    );
}

#[test]
fn chained_function_calls_reach_two_hundred() {
    let source = "let a = fn(x) { x + 1; };\
                   let b = fn(x) { a(x) + 1; };\
                   let c = fn(x) { b(x) + 1; };\
                   c(197);";
    assert_eq!(run(source), "200");
}

#[test]
fn error_propagates_out_of_nested_calls() {
    let source = "let f = fn(x) { x + true };\
                   let g = fn(x) { f(x) };\
                   g(1);";
    assert_eq!(run(source), "ERROR: type mismatch: INTEGER + BOOLEAN");
}

#[test]
fn unknown_operator_on_matching_non_integer_types() {
    assert_eq!(run("true + false"), "ERROR: unknown operator: BOOLEAN + BOOLEAN");
}

#[test]
fn boolean_equality_is_identity_based() {
    assert_eq!(run("true == true"), "true");
    assert_eq!(run("true != false"), "true");
}

#[test]
fn if_without_else_on_false_condition_is_null() {
    assert_eq!(run("if (false) { 1 }"), "null");
}
