use pretty_assertions::assert_eq;
use thorn_parser::parse;

#[test]
fn operator_precedence_round_trip_renders_fully_parenthesized() {
    let cases = [
        ("-a * b", "((-a) * b);"),
        ("!-a", "(!(-a));"),
        ("a + b + c", "((a + b) + c);"),
        ("a + b - c", "((a + b) - c);"),
        ("a * b * c", "((a * b) * c);"),
        ("a * b / c", "((a * b) / c);"),
        ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f);"),
        ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4));"),
        ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4));"),
        ("3 + 4 * 5 == 3 * 1 + 4 * 5", "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)));"),
        ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4);"),
        ("(5 + 5) * 2", "((5 + 5) * 2);"),
        ("2 / (5 + 5)", "(2 / (5 + 5));"),
        ("-(5 + 5)", "(-(5 + 5));"),
        ("!(true == true)", "(!(true == true));"),
        ("a + add(b * c) + d", "((a + add((b * c))) + d);"),
        (
            "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
            "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)));",
        ),
    ];

    for (input, expected) in cases {
        let (program, errors) = parse(input);
        assert!(errors.is_empty(), "unexpected parse errors for {input:?}: {errors:?}");
        assert_eq!(program.to_string(), expected, "input: {input}");
    }
}

#[test]
fn round_trip_reparse_is_structurally_equal() {
    let inputs = [
        "let x = 5 + 3 * 2;",
        "if (x < y) { x } else { y }",
        "let add = fn(a, b) { return a + b; }; add(1, 2);",
        "[1, 2 * 2, 3 + 3][1]",
    ];

    for input in inputs {
        let (program, errors) = parse(input);
        assert!(errors.is_empty(), "errors for {input:?}: {errors:?}");
        let rendered = program.to_string();
        let (reparsed, errors2) = parse(&rendered);
        assert!(errors2.is_empty(), "errors reparsing {rendered:?}: {errors2:?}");
        assert_eq!(program, reparsed, "round-trip mismatch for {input}");
    }
}

#[test]
fn let_and_return_statements() {
    let (program, errors) = parse("let x = 5; let y = 10; return x + y;");
    assert!(errors.is_empty());
    assert_eq!(program.statements.len(), 3);
}

#[test]
fn optional_semicolons_are_accepted() {
    let (program, errors) = parse("let x = 5 let y = 10");
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(program.statements.len(), 2);
}

#[test]
fn function_literal_and_call() {
    let (program, errors) = parse("fn(x, y) { x + y; }(1, 2)");
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(program.to_string(), "fn(x, y) { (x + y); }(1, 2);");
}

#[test]
fn no_prefix_parse_function_is_reported_and_recovers() {
    let (program, errors) = parse("let x = ; let y = 5;");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0], "no prefix parse function found for ;");
    // recovery continues past the bad statement to the next one
    assert_eq!(program.statements.len(), 1);
}

#[test]
fn expected_token_error_message_matches_contract() {
    let (_, errors) = parse("if (x < y { x }");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0], "expected next token to be ), got { instead");
}

#[test]
fn error_accumulation_is_capped_at_eight() {
    let bad = "+; ".repeat(20);
    let (_, errors) = parse(&bad);
    assert_eq!(errors.len(), thorn_parser::MAX_PARSE_ERRORS);
}

proptest::proptest! {
    #[test]
    fn parser_never_panics_on_arbitrary_input(s in ".{0,200}") {
        let _ = parse(&s);
    }
}
