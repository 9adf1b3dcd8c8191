use pretty_assertions::assert_eq;
use sonnet_diagnostic::ErrorCode;
use sonnet_ir::Span;

use super::parse_err;

#[test]
fn missing_operand() {
    let err = parse_err("1 +");
    assert_eq!(err.code, ErrorCode::E1002);
    assert_eq!(err.message, "unexpected end of file while parsing terminal");
}

#[test]
fn trailing_tokens() {
    let err = parse_err("1 2");
    assert_eq!(err.code, ErrorCode::E1001);
    assert_eq!(err.message, "expected end of file, got number");
    assert_eq!(err.span, Span::new(2, 3));
}

#[test]
fn unclosed_brace() {
    assert_eq!(parse_err("{ a: 1").code, ErrorCode::E1003);
    assert_eq!(parse_err("[1, 2").code, ErrorCode::E1003);
}

#[test]
fn missing_separator_between_fields() {
    let err = parse_err("{ a: 1 b: 2 }");
    assert_eq!(err.code, ErrorCode::E1001);
    assert_eq!(err.message, "expected , or }, got identifier");
}

#[test]
fn computed_import() {
    assert_eq!(parse_err("import x").code, ErrorCode::E1006);
    assert_eq!(parse_err("import |||\n  a\n|||").code, ErrorCode::E1006);
}

#[test]
fn positional_after_named() {
    assert_eq!(parse_err("f(a=1, 2)").code, ErrorCode::E1007);
}

#[test]
fn plus_sugar_on_method() {
    let err = parse_err("{ f(x)+: x }");
    assert_eq!(err.code, ErrorCode::E1005);
    assert_eq!(err.message, "cannot use +: syntax sugar in a method");
}

#[test]
fn field_marker_required() {
    assert_eq!(parse_err("{ a = 1 }").code, ErrorCode::E1005);
}

#[test]
fn malformed_object_comprehensions() {
    assert_eq!(parse_err("{ a: 1 for x in xs }").code, ErrorCode::E1005);
    assert_eq!(parse_err("{ [x]: 1, [y]: 2 for x in xs }").code, ErrorCode::E1005);
    assert_eq!(parse_err("{ assert true, [x]: 1 for x in xs }").code, ErrorCode::E1005);
}

#[test]
fn comprehension_must_start_with_for() {
    assert_eq!(parse_err("[x for x in xs for]").code, ErrorCode::E1004);
}

#[test]
fn lexer_errors_keep_their_code() {
    let err = parse_err("local x = 'oops");
    assert_eq!(err.code, ErrorCode::E0001);
}

#[test]
fn local_needs_identifier() {
    let err = parse_err("local 1 = 2; 3");
    assert_eq!(err.code, ErrorCode::E1004);
}
