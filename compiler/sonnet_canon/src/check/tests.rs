#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use sonnet_diagnostic::ErrorCode;
use sonnet_ir::canon::CanArena;
use sonnet_ir::{FileId, Span, StringInterner};

use crate::{check, lower_program, CheckOptions};

fn run(src: &str, strict: bool) -> Result<(), sonnet_diagnostic::Diagnostic> {
    let interner = StringInterner::new();
    let ast = sonnet_parse::parse(src, &interner).unwrap();
    let mut arena = CanArena::new();
    let root = lower_program(&ast, FileId::ROOT, &mut arena, &interner);
    check(
        &arena,
        root,
        &interner,
        CheckOptions {
            strict_variables: strict,
        },
    )
}

fn code(src: &str) -> ErrorCode {
    run(src, false).unwrap_err().code
}

#[test]
fn well_formed_programs_pass() {
    for src in [
        "{ a: 1, b: self.a, c: $.a }",
        "{ a: 1 } + { a: super.a + 1, b: 'a' in super }",
        "local f(x, y=x) = x + y; f(1)",
        "[x + y for x in [1] for y in [x] if x > 0]",
        "{ [k]: v for k in ['a'] for v in [k] }",
        "std.length([])",
    ] {
        assert_eq!(run(src, true), Ok(()), "{src}");
    }
}

#[test]
fn self_outside_object() {
    let err = run("local a = self; a", false).unwrap_err();
    assert_eq!(err.code, ErrorCode::E2005);
    assert_eq!(err.message, "can't use self outside of an object");
    assert_eq!(err.span, Span::new(10, 14));
}

#[test]
fn super_and_dollar_outside_object() {
    assert_eq!(code("super.x"), ErrorCode::E2005);
    assert_eq!(code("'x' in super"), ErrorCode::E2005);
    assert_eq!(code("$"), ErrorCode::E2005);
    assert_eq!(code("function(o) $.x"), ErrorCode::E2005);
}

#[test]
fn computed_field_names_are_outside_the_object() {
    assert_eq!(code("{ [self.k]: 1 }"), ErrorCode::E2005);
}

#[test]
fn duplicates() {
    assert_eq!(code("{ a: 1, 'a': 2 }"), ErrorCode::E2004);
    assert_eq!(code("local a = 1, a = 2; a"), ErrorCode::E2003);
    assert_eq!(code("function(x, x) x"), ErrorCode::E2002);
    assert_eq!(code("{ local l = 1, local l = 2, a: l }"), ErrorCode::E2003);
}

#[test]
fn same_name_in_separate_locals_is_shadowing() {
    assert_eq!(run("local a = 1; local a = 2; a", true), Ok(()));
}

#[test]
fn unbound_variables_only_in_strict_mode() {
    assert_eq!(run("{ a: 1, b: undefined_var }.a", false), Ok(()));
    let err = run("{ a: 1, b: undefined_var }.a", true).unwrap_err();
    assert_eq!(err.code, ErrorCode::E2001);
    assert_eq!(err.message, "Unknown variable: undefined_var");
}

#[test]
fn earliest_violation_wins() {
    let err = run("[function(y, y) y, self]", false).unwrap_err();
    assert_eq!(err.code, ErrorCode::E2002);
    let err = run("[self, function(y, y) y]", false).unwrap_err();
    assert_eq!(err.code, ErrorCode::E2005);
}

#[test]
fn comprehension_variables_do_not_leak() {
    let err = run("[[x for x in [1]], x]", true).unwrap_err();
    assert_eq!(err.code, ErrorCode::E2001);
}
