use pretty_assertions::assert_eq;

use super::sexp;

#[test]
fn field_markers() {
    assert_eq!(
        sexp("{ a: 1, b:: 2, c::: 3, d+: 4, 'e f': 5, [k]: 6 }"),
        "{a: 1, b:: 2, c::: 3, d+: 4, \"e f\": 5, [k]: 6}"
    );
}

#[test]
fn members_of_every_kind() {
    assert_eq!(
        sexp("{ local x = 1, assert x > 0 : 'neg', f(a, b):: a + b, }"),
        "{local x, assert, f/2:: (+ a b)}"
    );
}

#[test]
fn empty_object() {
    assert_eq!(sexp("{}"), "{}");
}

#[test]
fn object_comprehension() {
    assert_eq!(
        sexp("{ local p = 'k', [p + x]: x for x in xs if x != 'z' }"),
        "{objcomp locals=1 (+ p x) x for x in xs if (!= x \"z\")}"
    );
}

#[test]
fn object_comprehension_with_trailing_local() {
    assert_eq!(
        sexp("{ [x]: y, local y = 1 for x in xs }"),
        "{objcomp locals=1 x y for x in xs}"
    );
}

#[test]
fn nested_self_and_dollar() {
    assert_eq!(sexp("{ a: self.b, c: $.d }"), "{a: self.b, c: $.d}");
}
