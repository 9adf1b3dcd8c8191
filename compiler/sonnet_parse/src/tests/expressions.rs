use pretty_assertions::assert_eq;

use super::sexp;

#[test]
fn literals() {
    assert_eq!(sexp("null"), "null");
    assert_eq!(sexp("'hi'"), "\"hi\"");
    assert_eq!(sexp("2.5"), "2.5");
}

#[test]
fn multiplicative_binds_tighter_than_additive() {
    assert_eq!(sexp("1 + 2 * 3"), "(+ 1 (* 2 3))");
    assert_eq!(sexp("(1 + 2) * 3"), "(* (+ 1 2) 3)");
}

#[test]
fn binary_operators_are_left_associative() {
    assert_eq!(sexp("1 - 2 - 3"), "(- (- 1 2) 3)");
    assert_eq!(sexp("a && b && c"), "(&& (&& a b) c)");
}

#[test]
fn full_precedence_ladder() {
    assert_eq!(
        sexp("a || b && c | d ^ e & f == g < h << i + j * k"),
        "(|| a (&& b (| c (^ d (& e (== f (< g (<< h (+ i (* j k))))))))))"
    );
}

#[test]
fn unary_binds_looser_than_postfix() {
    assert_eq!(sexp("-a.b"), "(-a.b)");
    assert_eq!(sexp("!a(1)"), "(!(call a 1))");
    assert_eq!(sexp("-x * 2"), "(* (-x) 2)");
}

#[test]
fn in_super_is_special() {
    assert_eq!(sexp("'f' in super"), "(in-super \"f\")");
    assert_eq!(sexp("'f' in o"), "(in \"f\" o)");
    assert_eq!(sexp("super.x + super['y']"), "(+ super.x super[\"y\"])");
}

#[test]
fn slices() {
    assert_eq!(sexp("a[1:2]"), "(slice a 1 2 _)");
    assert_eq!(sexp("a[:2]"), "(slice a _ 2 _)");
    assert_eq!(sexp("a[1:]"), "(slice a 1 _ _)");
    assert_eq!(sexp("a[::2]"), "(slice a _ _ 2)");
    assert_eq!(sexp("a[1::2]"), "(slice a 1 _ 2)");
    assert_eq!(sexp("a[1:3:2]"), "(slice a 1 3 2)");
    assert_eq!(sexp("a[i]"), "a[i]");
}

#[test]
fn calls_with_named_arguments() {
    assert_eq!(sexp("f(1, y=2)"), "(call f 1 y=2)");
    assert_eq!(sexp("f(x)(y) tailstrict"), "(call (call f x) y tailstrict)");
    assert_eq!(sexp("f(1,)"), "(call f 1)");
}

#[test]
fn local_with_methods() {
    assert_eq!(
        sexp("local a = 1, f(x, y=2) = x + y; f(a)"),
        "(local a=1 f/2=(+ x y) (call f a))"
    );
}

#[test]
fn keyword_forms_extend_right() {
    assert_eq!(sexp("1 + if c then 2 else 3 + 4"), "(+ 1 (if c 2 (+ 3 4)))");
    assert_eq!(sexp("function(x, y=1) x * y"), "(fn (x y?) (* x y))");
    assert_eq!(sexp("error 'boom' + x"), "(error (+ \"boom\" x))");
    assert_eq!(sexp("assert x : 'm'; y"), "(assert x \"m\" y)");
    assert_eq!(sexp("if a then b"), "(if a b)");
}

#[test]
fn imports() {
    assert_eq!(sexp("import 'lib.jsonnet'"), "(import \"lib.jsonnet\")");
    assert_eq!(sexp("importstr \"data.txt\""), "(importstr \"data.txt\")");
}

#[test]
fn arrays_and_comprehensions() {
    assert_eq!(sexp("[]"), "[]");
    assert_eq!(sexp("[1, 2,]"), "[1, 2]");
    assert_eq!(
        sexp("[x * 2 for x in xs if x > 1 for y in ys]"),
        "[arrcomp (* x 2) for x in xs if (> x 1) for y in ys]"
    );
    assert_eq!(sexp("[x, for x in xs]"), "[arrcomp x for x in xs]");
}

#[test]
fn brace_application() {
    assert_eq!(sexp("base { a: 1 }"), "(extend base {a: 1})");
}
