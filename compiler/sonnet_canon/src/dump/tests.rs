#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use sonnet_ir::canon::{CanArena, CanExpr};
use sonnet_ir::{FileId, StringInterner};

use crate::{dump, lower_program};

fn dumped(src: &str) -> String {
    let interner = StringInterner::new();
    let ast = sonnet_parse::parse(src, &interner).unwrap();
    let mut arena = CanArena::new();
    let root = lower_program(&ast, FileId::ROOT, &mut arena, &interner);
    let CanExpr::Local { body, .. } = arena.kind(root) else {
        panic!("program root is not the std wrapper");
    };
    dump(&arena, body, &interner)
}

#[test]
fn calls_with_named_arguments() {
    assert_eq!(
        dumped("f(1, y=2) tailstrict"),
        "apply tailstrict\n  var f\n  number 1\n  y =\n    number 2\n"
    );
}

#[test]
fn anonymous_function() {
    assert_eq!(dumped("function(x) x"), "function <anonymous>(x)\n  var x\n");
}

#[test]
fn hidden_and_forced_fields() {
    assert_eq!(
        dumped("[{ a:: 1, b::: 2 }]"),
        "array\n  object\n    field \"a\"::\n      local\n        $ =\n          self\n        in\n          number 1\n    field \"b\":::\n      local\n        $ =\n          self\n        in\n          number 2\n"
    );
}

#[test]
fn array_comprehension_with_filter() {
    assert_eq!(
        dumped("[x for x in xs if x]"),
        "array comprehension\n  var x\n  for x in\n    var xs\n  if\n    var x\n"
    );
}

#[test]
fn imports_and_errors() {
    assert_eq!(
        dumped("[import 'a.jsonnet', importstr 'b.txt', error 'e']"),
        "array\n  import \"a.jsonnet\"\n  importstr \"b.txt\"\n  error\n    string \"e\"\n"
    );
}
