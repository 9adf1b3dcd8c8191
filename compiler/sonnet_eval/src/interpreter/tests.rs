#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::Cell;
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rustc_hash::FxHashMap;

use super::*;
use crate::errors::{EvalErrorKind, TraceLine};
use crate::import::{ImportError, ResolvedImport};
use crate::manifest::{escape_string, format_number};

fn run_with(options: EvalOptions, source: &str) -> Result<String, EvalError> {
    let mut interp = Interpreter::new(options);
    let root = interp
        .compile("test.jsonnet", Rc::from(source))
        .expect("test program should compile");
    interp.evaluate_to_json(root)
}

fn run(source: &str) -> Result<String, EvalError> {
    run_with(EvalOptions::default(), source)
}

fn ok(source: &str) -> String {
    run(source).unwrap_or_else(|err| panic!("{source}: {err}"))
}

fn fails(source: &str) -> EvalError {
    match run(source) {
        Ok(json) => panic!("{source}: expected an error, got {json}"),
        Err(err) => err,
    }
}

#[test]
fn scalars_and_layout() {
    assert_eq!(ok("1 + 1"), "2\n");
    assert_eq!(ok("'a' + 1"), "\"a1\"\n");
    assert_eq!(ok("{a: 1} + {a: 2}"), "{\n   \"a\": 2\n}\n");
    assert_eq!(ok("[]"), "[ ]\n");
    assert_eq!(ok("{}"), "{ }\n");
    assert_eq!(
        ok("{a: [1, {b: null}], c: 'x'}"),
        "{\n   \"a\": [\n      1,\n      {\n         \"b\": null\n      }\n   ],\n   \"c\": \"x\"\n}\n"
    );
}

#[test]
fn merge_overrides_and_keeps_order() {
    assert_eq!(
        ok("{a: 1, b: 2} + {b: 3}"),
        "{\n   \"a\": 1,\n   \"b\": 3\n}\n"
    );
    assert_eq!(
        ok("{b: 1} + {a: 2, b: 3}"),
        "{\n   \"b\": 3,\n   \"a\": 2\n}\n"
    );
}

#[test]
fn super_and_late_bound_self() {
    assert_eq!(ok("({a: 1} + {a: super.a + 1}).a"), "2\n");
    assert_eq!(ok("({a: 1} + {a: super.a * 10} + {a: super.a + 1}).a"), "11\n");
    assert_eq!(ok("({a: self.b, b: 1} + {b: 2}).a"), "2\n");
    assert_eq!(ok("({a: 1} + {b: 'a' in super, c: 'z' in super})"), "{\n   \"a\": 1,\n   \"b\": true,\n   \"c\": false\n}\n");
    assert_eq!(ok("{a: 1} + {a+: 2}"), "{\n   \"a\": 3\n}\n");
}

#[test]
fn computed_plus_field_ignores_object_locals() {
    assert_eq!(
        ok("local k = 'a'; {a: 1} + {local k = 'b', [k]+: 2}"),
        "{\n   \"a\": 3\n}\n"
    );
    assert_eq!(
        ok("{a: 1} + {local x = 'b', [x]+: 2 for x in ['a']}"),
        "{\n   \"a\": 3\n}\n"
    );
    assert_eq!(
        ok("local n = 0; {a1: [1]} + {[std.format('a%d', n + 1)]+: [2], b: n}"),
        "{\n   \"a1\": [\n      1,\n      2\n   ],\n   \"b\": 0\n}\n"
    );
}

#[test]
fn visibility_of_merged_fields() {
    assert_eq!(ok("{a:: 1} + {a: 2}"), "{ }\n");
    assert_eq!(ok("{a:: 1} + {a::: 2}"), "{\n   \"a\": 2\n}\n");
    assert_eq!(ok("'a' in {a:: 1}"), "true\n");
    assert_eq!(ok("({a:: 1} + {a: 2}).a"), "2\n");
}

#[test]
fn unused_fields_and_locals_are_never_forced() {
    assert_eq!(ok("{a: 1, b: undefined_var}.a"), "1\n");
    assert_eq!(ok("local x = error 'never'; 5"), "5\n");
    assert_eq!(ok("[error 'no', 2][1]"), "2\n");
    assert_eq!(ok("local f(a, b) = a; f(1, error 'unused')"), "1\n");
}

#[test]
fn recursive_locals() {
    assert_eq!(ok("local x = {a: 1, b: x.a + 1}; x.b"), "2\n");
    assert_eq!(
        ok("local fib(n) = if n < 2 then n else fib(n - 1) + fib(n - 2); fib(15)"),
        "610\n"
    );
    assert_eq!(ok("local a = b + 1, b = 1; a"), "2\n");
    let err = fails("local x = x + 1; x");
    assert!(matches!(err.kind, EvalErrorKind::InfiniteRecursion), "{err}");
}

#[test]
fn function_arguments() {
    assert_eq!(ok("local f(a, b=a + 1) = b; f(1)"), "2\n");
    assert_eq!(ok("local f(a, b) = a - b; f(b=1, a=3)"), "2\n");
    assert!(matches!(
        fails("local f(a) = a; f(1, 2)").kind,
        EvalErrorKind::TooManyArgs { params: 1, got: 2 }
    ));
    assert!(matches!(
        fails("local f(a) = a; f(b=1)").kind,
        EvalErrorKind::UnknownParameter { .. }
    ));
    assert!(matches!(
        fails("local f(a) = a; f(1, a=2)").kind,
        EvalErrorKind::ParameterBoundTwice { .. }
    ));
    assert!(matches!(
        fails("local f(a, b) = a; f(1)").kind,
        EvalErrorKind::MissingArgument { .. }
    ));
    assert!(matches!(fails("local x = 1; x(2)").kind, EvalErrorKind::NotCallable { .. }));
}

#[test]
fn comprehensions() {
    assert_eq!(
        ok("[x * y for x in [1, 2] for y in [10, 20] if x * y != 20]"),
        "[\n   10,\n   40\n]\n"
    );
    assert_eq!(
        ok("{[k]: std.length(k) for k in ['a', 'bb']}"),
        "{\n   \"a\": 1,\n   \"bb\": 2\n}\n"
    );
    assert_eq!(ok("{[if k == 'b' then null else k]: 1 for k in ['a', 'b']}"), "{\n   \"a\": 1\n}\n");
    assert!(matches!(
        fails("{[k]: 1 for k in ['a', 'a']}").kind,
        EvalErrorKind::DuplicateField { .. }
    ));
    assert!(matches!(fails("[x for x in 1]").kind, EvalErrorKind::TypeMismatch { .. }));
}

#[test]
fn operators() {
    assert_eq!(ok("[1, 2] < [1, 3]"), "true\n");
    assert_eq!(ok("'abc' < 'abd'"), "true\n");
    assert_eq!(ok("[1, 2] + [3]"), "[\n   1,\n   2,\n   3\n]\n");
    assert_eq!(ok("1 << 4 | 1"), "17\n");
    assert_eq!(ok("{a: [1]} == {a: [1]}"), "true\n");
    assert_eq!(ok("1 == '1'"), "false\n");
    assert_eq!(ok("true && false || true"), "true\n");
    assert_eq!(ok("false && error 'short-circuit'"), "false\n");
    assert!(matches!(fails("1 / 0").kind, EvalErrorKind::DivisionByZero));
    assert!(matches!(fails("1e308 * 10").kind, EvalErrorKind::Overflow));
    assert!(matches!(
        fails("{} - 1").kind,
        EvalErrorKind::BinaryTypeMismatch { .. }
    ));
    assert!(matches!(
        fails("local f = function() 1; f == f").kind,
        EvalErrorKind::FunctionComparison
    ));
}

#[test]
fn indexing() {
    assert_eq!(ok("[1, 2, 3][1]"), "2\n");
    assert_eq!(ok("'héllo'[1]"), "\"é\"\n");
    assert!(matches!(fails("[1][3]").kind, EvalErrorKind::IndexOutOfBounds { index: 3, len: 1 }));
    assert!(matches!(fails("{a: 1}.b").kind, EvalErrorKind::NoSuchField { .. }));
    assert!(matches!(fails("local o = {}; o.x").kind, EvalErrorKind::NoSuchField { .. }));
}

#[test]
fn object_asserts_run_before_first_access() {
    let err = fails("{assert self.a > 0 : 'a must be positive', a: 0}.a");
    assert_eq!(err.message, "a must be positive");
    assert_eq!(ok("{assert self.a > 0, a: 1}.a"), "1\n");
    let err = fails("{assert false : 'hidden', a:: 1}");
    assert_eq!(err.message, "hidden");
}

#[test]
fn error_values() {
    let err = fails("error 'boom'");
    assert!(matches!(err.kind, EvalErrorKind::User { .. }));
    assert_eq!(err.message, "boom");
    let err = fails("error {a: 1}");
    assert_eq!(err.message, "{\"a\": 1}");
}

#[test]
fn error_values_survive_collection() {
    let options = EvalOptions {
        gc: GcPolicy {
            min_objects: 0,
            growth_trigger: 0.0,
        },
        ..EvalOptions::default()
    };
    let err = run_with(options, "error [1, [2], 'x']").unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::User { .. }), "{err}");
    assert_eq!(err.message, "[1, [2], \"x\"]");
}

#[test]
fn deeply_nested_values_do_not_exhaust_the_stack() {
    let source = "local deep = std.foldl(function(acc, x) [acc], std.range(1, 20000), []);\n\
                  [deep == deep, deep <= deep, std.length(std.toString(deep))]";
    assert_eq!(ok(source), "[\n   true,\n   true,\n   40003\n]\n");
}

#[test]
fn trace_starts_at_the_error() {
    let source = "local f(x) = error 'boom: ' + x;\nf('a')";
    let err = fails(source);
    let (_, span) = err.location.expect("located");
    assert_eq!(span.start, source.find("error").unwrap() as u32);

    let trace = err.trace.expect("trace");
    let names: Vec<&str> = trace
        .lines()
        .iter()
        .map(|line| match line {
            TraceLine::Frame { name, .. } => name.as_str(),
            TraceLine::Elided { .. } => "...",
        })
        .collect();
    assert_eq!(names, ["function <f>", "$"]);
    assert!(matches!(&trace.lines()[0], TraceLine::Frame { span, .. } if span.start == 13));
}

#[test]
fn long_traces_are_truncated() {
    let options = EvalOptions {
        max_trace: 4,
        ..EvalOptions::default()
    };
    let err = run_with(
        options,
        "local f(n) = if n == 0 then error 'bottom' else f(n - 1); f(20)",
    )
    .unwrap_err();
    let trace = err.trace.expect("trace");
    assert_eq!(trace.len(), 5);
    assert!(matches!(trace.lines()[2], TraceLine::Elided { .. }));
}

#[test]
fn stack_overflow_is_an_error() {
    let options = EvalOptions {
        max_stack: 50,
        ..EvalOptions::default()
    };
    let err = run_with(options, "local f(n) = f(n + 1); f(0)").unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::StackOverflow));
    assert_eq!(err.message, "max stack frames exceeded.");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn deep_recursion_overflows_for_any_limit(max_stack in 1usize..64) {
        let options = EvalOptions { max_stack, ..EvalOptions::default() };
        let err = run_with(options, "local f(n) = f(n + 1) + 1; f(0)").unwrap_err();
        prop_assert!(matches!(err.kind, EvalErrorKind::StackOverflow));
    }
}

#[test]
fn collector_runs_under_pressure() {
    let options = EvalOptions {
        gc: GcPolicy {
            min_objects: 50,
            growth_trigger: 1.5,
        },
        ..EvalOptions::default()
    };
    let mut interp = Interpreter::new(options);
    let root = interp
        .compile(
            "gc.jsonnet",
            Rc::from(
                "local xs = std.foldl(function(acc, i) acc + [{v: i, sq: i * i}], std.range(1, 300), []);\n\
                 {n: std.length(xs), last: xs[299].sq, sum: std.foldl(function(a, x) a + x.v, xs, 0)}",
            ),
        )
        .unwrap();
    let json = interp.evaluate_to_json(root).unwrap();
    assert_eq!(
        json,
        "{\n   \"n\": 300,\n   \"last\": 90000,\n   \"sum\": 45150\n}\n"
    );
    assert!(interp.heap().collections() > 0);
    assert!(interp.heap().total_freed() > 0);
}

#[test]
fn manifested_output_reads_back_equal() {
    let source = "{a: [1, 2.5, 'x\\ny'], b: {c: null, d: true}, e: -0.125, f: 'ü'}";
    let first = ok(source);
    let second = ok(&first);
    assert_eq!(first, second);
}

/// A function-free value, rendered as program text.
#[derive(Clone, Debug)]
enum Json {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Array(Vec<Json>),
    Object(BTreeMap<String, Json>),
}

impl Json {
    fn source(&self, out: &mut String) {
        match self {
            Json::Null => out.push_str("null"),
            Json::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Json::Number(n) => out.push_str(&format!("({})", format_number(*n))),
            Json::Str(text) => out.push_str(&escape_string(text)),
            Json::Array(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.source(out);
                }
                out.push(']');
            }
            Json::Object(fields) => {
                out.push('{');
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&escape_string(name));
                    out.push_str(": ");
                    value.source(out);
                }
                out.push('}');
            }
        }
    }
}

fn json_value() -> impl Strategy<Value = Json> {
    let leaf = prop_oneof![
        Just(Json::Null),
        any::<bool>().prop_map(Json::Bool),
        any::<i32>().prop_map(|n| Json::Number(f64::from(n))),
        (-1.0e9f64..1.0e9).prop_map(Json::Number),
        r#"[a-z "\\\n\té\x01]{0,6}"#.prop_map(Json::Str),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Json::Array),
            prop::collection::btree_map("[a-z]{1,3}", inner, 0..4).prop_map(Json::Object),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn manifested_values_read_back_equal(value in json_value()) {
        let mut source = String::new();
        value.source(&mut source);
        let manifested = ok(&source);
        let check = format!("local original = {source};\nlocal back = {manifested};\noriginal == back");
        prop_assert_eq!(ok(&check), "true\n");
        prop_assert_eq!(ok(&manifested), manifested.clone());
    }
}

/// In-memory resolver counting its calls.
struct MapResolver {
    files: FxHashMap<String, String>,
    calls: Rc<Cell<usize>>,
}

impl ImportResolver for MapResolver {
    fn resolve(&mut self, _importing_file: &Path, literal: &str) -> Result<ResolvedImport, ImportError> {
        self.calls.set(self.calls.get() + 1);
        match self.files.get(literal) {
            Some(contents) => Ok(ResolvedImport {
                path: PathBuf::from(literal),
                contents: contents.clone(),
            }),
            None => Err(ImportError::NotFound {
                searched: vec![PathBuf::from(literal)],
            }),
        }
    }
}

fn with_files(files: &[(&str, &str)]) -> (Interpreter, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let resolver = MapResolver {
        files: files
            .iter()
            .map(|(path, text)| ((*path).to_string(), (*text).to_string()))
            .collect(),
        calls: Rc::clone(&calls),
    };
    (
        Interpreter::with_resolver(EvalOptions::default(), Box::new(resolver)),
        calls,
    )
}

#[test]
fn imports_resolve_and_evaluate_once() {
    let (mut interp, calls) = with_files(&[("lib.libsonnet", "{x: 1, file: std.thisFile}")]);
    let root = interp
        .compile(
            "main.jsonnet",
            Rc::from("local a = import 'lib.libsonnet'; local b = import 'lib.libsonnet'; [a.x, b.x, a == b, a.file]"),
        )
        .unwrap();
    let json = interp.evaluate_to_json(root).unwrap();
    assert_eq!(json, "[\n   1,\n   1,\n   true,\n   \"lib.libsonnet\"\n]\n");
    assert_eq!(calls.get(), 1);
}

#[test]
fn importstr_yields_contents() {
    let (mut interp, calls) = with_files(&[("data.txt", "hello\n")]);
    let root = interp
        .compile("main.jsonnet", Rc::from("[importstr 'data.txt', importstr 'data.txt']"))
        .unwrap();
    assert_eq!(
        interp.evaluate_to_json(root).unwrap(),
        "[\n   \"hello\\n\",\n   \"hello\\n\"\n]\n"
    );
    assert_eq!(calls.get(), 1);
}

#[test]
fn import_failures() {
    let (mut interp, _) = with_files(&[("bad.libsonnet", "{a: }")]);
    let root = interp
        .compile("main.jsonnet", Rc::from("import 'missing.libsonnet'"))
        .unwrap();
    let err = interp.evaluate(root).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::ImportNotFound { .. }), "{err}");

    let root = interp
        .compile("other.jsonnet", Rc::from("import 'bad.libsonnet'"))
        .unwrap();
    let err = interp.evaluate(root).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::ImportCompile(_)), "{err}");
}

#[test]
fn strict_variables_reject_unbound_names_up_front() {
    let mut interp = Interpreter::new(EvalOptions {
        strict_variables: true,
        ..EvalOptions::default()
    });
    assert!(interp
        .compile("strict.jsonnet", Rc::from("{a: 1, b: nope}.a"))
        .is_err());
}
