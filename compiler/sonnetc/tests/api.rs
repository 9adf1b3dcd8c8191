// Test code uses unwrap/expect for clarity - panics provide good test failure messages
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end tests of the library entry points, using real files.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use sonnet_diagnostic::Phase;
use sonnetc::{evaluate_file, evaluate_snippet, EvalConfig, TraceEntry};

fn snippet(source: &str) -> String {
    evaluate_snippet("test.jsonnet", source, &EvalConfig::default())
        .unwrap_or_else(|failure| panic!("{source}: {failure}"))
}

fn write(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn scalar_output_ends_with_newline() {
    assert_eq!(snippet("1 + 1"), "2\n");
    assert_eq!(snippet("'a' + 'b'"), "\"ab\"\n");
}

#[test]
fn multiline_layout() {
    assert_eq!(snippet("{a: 1} + {a: 2}"), "{\n   \"a\": 2\n}\n");
    assert_eq!(
        snippet("{a: [1, {}], b: []}"),
        "{\n   \"a\": [\n      1,\n      { }\n   ],\n   \"b\": [ ]\n}\n"
    );
}

#[test]
fn user_error_reports_position_and_trace() {
    let failure = evaluate_snippet("test.jsonnet", "error 'x'", &EvalConfig::default()).unwrap_err();
    assert_eq!(failure.phase, Phase::Runtime);
    assert_eq!(failure.message, "x");
    let rendered = failure.to_string();
    assert!(rendered.starts_with("test.jsonnet:1:1 RUNTIME ERROR: x"), "{rendered}");
    assert!(matches!(
        failure.trace.first(),
        Some(TraceEntry::Frame { position, .. }) if position.line == 1 && position.column == 1
    ));
}

#[test]
fn function_frames_are_named() {
    let failure = evaluate_snippet(
        "test.jsonnet",
        "local f(x) = error 'in f';\nf(1)",
        &EvalConfig::default(),
    )
    .unwrap_err();
    let rendered = failure.to_string();
    assert!(rendered.contains("\ttest.jsonnet:1:14\tfunction <f>"), "{rendered}");
    assert!(rendered.ends_with("\t$"), "{rendered}");
}

#[test]
fn compile_errors_carry_their_phase() {
    let parse = evaluate_snippet("test.jsonnet", "{", &EvalConfig::default()).unwrap_err();
    assert_eq!(parse.phase, Phase::Parse);
    assert!(parse.to_string().contains("PARSE ERROR"));
    assert!(parse.trace.is_empty());

    let strict = EvalConfig::default().with_strict_variables(true);
    let unbound = evaluate_snippet("test.jsonnet", "local a = 1; b", &strict).unwrap_err();
    assert_eq!(unbound.phase, Phase::Static);
    assert!(unbound.message.contains("b"));
}

#[test]
fn manifest_errors_carry_their_phase() {
    let failure = evaluate_snippet("test.jsonnet", "{f: function() 1}", &EvalConfig::default())
        .unwrap_err();
    assert_eq!(failure.phase, Phase::Manifest);
}

#[test]
fn stack_limit_is_configurable() {
    let source = "local f(n) = if n == 0 then 0 else 1 + f(n - 1); f(50)";
    assert_eq!(snippet(source), "50\n");
    let shallow = EvalConfig::default().with_max_stack(10);
    let failure = evaluate_snippet("test.jsonnet", source, &shallow).unwrap_err();
    assert!(failure.message.contains("max stack frames exceeded"));
}

#[test]
fn max_trace_elides_the_middle() {
    let source = "local f(n) = if n == 0 then error 'deep' else f(n - 1); f(30)";
    let config = EvalConfig::default().with_max_trace(6);
    let failure = evaluate_snippet("test.jsonnet", source, &config).unwrap_err();
    assert_eq!(failure.trace.len(), 7);
    assert!(matches!(failure.trace[3], TraceEntry::Elided { .. }));
    assert!(failure.to_string().contains("\n\t...\n"));
}

#[test]
fn external_variables() {
    let config = EvalConfig::default().with_external_var("env", "prod");
    assert_eq!(
        evaluate_snippet("test.jsonnet", "std.extVar('env')", &config).unwrap(),
        "\"prod\"\n"
    );
}

#[test]
fn debug_ast_renders_the_tree() {
    let config = EvalConfig::default().with_debug_ast(true);
    let dump = evaluate_snippet("test.jsonnet", "1 + 1", &config).unwrap();
    assert!(dump.contains("binary +"), "{dump}");
    assert!(dump.contains("number 1"), "{dump}");
}

#[test]
fn files_and_relative_imports() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "lib/util.libsonnet", "{ double(x):: 2 * x }");
    write(dir.path(), "lib/greeting.txt", "hi");
    write(
        dir.path(),
        "main.jsonnet",
        "local util = import 'lib/util.libsonnet';\n{ n: util.double(21), s: importstr 'lib/greeting.txt' }",
    );
    let json = evaluate_file(dir.path().join("main.jsonnet"), &EvalConfig::default()).unwrap();
    assert_eq!(json, "{\n   \"n\": 42,\n   \"s\": \"hi\"\n}\n");
}

#[test]
fn library_paths() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "vendor/shared.libsonnet", "{ name: 'shared' }");
    write(dir.path(), "app/main.jsonnet", "(import 'shared.libsonnet').name");

    let main = dir.path().join("app/main.jsonnet");
    let missing = evaluate_file(&main, &EvalConfig::default()).unwrap_err();
    assert!(missing.message.contains("couldn't open import \"shared.libsonnet\""), "{missing}");

    let config = EvalConfig::default().with_jpath(dir.path().join("vendor"));
    assert_eq!(evaluate_file(&main, &config).unwrap(), "\"shared\"\n");
}

#[test]
fn broken_import_reports_the_imported_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "bad.libsonnet", "{ a: }");
    write(dir.path(), "main.jsonnet", "import 'bad.libsonnet'");
    let failure = evaluate_file(dir.path().join("main.jsonnet"), &EvalConfig::default()).unwrap_err();
    assert_eq!(failure.phase, Phase::Parse);
    let position = failure.position.as_ref().unwrap();
    assert!(position.path.ends_with("bad.libsonnet"), "{failure}");
}

#[test]
fn unreadable_file() {
    let dir = tempfile::tempdir().unwrap();
    let failure = evaluate_file(dir.path().join("nope.jsonnet"), &EvalConfig::default()).unwrap_err();
    assert!(failure.message.starts_with("couldn't open"));
    assert!(failure.position.is_none());
}

#[test]
fn independent_evaluations_run_in_parallel() {
    let outputs: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                scope.spawn(move || {
                    let source = format!("std.foldl(function(a, b) a + b, std.range(1, {i}), 0)");
                    evaluate_snippet("test.jsonnet", &source, &EvalConfig::default()).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(outputs, vec!["0\n", "1\n", "3\n", "6\n"]);
}
