#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn candidates_start_at_importing_directory() {
    let resolver = FileResolver::new(vec![PathBuf::from("/lib/a"), PathBuf::from("/lib/b")]);
    let candidates = resolver.candidates(Path::new("/project/main.jsonnet"), "util.libsonnet");
    assert_eq!(
        candidates,
        vec![
            PathBuf::from("/project/util.libsonnet"),
            PathBuf::from("/lib/a/util.libsonnet"),
            PathBuf::from("/lib/b/util.libsonnet"),
        ]
    );
}

#[test]
fn absolute_literals_skip_search() {
    let resolver = FileResolver::new(vec![PathBuf::from("/lib")]);
    let candidates = resolver.candidates(Path::new("main.jsonnet"), "/etc/conf.jsonnet");
    assert_eq!(candidates, vec![PathBuf::from("/etc/conf.jsonnet")]);
}

#[test]
fn snippets_resolve_against_working_directory() {
    let resolver = FileResolver::default();
    let candidates = resolver.candidates(Path::new("snippet.jsonnet"), "x.json");
    assert_eq!(candidates, vec![PathBuf::from("x.json")]);
}

#[test]
fn resolves_from_library_path() {
    let project = tempfile::tempdir().unwrap();
    let library = tempfile::tempdir().unwrap();
    std::fs::write(library.path().join("lib.libsonnet"), "{ a: 1 }").unwrap();

    let mut resolver = FileResolver::new(vec![library.path().to_path_buf()]);
    let importing = project.path().join("main.jsonnet");
    let resolved = resolver.resolve(&importing, "lib.libsonnet").unwrap();
    assert_eq!(resolved.path, library.path().join("lib.libsonnet"));
    assert_eq!(resolved.contents, "{ a: 1 }");
}

#[test]
fn local_file_shadows_library() {
    let project = tempfile::tempdir().unwrap();
    let library = tempfile::tempdir().unwrap();
    std::fs::write(project.path().join("x.txt"), "local").unwrap();
    std::fs::write(library.path().join("x.txt"), "library").unwrap();

    let mut resolver = FileResolver::new(vec![library.path().to_path_buf()]);
    let resolved = resolver
        .resolve(&project.path().join("main.jsonnet"), "x.txt")
        .unwrap();
    assert_eq!(resolved.contents, "local");
}

#[test]
fn missing_import_lists_searched_paths() {
    let project = tempfile::tempdir().unwrap();
    let mut resolver = FileResolver::default();
    let err = resolver
        .resolve(&project.path().join("main.jsonnet"), "nope.jsonnet")
        .unwrap_err();
    let ImportError::NotFound { searched } = &err else {
        panic!("expected NotFound, got {err:?}");
    };
    assert_eq!(searched, &vec![project.path().join("nope.jsonnet")]);
    assert!(err.to_string().contains("nope.jsonnet"));
}
