use super::*;
use pretty_assertions::assert_eq;

#[test]
fn locate_renders_path_line_col() {
    let mut map = SourceMap::new();
    let id = map.add(SourceFile::new("main.jsonnet", "{\n  a: error 'x',\n}"));
    let location = map.locate(id, Span::new(7, 16));
    assert_eq!(location.to_string(), "main.jsonnet:2:6");
}

#[test]
fn files_get_sequential_ids() {
    let mut map = SourceMap::new();
    let first = map.add(SourceFile::new("a", ""));
    let second = map.add(SourceFile::new("b", ""));
    assert_eq!(first, FileId::ROOT);
    assert_eq!(second, FileId::new(1));
    assert_eq!(map.len(), 2);
}

#[test]
fn unknown_file_does_not_fail() {
    let map = SourceMap::new();
    assert_eq!(map.locate(FileId::new(9), Span::DUMMY).line, 0);
}
