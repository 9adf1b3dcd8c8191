#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::lex_error::LexErrorKind;
use pretty_assertions::assert_eq;

fn scan(src: &str) -> Result<String, LexError> {
    let mut cursor = Cursor::new(src);
    cursor.advance_by(3);
    scan_text_block(&mut cursor, src, 0)
}

#[test]
fn strips_common_indent() {
    let src = "|||\n  foo\n    bar\n  baz\n|||";
    assert_eq!(scan(src).unwrap(), "foo\n  bar\nbaz\n");
}

#[test]
fn keeps_inner_blank_lines() {
    let src = "|||\n  a\n\n  b\n |||";
    assert_eq!(scan(src).unwrap(), "a\n\nb\n");
}

#[test]
fn chomped_block_drops_final_newline() {
    let src = "|||-\n  line\n|||";
    assert_eq!(scan(src).unwrap(), "line");
}

#[test]
fn requires_newline_after_opener() {
    let err = scan("||| foo\n|||").unwrap_err();
    assert!(matches!(err.kind, LexErrorKind::TextBlock { .. }));
}

#[test]
fn requires_indented_first_line() {
    let err = scan("|||\nfoo\n|||").unwrap_err();
    assert_eq!(
        err.kind,
        LexErrorKind::TextBlock {
            reason: "text block's first line must start with whitespace"
        }
    );
}

#[test]
fn requires_closing_delimiter() {
    let err = scan("|||\n  foo\nbar\n").unwrap_err();
    assert_eq!(
        err.kind,
        LexErrorKind::TextBlock {
            reason: "text block not terminated with |||"
        }
    );
}

#[test]
fn cursor_ends_after_closer() {
    let src = "|||\n  x\n||| + 1";
    let mut cursor = Cursor::new(src);
    cursor.advance_by(3);
    scan_text_block(&mut cursor, src, 0).unwrap();
    assert_eq!(&src[cursor.pos()..], " + 1");
}
