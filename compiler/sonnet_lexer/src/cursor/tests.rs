use super::*;

#[test]
fn peek_past_end_is_zero() {
    let cursor = Cursor::new("ab");
    assert_eq!(cursor.peek(0), b'a');
    assert_eq!(cursor.peek(1), b'b');
    assert_eq!(cursor.peek(2), 0);
}

#[test]
fn line_comment_scan_stops_at_newline() {
    let mut cursor = Cursor::new("// note\nx");
    cursor.eat_until_newline_or_eof();
    assert_eq!(cursor.current(), b'\n');
    assert_eq!(cursor.pos(), 7);
}

#[test]
fn block_comment_scan_consumes_terminator() {
    let mut cursor = Cursor::new("/* a * b */x");
    cursor.advance_by(2);
    assert!(cursor.eat_block_comment_body());
    assert_eq!(cursor.current(), b'x');
}

#[test]
fn unterminated_block_comment_reports_false() {
    let mut cursor = Cursor::new("/* never closed");
    cursor.advance_by(2);
    assert!(!cursor.eat_block_comment_body());
    assert!(cursor.is_eof());
}

#[test]
fn quoted_body_skips_escaped_quote() {
    let src = r#""a\"b" rest"#;
    let mut cursor = Cursor::new(src);
    cursor.advance();
    assert!(cursor.eat_quoted_body(b'"'));
    assert_eq!(&src[cursor.pos()..], " rest");
}

#[test]
fn verbatim_body_skips_doubled_quote() {
    let src = r#"@"a""b\" rest"#;
    let mut cursor = Cursor::new(src);
    cursor.advance_by(2);
    assert!(cursor.eat_verbatim_body(b'"'));
    assert_eq!(&src[cursor.pos()..], " rest");
}

#[test]
fn unterminated_quoted_body() {
    let mut cursor = Cursor::new(r#""abc\"#);
    cursor.advance();
    assert!(!cursor.eat_quoted_body(b'"'));
    assert!(cursor.is_eof());
}
