use super::*;

#[test]
fn single_line_offsets() {
    let source = "hello world";
    let table = LineOffsetTable::build(source);
    assert_eq!(table.offset_to_line_col(source, 0), (1, 1));
    assert_eq!(table.offset_to_line_col(source, 6), (1, 7));
    assert_eq!(table.line_count(), 1);
}

#[test]
fn multi_line_offsets() {
    let source = "abc\ndefgh\nij";
    let table = LineOffsetTable::build(source);
    assert_eq!(table.offset_to_line_col(source, 2), (1, 3));
    assert_eq!(table.offset_to_line_col(source, 3), (1, 4)); // the '\n'
    assert_eq!(table.offset_to_line_col(source, 4), (2, 1));
    assert_eq!(table.offset_to_line_col(source, 7), (2, 4));
    assert_eq!(table.offset_to_line_col(source, 10), (3, 1));
}

#[test]
fn columns_count_characters_not_bytes() {
    let source = "\"é\" + x";
    let table = LineOffsetTable::build(source);
    // 'x' is at byte 7 but character 6
    assert_eq!(table.offset_to_line_col(source, 7), (1, 7));
}

#[test]
fn offset_past_end_clamps() {
    let source = "ab";
    let table = LineOffsetTable::build(source);
    assert_eq!(table.offset_to_line_col(source, 50), (1, 3));
}
