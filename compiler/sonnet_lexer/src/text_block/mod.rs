//! `|||` text blocks.
//!
//! ```text
//! |||
//!   first line
//!     indented more
//!   last line
//! |||
//! ```
//!
//! The opening `|||` (or `|||-`) must be followed by a newline. The
//! whitespace prefix of the first non-empty line is the block's indent;
//! every content line must start with exactly that prefix, which is
//! stripped. Empty lines are kept as bare newlines. The first line that
//! does not carry the prefix must be the closing `|||`. Each content line
//! keeps its newline; `|||-` drops the final one.

use sonnet_ir::Span;

use crate::cursor::Cursor;
use crate::lex_error::LexError;

/// Scan a text block whose opening `|||` starts at `start`; the cursor is
/// positioned just after the opening delimiter.
pub(crate) fn scan_text_block(cursor: &mut Cursor<'_>, source: &str, start: usize) -> Result<String, LexError> {
    let chomp = cursor.current() == b'-';
    if chomp {
        cursor.advance();
    }

    let err = |cursor: &Cursor<'_>, reason| {
        LexError::text_block(Span::from_range(start..cursor.pos()), reason)
    };

    cursor.eat_horizontal_whitespace();
    if cursor.current() == b'\r' {
        cursor.advance();
    }
    if cursor.current() != b'\n' {
        return Err(err(cursor, "text block syntax requires new line after |||"));
    }
    cursor.advance();

    let mut out = String::new();
    eat_blank_lines(cursor, &mut out);

    let indent_start = cursor.pos();
    cursor.eat_horizontal_whitespace();
    let indent = &source.as_bytes()[indent_start..cursor.pos()];
    if indent.is_empty() {
        return Err(err(cursor, "text block's first line must start with whitespace"));
    }
    cursor.set_pos(indent_start);

    loop {
        if cursor.starts_with(indent) {
            cursor.advance_by(indent.len());
            let line_start = cursor.pos();
            cursor.eat_until_newline_or_eof();
            if cursor.is_eof() {
                return Err(err(cursor, "unexpected end of file in text block"));
            }
            cursor.advance();
            out.push_str(&source[line_start..cursor.pos()]);
            eat_blank_lines(cursor, &mut out);
        } else {
            cursor.eat_horizontal_whitespace();
            if !cursor.starts_with(b"|||") {
                return Err(err(cursor, "text block not terminated with |||"));
            }
            cursor.advance_by(3);
            break;
        }
    }

    if chomp && out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}

fn eat_blank_lines(cursor: &mut Cursor<'_>, out: &mut String) {
    loop {
        if cursor.current() == b'\n' {
            cursor.advance();
        } else if cursor.current() == b'\r' && cursor.peek(1) == b'\n' {
            cursor.advance_by(2);
        } else {
            return;
        }
        out.push('\n');
    }
}

#[cfg(test)]
mod tests;
