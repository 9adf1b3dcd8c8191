//! Escape cooking for quoted and verbatim string literals.
//!
//! Quoted strings (`"..."`, `'...'`) accept the JSON escape set plus `\'`:
//! `\"` `\'` `\\` `\/` `\b` `\f` `\n` `\r` `\t` `\uXXXX`. A `\u` high
//! surrogate must be followed by a `\u` low surrogate.
//!
//! Verbatim strings (`@"..."`, `@'...'`) have no escapes except the doubled
//! quote character.

use std::borrow::Cow;

use sonnet_ir::Span;

use crate::lex_error::{LexError, LexErrorKind};

/// Cook the content between the quotes of a quoted string.
///
/// `base` is the byte offset of `content` in the source, used for error
/// spans. Content without backslashes is borrowed unchanged.
pub(crate) fn cook_quoted(content: &str, base: u32) -> Result<Cow<'_, str>, LexError> {
    if !content.contains('\\') {
        return Ok(Cow::Borrowed(content));
    }

    let mut out = String::with_capacity(content.len());
    let mut chars = content.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let esc_span = |len: usize| Span::new(base + i as u32, base + (i + len) as u32);
        let Some((_, esc)) = chars.next() else {
            // The scanner never ends string content on a lone backslash.
            return Err(LexError::invalid_escape(esc_span(1), ""));
        };
        match esc {
            '"' => out.push('"'),
            '\'' => out.push('\''),
            '\\' => out.push('\\'),
            '/' => out.push('/'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'u' => {
                let rest = &content[i + 2..];
                let high = hex4(rest).ok_or_else(|| unicode_error(esc_span(2)))?;
                for _ in 0..4 {
                    chars.next();
                }
                let code = if (0xD800..0xDC00).contains(&high) {
                    let tail = &content[i + 6..];
                    let low = tail
                        .strip_prefix("\\u")
                        .and_then(hex4)
                        .filter(|low| (0xDC00..0xE000).contains(low))
                        .ok_or_else(|| unicode_error(esc_span(6)))?;
                    for _ in 0..6 {
                        chars.next();
                    }
                    0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                } else {
                    high
                };
                let ch = char::from_u32(code).ok_or_else(|| unicode_error(esc_span(6)))?;
                out.push(ch);
            }
            other => {
                return Err(LexError::invalid_escape(
                    esc_span(1 + other.len_utf8()),
                    other.to_string(),
                ))
            }
        }
    }

    Ok(Cow::Owned(out))
}

/// Cook the content of a verbatim string: doubled `quote` becomes one.
pub(crate) fn cook_verbatim(content: &str, quote: char) -> Cow<'_, str> {
    let doubled: &str = if quote == '"' { "\"\"" } else { "''" };
    if content.contains(doubled) {
        Cow::Owned(content.replace(doubled, &doubled[..1]))
    } else {
        Cow::Borrowed(content)
    }
}

fn hex4(s: &str) -> Option<u32> {
    let digits = s.get(..4)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

fn unicode_error(span: Span) -> LexError {
    LexError::new(LexErrorKind::InvalidUnicodeEscape, span)
}
