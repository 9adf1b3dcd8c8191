//! The tokenizer.
//!
//! [`Lexer`] is a lazy iterator over `Result<Token, LexError>`: tokens are
//! produced on demand, the stream ends after `Eof` or the first error, and
//! [`Lexer::restart`] rewinds to the beginning of the source.

use sonnet_ir::{Span, StrStyle, StringInterner, Token, TokenKind};

use crate::cursor::Cursor;
use crate::escape::{cook_quoted, cook_verbatim};
use crate::lex_error::{LexError, LexErrorKind};
use crate::text_block::scan_text_block;

pub struct Lexer<'src, 'i> {
    source: &'src str,
    cursor: Cursor<'src>,
    interner: &'i StringInterner,
    done: bool,
}

impl<'src, 'i> Lexer<'src, 'i> {
    pub fn new(source: &'src str, interner: &'i StringInterner) -> Self {
        Lexer {
            source,
            cursor: Cursor::new(source),
            interner,
            done: false,
        }
    }

    /// Rewind to the start of the source.
    pub fn restart(&mut self) {
        self.cursor.set_pos(0);
        self.done = false;
    }

    /// Produce the next token. At end of input this keeps returning `Eof`.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia()?;

        let start = self.cursor.pos();
        if self.cursor.is_eof() {
            return Ok(Token::new(TokenKind::Eof, self.span_from(start)));
        }

        let kind = match self.cursor.current() {
            b'{' => self.single(TokenKind::LBrace),
            b'}' => self.single(TokenKind::RBrace),
            b'[' => self.single(TokenKind::LBracket),
            b']' => self.single(TokenKind::RBracket),
            b'(' => self.single(TokenKind::LParen),
            b')' => self.single(TokenKind::RParen),
            b',' => self.single(TokenKind::Comma),
            b'.' => self.single(TokenKind::Dot),
            b';' => self.single(TokenKind::Semicolon),
            b'$' => self.single(TokenKind::Dollar),
            b'+' => self.single(TokenKind::Plus),
            b'-' => self.single(TokenKind::Minus),
            b'*' => self.single(TokenKind::Star),
            b'/' => self.single(TokenKind::Slash),
            b'%' => self.single(TokenKind::Percent),
            b'~' => self.single(TokenKind::Tilde),
            b'^' => self.single(TokenKind::Caret),
            b':' => self.longest(&[
                (b":::", TokenKind::TripleColon),
                (b"::", TokenKind::DoubleColon),
                (b":", TokenKind::Colon),
            ]),
            b'=' => self.longest(&[(b"==", TokenKind::EqEq), (b"=", TokenKind::Eq)]),
            b'!' => self.longest(&[(b"!=", TokenKind::NotEq), (b"!", TokenKind::Bang)]),
            b'<' => self.longest(&[
                (b"<<", TokenKind::Shl),
                (b"<=", TokenKind::LtEq),
                (b"<", TokenKind::Lt),
            ]),
            b'>' => self.longest(&[
                (b">>", TokenKind::Shr),
                (b">=", TokenKind::GtEq),
                (b">", TokenKind::Gt),
            ]),
            b'&' => self.longest(&[(b"&&", TokenKind::AmpAmp), (b"&", TokenKind::Amp)]),
            b'|' if self.cursor.starts_with(b"|||") => {
                self.cursor.advance_by(3);
                let text = scan_text_block(&mut self.cursor, self.source, start)?;
                TokenKind::Str(self.interner.intern(&text), StrStyle::Block)
            }
            b'|' => self.longest(&[(b"||", TokenKind::PipePipe), (b"|", TokenKind::Pipe)]),
            b'"' => self.quoted(start, b'"', StrStyle::Double)?,
            b'\'' => self.quoted(start, b'\'', StrStyle::Single)?,
            b'@' if self.cursor.peek(1) == b'"' => self.verbatim(start, b'"', StrStyle::VerbatimDouble)?,
            b'@' if self.cursor.peek(1) == b'\'' => {
                self.verbatim(start, b'\'', StrStyle::VerbatimSingle)?
            }
            b'0'..=b'9' => self.number(start)?,
            b if is_ident_start(b) => self.ident(start),
            _ => return Err(self.invalid_char(start)),
        };

        Ok(Token::new(kind, self.span_from(start)))
    }

    fn span_from(&self, start: usize) -> Span {
        Span::from_range(start..self.cursor.pos())
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.cursor.advance();
        kind
    }

    /// Pick the first candidate the input starts with; candidates are
    /// ordered longest first and the last one is always the current byte.
    fn longest(&mut self, candidates: &[(&[u8], TokenKind)]) -> TokenKind {
        for &(text, kind) in candidates {
            if self.cursor.starts_with(text) {
                self.cursor.advance_by(text.len());
                return kind;
            }
        }
        // Unreachable in practice: the single-byte candidate always matches.
        self.cursor.advance();
        candidates[candidates.len() - 1].1
    }

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            self.cursor.eat_whitespace();
            if self.cursor.current() == b'#' || self.cursor.starts_with(b"//") {
                self.cursor.eat_until_newline_or_eof();
            } else if self.cursor.starts_with(b"/*") {
                let start = self.cursor.pos();
                self.cursor.advance_by(2);
                if !self.cursor.eat_block_comment_body() {
                    return Err(LexError::new(
                        LexErrorKind::UnterminatedComment,
                        self.span_from(start),
                    ));
                }
            } else {
                return Ok(());
            }
        }
    }

    fn quoted(&mut self, start: usize, quote: u8, style: StrStyle) -> Result<TokenKind, LexError> {
        self.cursor.advance();
        if !self.cursor.eat_quoted_body(quote) {
            return Err(LexError::unterminated_string(self.span_from(start)));
        }
        let content = &self.source[start + 1..self.cursor.pos() - 1];
        let cooked = cook_quoted(content, (start + 1) as u32)?;
        Ok(TokenKind::Str(self.interner.intern(&cooked), style))
    }

    fn verbatim(&mut self, start: usize, quote: u8, style: StrStyle) -> Result<TokenKind, LexError> {
        self.cursor.advance_by(2);
        if !self.cursor.eat_verbatim_body(quote) {
            return Err(LexError::unterminated_string(self.span_from(start)));
        }
        let content = &self.source[start + 2..self.cursor.pos() - 1];
        let cooked = cook_verbatim(content, char::from(quote));
        Ok(TokenKind::Str(self.interner.intern(&cooked), style))
    }

    /// `0 | [1-9][0-9]*`, then an optional `.[0-9]+` and an optional
    /// `[eE][+-]?[0-9]+`.
    fn number(&mut self, start: usize) -> Result<TokenKind, LexError> {
        if self.cursor.current() == b'0' {
            self.cursor.advance();
            if self.cursor.current().is_ascii_digit() {
                self.cursor.advance();
                return Err(LexError::invalid_number(
                    self.span_from(start),
                    "leading zero is not allowed",
                ));
            }
        } else {
            self.cursor.eat_while(|b| b.is_ascii_digit());
        }

        if self.cursor.current() == b'.' {
            self.cursor.advance();
            if !self.cursor.current().is_ascii_digit() {
                return Err(LexError::invalid_number(
                    self.span_from(start),
                    "junk after decimal point",
                ));
            }
            self.cursor.eat_while(|b| b.is_ascii_digit());
        }

        if matches!(self.cursor.current(), b'e' | b'E') {
            self.cursor.advance();
            if matches!(self.cursor.current(), b'+' | b'-') {
                self.cursor.advance();
            }
            if !self.cursor.current().is_ascii_digit() {
                return Err(LexError::invalid_number(
                    self.span_from(start),
                    "junk after exponent marker",
                ));
            }
            self.cursor.eat_while(|b| b.is_ascii_digit());
        }

        let text = &self.source[start..self.cursor.pos()];
        text.parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| LexError::invalid_number(self.span_from(start), "not a valid number"))
    }

    fn ident(&mut self, start: usize) -> TokenKind {
        self.cursor.eat_while(is_ident_continue);
        let text = &self.source[start..self.cursor.pos()];
        TokenKind::keyword(text).unwrap_or_else(|| TokenKind::Ident(self.interner.intern(text)))
    }

    fn invalid_char(&mut self, start: usize) -> LexError {
        let ch = self.source[start..].chars().next().unwrap_or('\0');
        self.cursor.advance_by(ch.len_utf8());
        LexError::invalid_char(self.span_from(start), ch)
    }
}

impl Iterator for Lexer<'_, '_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.next_token();
        self.done = matches!(result, Err(_) | Ok(Token { kind: TokenKind::Eof, .. }));
        Some(result)
    }
}

#[inline]
fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

#[inline]
fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Lex a whole source into a token vector ending in `Eof`.
pub fn lex(source: &str, interner: &StringInterner) -> Result<Vec<Token>, LexError> {
    Lexer::new(source, interner).collect()
}
