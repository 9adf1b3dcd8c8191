//! Recursive descent parser for Jsonnet.
//!
//! Produces the surface tree in `sonnet_ir::ast`. Sugar is preserved
//! (`a.b`, method fields, `+:`, slices, `a {}`); removing it is the job of
//! `sonnet_canon`.
//!
//! The grammar is expression-only: a program is a single expression
//! followed by end of file.

mod cursor;
mod error;
mod grammar;

pub use cursor::Cursor;
pub use error::ParseError;

use sonnet_diagnostic::Diagnostic;
use sonnet_ir::ast::Expr;
use sonnet_ir::{FileId, Span, StringInterner, Token, TokenKind};
use tracing::debug;

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
        }
    }

    #[inline]
    fn current_kind(&self) -> TokenKind {
        self.cursor.current_kind()
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    #[inline]
    fn previous_span(&self) -> Span {
        self.cursor.previous_span()
    }

    #[inline]
    fn peek_kind(&self, n: usize) -> TokenKind {
        self.cursor.peek_kind(n)
    }

    #[inline]
    fn check(&self, kind: TokenKind) -> bool {
        self.cursor.check(kind)
    }

    #[inline]
    fn advance(&mut self) -> Token {
        self.cursor.advance()
    }

    #[inline]
    fn eat(&mut self, kind: TokenKind) -> bool {
        self.cursor.eat(kind)
    }

    #[inline]
    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        self.cursor.expect(kind)
    }

    /// Parse a complete program: one expression, then end of file.
    pub fn parse_program(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Eof)?;
        Ok(expr)
    }
}

/// Lex and parse `source`.
#[tracing::instrument(level = "debug", skip_all)]
pub fn parse(source: &str, interner: &StringInterner) -> Result<Expr, ParseError> {
    let tokens = sonnet_lexer::lex(source, interner)?;
    debug!(tokens = tokens.len(), "lexed");
    Parser::new(&tokens).parse_program()
}

/// [`parse`], with the error converted to a [`Diagnostic`] for `file`.
pub fn parse_file(source: &str, file: FileId, interner: &StringInterner) -> Result<Expr, Diagnostic> {
    parse(source, interner).map_err(|err| err.to_diagnostic(file))
}

#[cfg(test)]
mod tests;
