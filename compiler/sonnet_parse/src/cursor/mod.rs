//! Token cursor for navigating the token stream.

use sonnet_diagnostic::ErrorCode;
use sonnet_ir::{Name, Span, Token, TokenKind};

use crate::ParseError;

/// Cursor over a lexed token vector. The last token is always `Eof`.
pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Cursor { tokens, pos: 0 }
    }

    /// Current token. Past the end this is the final `Eof`.
    #[inline]
    pub fn current(&self) -> Token {
        self.peek(0)
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Token `n` positions ahead.
    pub fn peek(&self, n: usize) -> Token {
        self.tokens
            .get(self.pos + n)
            .or_else(|| self.tokens.last())
            .copied()
            .unwrap_or(Token::new(TokenKind::Eof, Span::DUMMY))
    }

    #[inline]
    pub fn peek_kind(&self, n: usize) -> TokenKind {
        self.peek(n).kind
    }

    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens.get(self.pos - 1).map_or(Span::DUMMY, |t| t.span)
        } else {
            Span::DUMMY
        }
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    /// Check whether the current token is `kind`. Payload-carrying kinds
    /// compare by payload too, so use `check_ident`/`check_str` for those.
    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    #[inline]
    pub fn check_ident(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Ident(_))
    }

    pub fn advance(&mut self) -> Token {
        let token = self.current();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Consume `kind` if present.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or fail with "expected X, got Y".
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        let found = self.current();
        let code = if found.kind == TokenKind::Eof
            && matches!(kind, TokenKind::RBrace | TokenKind::RBracket | TokenKind::RParen)
        {
            ErrorCode::E1003
        } else {
            ErrorCode::E1001
        };
        Err(ParseError::new(
            code,
            format!(
                "expected {}, got {}",
                kind.display_name(),
                found.kind.display_name()
            ),
            found.span,
        ))
    }

    pub fn expect_ident(&mut self) -> Result<(Name, Span), ParseError> {
        let token = self.current();
        if let TokenKind::Ident(name) = token.kind {
            self.advance();
            return Ok((name, token.span));
        }
        Err(ParseError::new(
            ErrorCode::E1004,
            format!("expected identifier, got {}", token.kind.display_name()),
            token.span,
        ))
    }
}
