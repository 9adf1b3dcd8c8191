//! Parameter lists, call arguments, `local` binds and comprehension clauses.

use sonnet_diagnostic::ErrorCode;
use sonnet_ir::ast::{Arg, Bind, CompSpec, Param};
use sonnet_ir::TokenKind;

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// `( [name [= default]] , ... )`, trailing comma allowed.
    pub(crate) fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.check(TokenKind::RParen) {
            let (name, start) = self.cursor.expect_ident()?;
            let default = if self.eat(TokenKind::Eq) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            let end = default.as_ref().map_or(start, |d| d.span);
            params.push(Param {
                name,
                default,
                span: start.merge(end),
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(params)
    }

    /// `( arg, ..., name = arg, ... )`. Positional arguments may not follow
    /// named ones.
    pub(crate) fn parse_args(&mut self) -> Result<Vec<Arg>, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut args: Vec<Arg> = Vec::new();
        while !self.check(TokenKind::RParen) {
            let start = self.current_span();
            let name = match self.current_kind() {
                TokenKind::Ident(name) if self.peek_kind(1) == TokenKind::Eq => {
                    self.advance();
                    self.advance();
                    Some(name)
                }
                _ => None,
            };
            let value = self.parse_expr()?;
            if name.is_none() && args.iter().any(|a| a.name.is_some()) {
                return Err(ParseError::new(
                    ErrorCode::E1007,
                    "positional argument after a named argument",
                    value.span,
                ));
            }
            let span = start.merge(value.span);
            args.push(Arg { name, value, span });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    /// `name = body` or `name(params) = body`.
    pub(crate) fn parse_bind(&mut self) -> Result<Bind, ParseError> {
        let (name, start) = self.cursor.expect_ident()?;
        let params = if self.check(TokenKind::LParen) {
            Some(self.parse_params()?)
        } else {
            None
        };
        self.expect(TokenKind::Eq)?;
        let body = self.parse_expr()?;
        let span = start.merge(body.span);
        Ok(Bind {
            name,
            params,
            body,
            span,
        })
    }

    /// `for x in e` followed by any mix of `for` and `if` clauses.
    pub(crate) fn parse_comp_specs(&mut self) -> Result<Vec<CompSpec>, ParseError> {
        let mut specs = Vec::new();
        self.parse_for_spec(&mut specs)?;
        loop {
            match self.current_kind() {
                TokenKind::For => self.parse_for_spec(&mut specs)?,
                TokenKind::If => {
                    let start = self.advance().span;
                    let cond = self.parse_expr()?;
                    let span = start.merge(cond.span);
                    specs.push(CompSpec::If { cond, span });
                }
                _ => return Ok(specs),
            }
        }
    }

    fn parse_for_spec(&mut self, specs: &mut Vec<CompSpec>) -> Result<(), ParseError> {
        let start = self.expect(TokenKind::For)?.span;
        let (var, _) = self.cursor.expect_ident()?;
        self.expect(TokenKind::In)?;
        let iter = self.parse_expr()?;
        let span = start.merge(iter.span);
        specs.push(CompSpec::For { var, iter, span });
        Ok(())
    }
}
