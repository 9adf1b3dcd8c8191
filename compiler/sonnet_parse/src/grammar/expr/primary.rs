//! Terminals and the keyword-led forms.
//!
//! `local`, `if`, `function`, `error` and `assert` extend as far to the
//! right as possible: their trailing expression is a full `parse_expr`.

use sonnet_diagnostic::ErrorCode;
use sonnet_ir::ast::{AssertClause, Expr, ExprKind};
use sonnet_ir::{StrStyle, TokenKind};

use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.cursor.current();
        let span = token.span;

        let simple = match token.kind {
            TokenKind::Null => Some(ExprKind::Null),
            TokenKind::True => Some(ExprKind::True),
            TokenKind::False => Some(ExprKind::False),
            TokenKind::SelfKw => Some(ExprKind::SelfRef),
            TokenKind::Dollar => Some(ExprKind::Dollar),
            TokenKind::Number(n) => Some(ExprKind::Number(n)),
            TokenKind::Str(s, style) => Some(ExprKind::Str(s, style)),
            TokenKind::Ident(name) => Some(ExprKind::Var(name)),
            _ => None,
        };
        if let Some(kind) = simple {
            self.advance();
            return Ok(Expr::new(kind, span));
        }

        match token.kind {
            TokenKind::Super => self.parse_super(),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                let close = self.expect(TokenKind::RParen)?.span;
                Ok(Expr::new(ExprKind::Parens(Box::new(inner)), span.merge(close)))
            }
            TokenKind::LBrace => self.parse_object(),
            TokenKind::LBracket => self.parse_array(),
            TokenKind::Local => {
                self.advance();
                let mut binds = vec![self.parse_bind()?];
                while self.eat(TokenKind::Comma) {
                    binds.push(self.parse_bind()?);
                }
                self.expect(TokenKind::Semicolon)?;
                let body = self.parse_expr()?;
                let full = span.merge(body.span);
                Ok(Expr::new(
                    ExprKind::Local {
                        binds,
                        body: Box::new(body),
                    },
                    full,
                ))
            }
            TokenKind::If => {
                self.advance();
                let cond = self.parse_expr()?;
                self.expect(TokenKind::Then)?;
                let then_branch = self.parse_expr()?;
                let else_branch = if self.eat(TokenKind::Else) {
                    Some(Box::new(self.parse_expr()?))
                } else {
                    None
                };
                let end = else_branch.as_ref().map_or(then_branch.span, |e| e.span);
                Ok(Expr::new(
                    ExprKind::If {
                        cond: Box::new(cond),
                        then_branch: Box::new(then_branch),
                        else_branch,
                    },
                    span.merge(end),
                ))
            }
            TokenKind::Function => {
                self.advance();
                let params = self.parse_params()?;
                let body = self.parse_expr()?;
                let full = span.merge(body.span);
                Ok(Expr::new(
                    ExprKind::Function {
                        params,
                        body: Box::new(body),
                    },
                    full,
                ))
            }
            TokenKind::Import | TokenKind::ImportStr => {
                self.advance();
                let path = self.cursor.current();
                let TokenKind::Str(name, style) = path.kind else {
                    return Err(ParseError::new(
                        ErrorCode::E1006,
                        "computed imports are not allowed",
                        path.span,
                    ));
                };
                if style == StrStyle::Block {
                    return Err(ParseError::new(
                        ErrorCode::E1006,
                        "block string literals not allowed in imports",
                        path.span,
                    ));
                }
                self.advance();
                let kind = if token.kind == TokenKind::Import {
                    ExprKind::Import(name)
                } else {
                    ExprKind::ImportStr(name)
                };
                Ok(Expr::new(kind, span.merge(path.span)))
            }
            TokenKind::Error => {
                self.advance();
                let value = self.parse_expr()?;
                let full = span.merge(value.span);
                Ok(Expr::new(ExprKind::Error(Box::new(value)), full))
            }
            TokenKind::Assert => {
                let assert = self.parse_assert_clause()?;
                self.expect(TokenKind::Semicolon)?;
                let rest = self.parse_expr()?;
                let full = span.merge(rest.span);
                Ok(Expr::new(
                    ExprKind::Assert {
                        assert: Box::new(assert),
                        rest: Box::new(rest),
                    },
                    full,
                ))
            }
            other => Err(ParseError::new(
                ErrorCode::E1002,
                format!("unexpected {} while parsing terminal", other.display_name()),
                span,
            )),
        }
    }

    /// `assert cond [: message]`, starting at the `assert` keyword.
    pub(crate) fn parse_assert_clause(&mut self) -> Result<AssertClause, ParseError> {
        let start = self.expect(TokenKind::Assert)?.span;
        let cond = self.parse_expr()?;
        let message = if self.eat(TokenKind::Colon) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let end = message.as_ref().map_or(cond.span, |m| m.span);
        Ok(AssertClause {
            cond,
            message,
            span: start.merge(end),
        })
    }

    /// `super.name` or `super[expr]`.
    fn parse_super(&mut self) -> Result<Expr, ParseError> {
        let start = self.advance().span;
        match self.current_kind() {
            TokenKind::Dot => {
                self.advance();
                let (name, end) = self.cursor.expect_ident()?;
                Ok(Expr::new(ExprKind::SuperField(name), start.merge(end)))
            }
            TokenKind::LBracket => {
                self.advance();
                let index = self.parse_expr()?;
                let end = self.expect(TokenKind::RBracket)?.span;
                Ok(Expr::new(
                    ExprKind::SuperIndex(Box::new(index)),
                    start.merge(end),
                ))
            }
            other => Err(ParseError::new(
                ErrorCode::E1001,
                format!("expected . or [ after super, got {}", other.display_name()),
                self.current_span(),
            )),
        }
    }

    fn parse_array(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect(TokenKind::LBracket)?.span;
        if self.check(TokenKind::RBracket) {
            let end = self.advance().span;
            return Ok(Expr::new(ExprKind::Array(Vec::new()), start.merge(end)));
        }

        let first = self.parse_expr()?;

        if self.check(TokenKind::For)
            || (self.check(TokenKind::Comma) && self.peek_kind(1) == TokenKind::For)
        {
            self.eat(TokenKind::Comma);
            let specs = self.parse_comp_specs()?;
            let end = self.expect(TokenKind::RBracket)?.span;
            return Ok(Expr::new(
                ExprKind::ArrayComp {
                    body: Box::new(first),
                    specs,
                },
                start.merge(end),
            ));
        }

        let mut elements = vec![first];
        while self.eat(TokenKind::Comma) {
            if self.check(TokenKind::RBracket) {
                break;
            }
            elements.push(self.parse_expr()?);
        }
        let end = self.expect(TokenKind::RBracket)?.span;
        Ok(Expr::new(ExprKind::Array(elements), start.merge(end)))
    }
}
