//! Postfix forms: `.field`, `[index]`, `[a:b:c]`, `(args)`, `{ object }`.

use sonnet_ir::ast::{Expr, ExprKind};
use sonnet_ir::TokenKind;

use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.current_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let (field, field_span) = self.cursor.expect_ident()?;
                    let span = expr.span.merge(field_span);
                    expr = Expr::new(
                        ExprKind::Field {
                            target: Box::new(expr),
                            field,
                        },
                        span,
                    );
                }
                TokenKind::LBracket => {
                    self.advance();
                    expr = self.parse_index_or_slice(expr)?;
                }
                TokenKind::LParen => {
                    let args = self.parse_args()?;
                    let tailstrict = self.eat(TokenKind::TailStrict);
                    let span = expr.span.merge(self.previous_span());
                    expr = Expr::new(
                        ExprKind::Apply {
                            target: Box::new(expr),
                            args,
                            tailstrict,
                        },
                        span,
                    );
                }
                TokenKind::LBrace => {
                    let object = self.parse_object()?;
                    let span = expr.span.merge(object.span);
                    expr = Expr::new(
                        ExprKind::ApplyBrace {
                            target: Box::new(expr),
                            object: Box::new(object),
                        },
                        span,
                    );
                }
                _ => return Ok(expr),
            }
        }
    }

    /// After `[`: either `index]` or a slice with optional parts. The lexer
    /// reads `::` as one token, so `[a::c]` arrives as `a`, `::`, `c`.
    fn parse_index_or_slice(&mut self, target: Expr) -> Result<Expr, ParseError> {
        let start = if self.check(TokenKind::Colon) || self.check(TokenKind::DoubleColon) {
            None
        } else {
            let index = self.parse_expr()?;
            if self.check(TokenKind::RBracket) {
                let end = self.advance().span;
                let span = target.span.merge(end);
                return Ok(Expr::new(
                    ExprKind::Index {
                        target: Box::new(target),
                        index: Box::new(index),
                    },
                    span,
                ));
            }
            Some(Box::new(index))
        };

        let (end, step) = if self.eat(TokenKind::DoubleColon) {
            (None, self.parse_optional_slice_part()?)
        } else {
            self.expect(TokenKind::Colon)?;
            let end = if self.check(TokenKind::Colon) {
                None
            } else {
                self.parse_optional_slice_part()?
            };
            let step = if self.eat(TokenKind::Colon) {
                self.parse_optional_slice_part()?
            } else {
                None
            };
            (end, step)
        };

        let close = self.expect(TokenKind::RBracket)?.span;
        let span = target.span.merge(close);
        Ok(Expr::new(
            ExprKind::Slice {
                target: Box::new(target),
                start,
                end,
                step,
            },
            span,
        ))
    }

    fn parse_optional_slice_part(&mut self) -> Result<Option<Box<Expr>>, ParseError> {
        if self.check(TokenKind::RBracket) {
            Ok(None)
        } else {
            Ok(Some(Box::new(self.parse_expr()?)))
        }
    }
}
