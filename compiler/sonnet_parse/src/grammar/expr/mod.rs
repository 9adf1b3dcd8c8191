//! Expression parsing.
//!
//! # Module Structure
//!
//! - `mod.rs`: entry point (`parse_expr`) and binary precedence climbing
//! - `operators.rs`: operator matching helpers
//! - `postfix.rs`: field access, indexing, slicing, calls, `a { }`
//! - `primary.rs`: literals, variables and the keyword-led forms

mod operators;
mod postfix;
mod primary;

use sonnet_ir::ast::{Expr, ExprKind};
use sonnet_ir::{BinaryOp, TokenKind};
use sonnet_stack::ensure_sufficient_stack;

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Parse an expression.
    ///
    /// Uses `ensure_sufficient_stack` so deeply nested input grows the
    /// stack instead of overflowing it.
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        ensure_sufficient_stack(|| self.parse_binary(0))
    }

    /// Precedence climbing over the binary operators. All binary operators
    /// are left-associative, so the right operand only takes operators
    /// that bind strictly tighter.
    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        while let Some(op) = self.match_binary_op() {
            let prec = op.precedence();
            if prec <= min_prec {
                break;
            }
            self.advance();

            // `e in super` tests the inherited object, not a value named super.
            if op == BinaryOp::In
                && self.check(TokenKind::Super)
                && !matches!(self.peek_kind(1), TokenKind::Dot | TokenKind::LBracket)
            {
                let end = self.advance().span;
                let span = left.span.merge(end);
                left = Expr::new(ExprKind::InSuper(Box::new(left)), span);
                continue;
            }

            let right = self.parse_binary(prec)?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if let Some(op) = self.match_unary_op() {
            let start = self.advance().span;
            let operand = ensure_sufficient_stack(|| self.parse_unary())?;
            let span = start.merge(operand.span);
            return Ok(Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ));
        }
        self.parse_postfix()
    }
}
