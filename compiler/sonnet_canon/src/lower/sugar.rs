//! Rewrites that expand into calls or control flow.

use sonnet_ir::ast::{AssertClause, Expr, ExprKind};
use sonnet_ir::canon::{CanArg, CanExpr, CanId};
use sonnet_ir::{BinaryOp, Span};

use super::Lowerer;

impl Lowerer<'_> {
    /// `a[lo:hi:step]` → `std.slice(a, lo, hi, step)`, absent parts as `null`.
    pub(super) fn lower_slice(
        &mut self,
        target: &Expr,
        start: Option<&Expr>,
        end: Option<&Expr>,
        step: Option<&Expr>,
        span: Span,
    ) -> CanId {
        let mut args = Vec::with_capacity(4);
        args.push(CanArg {
            name: None,
            value: self.lower_expr(target),
        });
        for part in [start, end, step] {
            let value = match part {
                Some(e) => self.lower_expr(e),
                None => self.push(CanExpr::Null, span),
            };
            args.push(CanArg { name: None, value });
        }
        let callee = self.std_member(self.known.slice, span);
        let args = self.arena.push_args(&args);
        self.push(
            CanExpr::Apply {
                target: callee,
                args,
                tailstrict: false,
            },
            span,
        )
    }

    /// `l % r`. A literal format string using only `%s` and `%%`, applied to
    /// an array literal of matching length, becomes string concatenation;
    /// everything else calls `std.mod`, which handles numbers and
    /// `std.format` at runtime.
    pub(super) fn lower_percent(&mut self, left: &Expr, right: &Expr, span: Span) -> CanId {
        if let (ExprKind::Str(fmt, _), ExprKind::Array(items)) = (&left.kind, &right.kind) {
            let fmt = self.interner.lookup(*fmt);
            if let Some(segments) = split_simple_format(&fmt) {
                if segments.len() == items.len() + 1 {
                    return self.lower_concat(&segments, items, span);
                }
            }
        }

        let args = [
            CanArg {
                name: None,
                value: self.lower_expr(left),
            },
            CanArg {
                name: None,
                value: self.lower_expr(right),
            },
        ];
        let callee = self.std_member(self.known.modulo, span);
        let args = self.arena.push_args(&args);
        self.push(
            CanExpr::Apply {
                target: callee,
                args,
                tailstrict: false,
            },
            span,
        )
    }

    /// `s0 + v0 + s1 + v1 + ... + sn`, starting from the (possibly empty)
    /// first segment so `+` always takes the string path.
    fn lower_concat(&mut self, segments: &[String], items: &[Expr], span: Span) -> CanId {
        let mut acc = self.str_lit(&segments[0], span);
        for (item, segment) in items.iter().zip(&segments[1..]) {
            let value = self.lower_expr(item);
            acc = self.push(
                CanExpr::Binary {
                    op: BinaryOp::Add,
                    left: acc,
                    right: value,
                },
                span,
            );
            if !segment.is_empty() {
                let lit = self.str_lit(segment, span);
                acc = self.push(
                    CanExpr::Binary {
                        op: BinaryOp::Add,
                        left: acc,
                        right: lit,
                    },
                    span,
                );
            }
        }
        acc
    }

    /// `assert cond : msg` guarding `rest` → `if cond then rest else error msg`.
    pub(super) fn lower_assert(&mut self, clause: &AssertClause, rest: CanId) -> CanId {
        let cond = self.lower_expr(&clause.cond);
        let message = match &clause.message {
            Some(m) => self.lower_expr(m),
            None => self.push(CanExpr::Str(self.known.assertion_failed), clause.span),
        };
        let fail = self.push(CanExpr::Error(message), clause.span);
        self.push(
            CanExpr::If {
                cond,
                then_branch: rest,
                else_branch: fail,
            },
            clause.span,
        )
    }
}

/// Split a format string on `%s`, unescaping `%%`. `None` if it uses any
/// other conversion.
fn split_simple_format(fmt: &str) -> Option<Vec<String>> {
    let mut segments = vec![String::new()];
    let mut chars = fmt.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            segments.last_mut()?.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => segments.push(String::new()),
            Some('%') => segments.last_mut()?.push('%'),
            _ => return None,
        }
    }
    Some(segments)
}
