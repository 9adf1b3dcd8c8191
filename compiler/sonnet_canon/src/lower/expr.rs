//! Per-kind lowering.

use sonnet_ir::ast::{Arg, Bind, CompSpec, Expr, ExprKind, Param};
use sonnet_ir::canon::{CanArg, CanBind, CanExpr, CanId, CanParam, CanRange, CanSpec};
use sonnet_ir::{BinaryOp, Name, Span, UnaryOp};
use sonnet_stack::ensure_sufficient_stack;

use super::Lowerer;

impl Lowerer<'_> {
    pub(crate) fn lower_expr(&mut self, expr: &Expr) -> CanId {
        ensure_sufficient_stack(|| self.lower_expr_inner(expr))
    }

    fn lower_expr_inner(&mut self, expr: &Expr) -> CanId {
        let span = expr.span;
        match &expr.kind {
            ExprKind::Null => self.push(CanExpr::Null, span),
            ExprKind::True => self.push(CanExpr::True, span),
            ExprKind::False => self.push(CanExpr::False, span),
            ExprKind::SelfRef => self.push(CanExpr::SelfRef, span),
            ExprKind::Dollar => self.push(CanExpr::Var(self.known.dollar), span),
            ExprKind::Number(n) => self.push(CanExpr::Number(*n), span),
            ExprKind::Str(s, _) => self.push(CanExpr::Str(*s), span),
            ExprKind::Var(name) => self.push(CanExpr::Var(*name), span),

            ExprKind::SuperField(field) => {
                let index = self.push(CanExpr::Str(*field), span);
                self.push(CanExpr::SuperIndex(index), span)
            }
            ExprKind::SuperIndex(index) => {
                let index = self.lower_expr(index);
                self.push(CanExpr::SuperIndex(index), span)
            }
            ExprKind::InSuper(name) => {
                let name = self.lower_expr(name);
                self.push(CanExpr::InSuper(name), span)
            }
            ExprKind::Field { target, field } => {
                let target = self.lower_expr(target);
                let index = self.push(CanExpr::Str(*field), span);
                self.push(CanExpr::Index { target, index }, span)
            }
            ExprKind::Index { target, index } => {
                let target = self.lower_expr(target);
                let index = self.lower_expr(index);
                self.push(CanExpr::Index { target, index }, span)
            }
            ExprKind::Slice {
                target,
                start,
                end,
                step,
            } => self.lower_slice(target, start.as_deref(), end.as_deref(), step.as_deref(), span),

            ExprKind::Apply {
                target,
                args,
                tailstrict,
            } => {
                let target = self.lower_expr(target);
                let args = self.lower_args(args);
                self.push(
                    CanExpr::Apply {
                        target,
                        args,
                        tailstrict: *tailstrict,
                    },
                    span,
                )
            }
            ExprKind::ApplyBrace { target, object } => {
                let left = self.lower_expr(target);
                let right = self.lower_expr(object);
                self.push(
                    CanExpr::Binary {
                        op: BinaryOp::Add,
                        left,
                        right,
                    },
                    span,
                )
            }

            ExprKind::Binary { op, left, right } => self.lower_binary(*op, left, right, span),
            ExprKind::Unary { op, operand } => {
                let operand = self.lower_expr(operand);
                self.push(CanExpr::Unary { op: *op, operand }, span)
            }

            ExprKind::Local { binds, body } => {
                let binds = self.lower_binds(binds);
                let body = self.lower_expr(body);
                self.push(CanExpr::Local { binds, body }, span)
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond = self.lower_expr(cond);
                let then_branch = self.lower_expr(then_branch);
                let else_branch = match else_branch {
                    Some(e) => self.lower_expr(e),
                    None => self.push(CanExpr::Null, span),
                };
                self.push(
                    CanExpr::If {
                        cond,
                        then_branch,
                        else_branch,
                    },
                    span,
                )
            }
            ExprKind::Function { params, body } => {
                self.lower_function(self.known.empty, params, body, span)
            }

            ExprKind::Object(members) => self.lower_object(members, span),
            ExprKind::ObjectComp(comp) => self.lower_object_comp(comp, span),

            ExprKind::Array(items) => {
                let ids: Vec<CanId> = items.iter().map(|item| self.lower_expr(item)).collect();
                let items = self.arena.push_expr_list(&ids);
                self.push(CanExpr::Array(items), span)
            }
            ExprKind::ArrayComp { body, specs } => {
                let specs = self.lower_specs(specs);
                let body = self.lower_expr(body);
                self.push(CanExpr::ArrayComp { body, specs }, span)
            }

            ExprKind::Import(path) => self.push(CanExpr::Import(*path), span),
            ExprKind::ImportStr(path) => self.push(CanExpr::ImportStr(*path), span),
            ExprKind::Error(value) => {
                let value = self.lower_expr(value);
                self.push(CanExpr::Error(value), span)
            }
            ExprKind::Assert { assert, rest } => {
                let rest = self.lower_expr(rest);
                self.lower_assert(assert, rest)
            }
            ExprKind::Parens(inner) => self.lower_expr(inner),
        }
    }

    fn lower_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr, span: Span) -> CanId {
        match op {
            BinaryOp::NotEq => {
                let left = self.lower_expr(left);
                let right = self.lower_expr(right);
                let eq = self.push(
                    CanExpr::Binary {
                        op: BinaryOp::Eq,
                        left,
                        right,
                    },
                    span,
                );
                self.push(
                    CanExpr::Unary {
                        op: UnaryOp::Not,
                        operand: eq,
                    },
                    span,
                )
            }
            BinaryOp::Mod => self.lower_percent(left, right, span),
            _ => {
                let left = self.lower_expr(left);
                let right = self.lower_expr(right);
                self.push(CanExpr::Binary { op, left, right }, span)
            }
        }
    }

    /// Lower an expression that is being bound to `name`, so a function
    /// literal picks the name up for stack traces.
    pub(super) fn lower_named(&mut self, name: Name, expr: &Expr) -> CanId {
        match &expr.kind {
            ExprKind::Function { params, body } => self.lower_function(name, params, body, expr.span),
            _ => self.lower_expr(expr),
        }
    }

    pub(super) fn lower_function(&mut self, name: Name, params: &[Param], body: &Expr, span: Span) -> CanId {
        let lowered: Vec<CanParam> = params
            .iter()
            .map(|param| CanParam {
                name: param.name,
                default: param.default.as_ref().map(|d| self.lower_expr(d)),
                span: param.span,
            })
            .collect();
        let params = self.arena.push_params(&lowered);
        let body = self.lower_expr(body);
        self.push(CanExpr::Function { name, params, body }, span)
    }

    pub(super) fn lower_bind(&mut self, bind: &Bind) -> CanBind {
        let body = match &bind.params {
            Some(params) => self.lower_function(bind.name, params, &bind.body, bind.span),
            None => self.lower_named(bind.name, &bind.body),
        };
        CanBind {
            name: bind.name,
            body,
            span: bind.span,
        }
    }

    pub(super) fn lower_binds(&mut self, binds: &[Bind]) -> CanRange<CanBind> {
        let lowered: Vec<CanBind> = binds.iter().map(|b| self.lower_bind(b)).collect();
        self.arena.push_binds(&lowered)
    }

    fn lower_args(&mut self, args: &[Arg]) -> CanRange<CanArg> {
        let lowered: Vec<CanArg> = args
            .iter()
            .map(|arg| CanArg {
                name: arg.name,
                value: self.lower_expr(&arg.value),
            })
            .collect();
        self.arena.push_args(&lowered)
    }

    pub(super) fn lower_specs(&mut self, specs: &[CompSpec]) -> CanRange<CanSpec> {
        let lowered: Vec<CanSpec> = specs
            .iter()
            .map(|spec| match spec {
                CompSpec::For { var, iter, .. } => CanSpec::For {
                    var: *var,
                    iter: self.lower_expr(iter),
                },
                CompSpec::If { cond, .. } => CanSpec::If {
                    cond: self.lower_expr(cond),
                },
            })
            .collect();
        self.arena.push_specs(&lowered)
    }
}
