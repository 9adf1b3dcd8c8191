//! Static checks over the lowered tree.
//!
//! Runs once per file after lowering and before any evaluation:
//!
//! - duplicate parameter names (E2002)
//! - duplicate names within one `local` (E2003)
//! - duplicate fixed field names within one object literal (E2004)
//! - `self`, `super` or `$` outside an object (E2005)
//! - unbound variables (E2001), only with [`CheckOptions::strict_variables`]
//!
//! All violations are collected and the one that starts earliest in the
//! source is reported, so the result does not depend on walk order.

use rustc_hash::FxHashSet;
use sonnet_diagnostic::{Diagnostic, ErrorCode};
use sonnet_ir::canon::{CanArena, CanBind, CanExpr, CanFieldName, CanId, CanRange, CanSpec};
use sonnet_ir::{Name, Span, StringInterner};
use sonnet_stack::ensure_sufficient_stack;
use tracing::debug;

use crate::WellKnown;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct CheckOptions {
    /// Report unbound variables statically instead of when (if ever) the
    /// reference is evaluated.
    pub strict_variables: bool,
}

/// Check the tree rooted at `root`. `root` must be a lowered program, so
/// `std` is already in scope through the wrapping `local`.
#[tracing::instrument(level = "debug", skip_all)]
pub fn check(
    arena: &CanArena,
    root: CanId,
    interner: &StringInterner,
    options: CheckOptions,
) -> Result<(), Diagnostic> {
    let mut checker = Checker {
        arena,
        interner,
        known: WellKnown::new(interner),
        options,
        scope: Vec::new(),
        object_depth: 0,
        errors: Vec::new(),
    };
    checker.expr(root);

    debug!(violations = checker.errors.len(), "checked");
    match checker.errors.into_iter().min_by_key(|d| d.span.start) {
        Some(first) => Err(first),
        None => Ok(()),
    }
}

struct Checker<'a> {
    arena: &'a CanArena,
    interner: &'a StringInterner,
    known: WellKnown,
    options: CheckOptions,
    /// Names in scope, innermost last.
    scope: Vec<Name>,
    object_depth: u32,
    errors: Vec<Diagnostic>,
}

impl Checker<'_> {
    fn error(&mut self, code: ErrorCode, message: String, id: CanId, span: Span) {
        self.errors
            .push(Diagnostic::new(code, message, self.arena.file(id), span));
    }

    fn is_bound(&self, name: Name) -> bool {
        self.scope.iter().rev().any(|&n| n == name)
    }

    fn expr(&mut self, id: CanId) {
        ensure_sufficient_stack(|| self.expr_inner(id));
    }

    fn expr_inner(&mut self, id: CanId) {
        let arena = self.arena;
        let span = arena.span(id);
        match arena.kind(id) {
            CanExpr::Null
            | CanExpr::True
            | CanExpr::False
            | CanExpr::Number(_)
            | CanExpr::Str(_)
            | CanExpr::Std
            | CanExpr::Import(_)
            | CanExpr::ImportStr(_) => {}

            CanExpr::Var(name) => {
                if self.is_bound(name) {
                    return;
                }
                if name == self.known.dollar {
                    self.error(
                        ErrorCode::E2005,
                        "can't use $ outside of an object".to_string(),
                        id,
                        span,
                    );
                } else if self.options.strict_variables {
                    let message = format!("Unknown variable: {}", self.interner.lookup(name));
                    self.error(ErrorCode::E2001, message, id, span);
                }
            }
            CanExpr::SelfRef => {
                if self.object_depth == 0 {
                    self.error(
                        ErrorCode::E2005,
                        "can't use self outside of an object".to_string(),
                        id,
                        span,
                    );
                }
            }
            CanExpr::SuperIndex(inner) | CanExpr::InSuper(inner) => {
                if self.object_depth == 0 {
                    self.error(
                        ErrorCode::E2005,
                        "can't use super outside of an object".to_string(),
                        id,
                        span,
                    );
                }
                self.expr(inner);
            }

            CanExpr::Local { binds, body } => {
                let mark = self.scope.len();
                self.bind_names(arena.binds(binds), id);
                for bind in arena.binds(binds) {
                    self.expr(bind.body);
                }
                self.expr(body);
                self.scope.truncate(mark);
            }
            CanExpr::Function { params, body, .. } => {
                let mark = self.scope.len();
                let mut seen = FxHashSet::default();
                for param in arena.params(params) {
                    if !seen.insert(param.name) {
                        let message = format!(
                            "duplicate function parameter: {}",
                            self.interner.lookup(param.name)
                        );
                        self.error(ErrorCode::E2002, message, id, param.span);
                    }
                    self.scope.push(param.name);
                }
                for param in arena.params(params) {
                    if let Some(default) = param.default {
                        self.expr(default);
                    }
                }
                self.expr(body);
                self.scope.truncate(mark);
            }

            CanExpr::Object { fields, asserts } => {
                let mut seen = FxHashSet::default();
                for field in arena.fields(fields) {
                    match field.name {
                        CanFieldName::Fixed(name) => {
                            if !seen.insert(name) {
                                let message =
                                    format!("duplicate field: {}", self.interner.lookup(name));
                                self.error(ErrorCode::E2004, message, id, field.span);
                            }
                        }
                        CanFieldName::Computed(key) => self.expr(key),
                    }
                }
                self.object_depth += 1;
                for field in arena.fields(fields) {
                    self.expr(field.body);
                }
                for &assert in arena.expr_list(asserts) {
                    self.expr(assert);
                }
                self.object_depth -= 1;
            }
            CanExpr::ObjectComp { key, value, specs } => {
                let mark = self.scope.len();
                self.specs(specs);
                self.expr(key);
                self.object_depth += 1;
                self.expr(value);
                self.object_depth -= 1;
                self.scope.truncate(mark);
            }
            CanExpr::ArrayComp { body, specs } => {
                let mark = self.scope.len();
                self.specs(specs);
                self.expr(body);
                self.scope.truncate(mark);
            }

            CanExpr::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.expr(cond);
                self.expr(then_branch);
                self.expr(else_branch);
            }
            CanExpr::Binary { left, right, .. } => {
                self.expr(left);
                self.expr(right);
            }
            CanExpr::Unary { operand, .. } => self.expr(operand),
            CanExpr::Index { target, index } => {
                self.expr(target);
                self.expr(index);
            }
            CanExpr::Apply { target, args, .. } => {
                self.expr(target);
                for arg in arena.args(args) {
                    self.expr(arg.value);
                }
            }
            CanExpr::Array(items) => {
                for &item in arena.expr_list(items) {
                    self.expr(item);
                }
            }
            CanExpr::Error(value) => self.expr(value),
        }
    }

    /// Push the names of one `local` clause, flagging duplicates.
    fn bind_names(&mut self, binds: &[CanBind], id: CanId) {
        let mut seen = FxHashSet::default();
        for bind in binds {
            if !seen.insert(bind.name) {
                let message = format!("duplicate local var: {}", self.interner.lookup(bind.name));
                self.error(ErrorCode::E2003, message, id, bind.span);
            }
            self.scope.push(bind.name);
        }
    }

    /// Comprehension clauses: each `for` variable is visible to every later
    /// clause and to the body. The caller restores the scope.
    fn specs(&mut self, specs: CanRange<CanSpec>) {
        let arena = self.arena;
        for spec in arena.specs(specs) {
            match *spec {
                CanSpec::For { var, iter } => {
                    self.expr(iter);
                    self.scope.push(var);
                }
                CanSpec::If { cond } => self.expr(cond),
            }
        }
    }
}

#[cfg(test)]
mod tests;
