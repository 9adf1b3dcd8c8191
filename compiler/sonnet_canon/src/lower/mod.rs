//! Surface AST → canonical core tree.
//!
//! Lowering is total: every well-formed surface tree has a core form, so
//! nothing here returns an error. Sugar handled:
//!
//! - `a.b` → `a["b"]`, `super.b` → `super["b"]`
//! - `a[lo:hi:step]` → `std.slice(a, lo, hi, step)`
//! - `"..%s.." % [x]` with only `%s`/`%%` → concatenation, other `%` → `std.mod`
//! - `!=` → `!(==)`, `a { }` → `a + { }`, missing `else` → `else null`
//! - `assert c : m; e` → `if c then e else error m`
//! - methods `f(x): e` and `local f(x) = e` → named function literals
//! - object `local`s wrap every field body and assert
//! - `f+: e` → `if "f" in super then super["f"] + e else e`; a computed
//!   `[k]+: e` binds `k` once to a hidden local around the object
//! - `$` → a `local $ = self` injected into the outermost object
//!
//! `std` references introduced by lowering use [`CanExpr::Std`] directly,
//! so they are immune to user shadowing of the `std` variable.
//!
//! # Module Structure
//!
//! - `mod.rs`: `Lowerer` state and the program entry point
//! - `expr.rs`: the per-kind lowering match
//! - `object.rs`: object literals and object comprehensions
//! - `sugar.rs`: slice, `%` and assert rewrites

mod expr;
mod object;
mod sugar;

use sonnet_ir::ast::Expr;
use sonnet_ir::canon::{CanArena, CanBind, CanExpr, CanId, CanNode};
use sonnet_ir::{FileId, Span, StringInterner};
use tracing::debug;

use crate::WellKnown;

/// Lower a parsed program from `file` into `arena`, returning its root.
///
/// The root is `local std = <Std>; program`.
#[tracing::instrument(level = "debug", skip_all, fields(file = file.index()))]
pub fn lower_program(
    program: &Expr,
    file: FileId,
    arena: &mut CanArena,
    interner: &StringInterner,
) -> CanId {
    let before = arena.len();
    arena.set_current_file(file);

    let mut lowerer = Lowerer::new(arena, interner);
    let body = lowerer.lower_expr(program);
    let root = lowerer.wrap_std(body, program.span);

    debug!(nodes = arena.len() - before, "lowered");
    root
}

pub(crate) struct Lowerer<'a> {
    arena: &'a mut CanArena,
    known: WellKnown,
    interner: &'a StringInterner,
    /// Number of object literals enclosing the expression being lowered.
    object_depth: u32,
    /// Counter for [`Lowerer::hidden_name`].
    hidden: u32,
}

impl<'a> Lowerer<'a> {
    fn new(arena: &'a mut CanArena, interner: &'a StringInterner) -> Self {
        Lowerer {
            arena,
            known: WellKnown::new(interner),
            interner,
            object_depth: 0,
            hidden: 0,
        }
    }

    /// A fresh variable name no source program can spell (`$` never
    /// lexes as part of an identifier).
    fn hidden_name(&mut self, prefix: &str) -> sonnet_ir::Name {
        self.hidden += 1;
        self.interner.intern(&format!("${prefix}{}", self.hidden))
    }

    #[inline]
    fn push(&mut self, kind: CanExpr, span: Span) -> CanId {
        self.arena.push(CanNode::new(kind, span))
    }

    fn str_lit(&mut self, text: &str, span: Span) -> CanId {
        let name = self.interner.intern(text);
        self.push(CanExpr::Str(name), span)
    }

    /// `std.<member>` using the native library directly.
    fn std_member(&mut self, member: sonnet_ir::Name, span: Span) -> CanId {
        let target = self.push(CanExpr::Std, span);
        let index = self.push(CanExpr::Str(member), span);
        self.push(CanExpr::Index { target, index }, span)
    }

    fn wrap_std(&mut self, body: CanId, span: Span) -> CanId {
        let std_value = self.push(CanExpr::Std, span);
        let binds = self.arena.push_binds(&[CanBind {
            name: self.known.std,
            body: std_value,
            span,
        }]);
        self.push(CanExpr::Local { binds, body }, span)
    }
}
