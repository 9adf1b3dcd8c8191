//! Canonical expression kinds and side-table entry types.

use super::ids::{CanId, CanRange};
use crate::{BinaryOp, Name, Span, UnaryOp, Visibility};

/// Canonical expression kind.
///
/// Sugar-free: no `.field`, slices, `+:`, `assert`, `$`, object-level
/// `local`s, `!=` or `a { }`. Every variant is `Copy`; children are
/// [`CanId`]s or ranges into the arena's side tables.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CanExpr {
    Null,
    True,
    False,
    Number(f64),
    Str(Name),
    Var(Name),
    /// `self`
    SelfRef,
    /// `super[index]`
    SuperIndex(CanId),
    /// `name in super`
    InSuper(CanId),
    /// Mutually recursive bindings, then the body.
    Local {
        binds: CanRange<CanBind>,
        body: CanId,
    },
    If {
        cond: CanId,
        then_branch: CanId,
        else_branch: CanId,
    },
    Binary {
        op: BinaryOp,
        left: CanId,
        right: CanId,
    },
    Unary {
        op: UnaryOp,
        operand: CanId,
    },
    Index {
        target: CanId,
        index: CanId,
    },
    Apply {
        target: CanId,
        args: CanRange<CanArg>,
        tailstrict: bool,
    },
    /// A function literal. `name` is the binding it was declared under
    /// (`local f(x) = ...`, `f(x): ...`), or [`Name::EMPTY`] if anonymous;
    /// it only feeds stack traces.
    Function {
        name: Name,
        params: CanRange<CanParam>,
        body: CanId,
    },
    Object {
        fields: CanRange<CanField>,
        asserts: CanRange<CanId>,
    },
    /// `{[key]: value for ...}`
    ObjectComp {
        key: CanId,
        value: CanId,
        specs: CanRange<CanSpec>,
    },
    Array(CanRange<CanId>),
    ArrayComp {
        body: CanId,
        specs: CanRange<CanSpec>,
    },
    Import(Name),
    ImportStr(Name),
    Error(CanId),
    /// The native standard library object.
    Std,
}

/// A canonical node: kind plus location, used when pushing into the arena.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CanNode {
    pub kind: CanExpr,
    pub span: Span,
}

impl CanNode {
    pub const fn new(kind: CanExpr, span: Span) -> Self {
        CanNode { kind, span }
    }
}

/// `name = body` inside a `local`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CanBind {
    pub name: Name,
    pub body: CanId,
    pub span: Span,
}

/// A function parameter. `default` is evaluated in the callee environment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CanParam {
    pub name: Name,
    pub default: Option<CanId>,
    pub span: Span,
}

/// A call argument.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CanArg {
    pub name: Option<Name>,
    pub value: CanId,
}

/// A field name: known at lowering time, or computed at construction time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CanFieldName {
    Fixed(Name),
    Computed(CanId),
}

/// An object field.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CanField {
    pub name: CanFieldName,
    pub visibility: Visibility,
    pub body: CanId,
    pub span: Span,
}

/// A comprehension clause.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CanSpec {
    For { var: Name, iter: CanId },
    If { cond: CanId },
}
