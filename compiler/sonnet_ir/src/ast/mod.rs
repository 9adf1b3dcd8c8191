//! Surface syntax tree produced by `sonnet_parse`.
//!
//! This tree mirrors the written program, sugar included. It is consumed
//! once by `sonnet_canon::lower` and then dropped, so it uses plain owned
//! boxes rather than an arena.

use crate::{BinaryOp, Name, Span, StrStyle, UnaryOp, Visibility};

/// A surface expression with its source span.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    pub fn boxed(kind: ExprKind, span: Span) -> Box<Self> {
        Box::new(Expr { kind, span })
    }
}

/// Surface expression kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Null,
    True,
    False,
    SelfRef,
    /// `$`, the outermost object.
    Dollar,
    Number(f64),
    Str(Name, StrStyle),
    Var(Name),
    /// `super.name`
    SuperField(Name),
    /// `super[expr]`
    SuperIndex(Box<Expr>),
    /// `expr in super`
    InSuper(Box<Expr>),
    /// `target.name`
    Field {
        target: Box<Expr>,
        field: Name,
    },
    /// `target[index]`
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    /// `target[start:end:step]`, each part optional.
    Slice {
        target: Box<Expr>,
        start: Option<Box<Expr>>,
        end: Option<Box<Expr>>,
        step: Option<Box<Expr>>,
    },
    Apply {
        target: Box<Expr>,
        args: Vec<Arg>,
        tailstrict: bool,
    },
    /// `target { ... }`, sugar for `target + { ... }`.
    ApplyBrace {
        target: Box<Expr>,
        object: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Local {
        binds: Vec<Bind>,
        body: Box<Expr>,
    },
    If {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Option<Box<Expr>>,
    },
    Function {
        params: Vec<Param>,
        body: Box<Expr>,
    },
    Object(Vec<Member>),
    ObjectComp(Box<ObjectComp>),
    Array(Vec<Expr>),
    ArrayComp {
        body: Box<Expr>,
        specs: Vec<CompSpec>,
    },
    Import(Name),
    ImportStr(Name),
    Error(Box<Expr>),
    Assert {
        assert: Box<AssertClause>,
        rest: Box<Expr>,
    },
    Parens(Box<Expr>),
}

/// A call argument, positional or `name = value`.
#[derive(Clone, Debug, PartialEq)]
pub struct Arg {
    pub name: Option<Name>,
    pub value: Expr,
    pub span: Span,
}

/// A function parameter with optional default.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: Name,
    pub default: Option<Expr>,
    pub span: Span,
}

/// One `name = body` binding of a `local`, possibly with method sugar
/// `name(params) = body`.
#[derive(Clone, Debug, PartialEq)]
pub struct Bind {
    pub name: Name,
    pub params: Option<Vec<Param>>,
    pub body: Expr,
    pub span: Span,
}

/// `assert cond : message`
#[derive(Clone, Debug, PartialEq)]
pub struct AssertClause {
    pub cond: Expr,
    pub message: Option<Expr>,
    pub span: Span,
}

/// A member of an object literal.
#[derive(Clone, Debug, PartialEq)]
pub enum Member {
    Local(Bind),
    Assert(AssertClause),
    Field(Field),
}

/// How a field's name is written.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldName {
    Ident(Name),
    Str(Name),
    Computed(Expr),
}

/// An object field: `name: value`, `name+:: value`, `name(params): body`, ...
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: FieldName,
    /// `+:` marker: merge into the inherited field instead of replacing it.
    pub plus: bool,
    pub visibility: Visibility,
    pub params: Option<Vec<Param>>,
    pub value: Expr,
    pub span: Span,
}

/// `{ local ..., [key]: value for x in xs if ... }`
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectComp {
    pub locals: Vec<Bind>,
    pub key: Expr,
    pub plus: bool,
    pub value: Expr,
    pub specs: Vec<CompSpec>,
}

/// A comprehension clause.
#[derive(Clone, Debug, PartialEq)]
pub enum CompSpec {
    For { var: Name, iter: Expr, span: Span },
    If { cond: Expr, span: Span },
}

#[cfg(test)]
mod tests;
