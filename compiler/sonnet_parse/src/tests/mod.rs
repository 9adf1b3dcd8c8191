#![allow(clippy::unwrap_used, clippy::expect_used)]

mod errors;
mod expressions;
mod objects;

use sonnet_ir::ast::{CompSpec, Expr, ExprKind, FieldName, Member};
use sonnet_ir::StringInterner;

use crate::{parse, ParseError};

/// Render a parsed expression as a compact s-expression so tests can
/// assert on tree shape without building trees by hand.
fn sexp(src: &str) -> String {
    let interner = StringInterner::new();
    let expr = parse(src, &interner).unwrap();
    let mut out = String::new();
    write_sexp(&expr, &interner, &mut out);
    out
}

fn parse_err(src: &str) -> ParseError {
    let interner = StringInterner::new();
    parse(src, &interner).unwrap_err()
}

fn write_sexp(expr: &Expr, interner: &StringInterner, out: &mut String) {
    let name = |n| interner.lookup(n).to_string();
    match &expr.kind {
        ExprKind::Null => out.push_str("null"),
        ExprKind::True => out.push_str("true"),
        ExprKind::False => out.push_str("false"),
        ExprKind::SelfRef => out.push_str("self"),
        ExprKind::Dollar => out.push('$'),
        ExprKind::Number(n) => out.push_str(&n.to_string()),
        ExprKind::Str(s, _) => out.push_str(&format!("{:?}", &*interner.lookup(*s))),
        ExprKind::Var(v) => out.push_str(&name(*v)),
        ExprKind::SuperField(f) => out.push_str(&format!("super.{}", name(*f))),
        ExprKind::SuperIndex(e) => {
            out.push_str("super[");
            write_sexp(e, interner, out);
            out.push(']');
        }
        ExprKind::InSuper(e) => {
            out.push_str("(in-super ");
            write_sexp(e, interner, out);
            out.push(')');
        }
        ExprKind::Field { target, field } => {
            write_sexp(target, interner, out);
            out.push('.');
            out.push_str(&name(*field));
        }
        ExprKind::Index { target, index } => {
            write_sexp(target, interner, out);
            out.push('[');
            write_sexp(index, interner, out);
            out.push(']');
        }
        ExprKind::Slice {
            target,
            start,
            end,
            step,
        } => {
            out.push_str("(slice ");
            write_sexp(target, interner, out);
            for part in [start, end, step] {
                out.push(' ');
                match part {
                    Some(e) => write_sexp(e, interner, out),
                    None => out.push('_'),
                }
            }
            out.push(')');
        }
        ExprKind::Apply {
            target,
            args,
            tailstrict,
        } => {
            out.push_str("(call ");
            write_sexp(target, interner, out);
            for arg in args {
                out.push(' ');
                if let Some(n) = arg.name {
                    out.push_str(&name(n));
                    out.push('=');
                }
                write_sexp(&arg.value, interner, out);
            }
            if *tailstrict {
                out.push_str(" tailstrict");
            }
            out.push(')');
        }
        ExprKind::ApplyBrace { target, object } => {
            out.push_str("(extend ");
            write_sexp(target, interner, out);
            out.push(' ');
            write_sexp(object, interner, out);
            out.push(')');
        }
        ExprKind::Binary { op, left, right } => {
            out.push('(');
            out.push_str(op.as_symbol());
            out.push(' ');
            write_sexp(left, interner, out);
            out.push(' ');
            write_sexp(right, interner, out);
            out.push(')');
        }
        ExprKind::Unary { op, operand } => {
            out.push('(');
            out.push_str(op.as_symbol());
            write_sexp(operand, interner, out);
            out.push(')');
        }
        ExprKind::Local { binds, body } => {
            out.push_str("(local");
            for bind in binds {
                out.push(' ');
                out.push_str(&name(bind.name));
                if let Some(params) = &bind.params {
                    out.push_str(&format!("/{}", params.len()));
                }
                out.push('=');
                write_sexp(&bind.body, interner, out);
            }
            out.push(' ');
            write_sexp(body, interner, out);
            out.push(')');
        }
        ExprKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            out.push_str("(if ");
            write_sexp(cond, interner, out);
            out.push(' ');
            write_sexp(then_branch, interner, out);
            if let Some(e) = else_branch {
                out.push(' ');
                write_sexp(e, interner, out);
            }
            out.push(')');
        }
        ExprKind::Function { params, body } => {
            out.push_str("(fn (");
            let names: Vec<String> = params
                .iter()
                .map(|p| {
                    if p.default.is_some() {
                        format!("{}?", name(p.name))
                    } else {
                        name(p.name)
                    }
                })
                .collect();
            out.push_str(&names.join(" "));
            out.push_str(") ");
            write_sexp(body, interner, out);
            out.push(')');
        }
        ExprKind::Object(members) => {
            out.push('{');
            for (i, member) in members.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                match member {
                    Member::Local(bind) => {
                        out.push_str("local ");
                        out.push_str(&name(bind.name));
                    }
                    Member::Assert(_) => out.push_str("assert"),
                    Member::Field(field) => {
                        match &field.name {
                            FieldName::Ident(n) => out.push_str(&name(*n)),
                            FieldName::Str(n) => out.push_str(&format!("{:?}", &*interner.lookup(*n))),
                            FieldName::Computed(e) => {
                                out.push('[');
                                write_sexp(e, interner, out);
                                out.push(']');
                            }
                        }
                        if let Some(params) = &field.params {
                            out.push_str(&format!("/{}", params.len()));
                        }
                        if field.plus {
                            out.push('+');
                        }
                        out.push_str(field.visibility.as_symbol());
                        out.push(' ');
                        write_sexp(&field.value, interner, out);
                    }
                }
            }
            out.push('}');
        }
        ExprKind::ObjectComp(comp) => {
            out.push_str("{objcomp ");
            out.push_str(&format!("locals={} ", comp.locals.len()));
            write_sexp(&comp.key, interner, out);
            out.push(' ');
            write_sexp(&comp.value, interner, out);
            write_specs(&comp.specs, interner, out);
            out.push('}');
        }
        ExprKind::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_sexp(item, interner, out);
            }
            out.push(']');
        }
        ExprKind::ArrayComp { body, specs } => {
            out.push_str("[arrcomp ");
            write_sexp(body, interner, out);
            write_specs(specs, interner, out);
            out.push(']');
        }
        ExprKind::Import(p) => out.push_str(&format!("(import {:?})", &*interner.lookup(*p))),
        ExprKind::ImportStr(p) => out.push_str(&format!("(importstr {:?})", &*interner.lookup(*p))),
        ExprKind::Error(e) => {
            out.push_str("(error ");
            write_sexp(e, interner, out);
            out.push(')');
        }
        ExprKind::Assert { assert, rest } => {
            out.push_str("(assert ");
            write_sexp(&assert.cond, interner, out);
            if let Some(m) = &assert.message {
                out.push(' ');
                write_sexp(m, interner, out);
            }
            out.push(' ');
            write_sexp(rest, interner, out);
            out.push(')');
        }
        ExprKind::Parens(e) => write_sexp(e, interner, out),
    }
}

fn write_specs(specs: &[CompSpec], interner: &StringInterner, out: &mut String) {
    for spec in specs {
        match spec {
            CompSpec::For { var, iter, .. } => {
                out.push_str(&format!(" for {} in ", interner.lookup(*var)));
                write_sexp(iter, interner, out);
            }
            CompSpec::If { cond, .. } => {
                out.push_str(" if ");
                write_sexp(cond, interner, out);
            }
        }
    }
}
