//! Object literals and object comprehensions.

use sonnet_ir::ast::{Bind, FieldName, Member, ObjectComp};
use sonnet_ir::canon::{CanBind, CanExpr, CanField, CanFieldName, CanId, CanRange};
use sonnet_ir::{BinaryOp, Span};

use super::Lowerer;

impl Lowerer<'_> {
    pub(super) fn lower_object(&mut self, members: &[Member], span: Span) -> CanId {
        // Computed names are evaluated outside the object: no self, no locals.
        // A `+:` field also needs its name inside the body, so the key is
        // bound once to a hidden local around the whole object.
        let mut keys = Vec::new();
        let names: Vec<Option<CanFieldName>> = members
            .iter()
            .map(|member| match member {
                Member::Field(field) => Some(match &field.name {
                    FieldName::Ident(name) | FieldName::Str(name) => CanFieldName::Fixed(*name),
                    FieldName::Computed(key) if field.plus => {
                        let body = self.lower_expr(key);
                        let name = self.hidden_name("key");
                        keys.push(CanBind {
                            name,
                            body,
                            span: key.span,
                        });
                        CanFieldName::Computed(self.push(CanExpr::Var(name), key.span))
                    }
                    FieldName::Computed(key) => CanFieldName::Computed(self.lower_expr(key)),
                }),
                _ => None,
            })
            .collect();

        self.object_depth += 1;
        let locals: Vec<&Bind> = members
            .iter()
            .filter_map(|member| match member {
                Member::Local(bind) => Some(bind),
                _ => None,
            })
            .collect();
        let locals = self.lower_object_locals(&locals, span);

        let mut fields = Vec::new();
        let mut asserts = Vec::new();
        for (member, name) in members.iter().zip(names) {
            match member {
                Member::Local(_) => {}
                Member::Assert(clause) => {
                    let ok = self.push(CanExpr::Null, clause.span);
                    let check = self.lower_assert(clause, ok);
                    asserts.push(self.wrap_locals(locals, check, clause.span));
                }
                Member::Field(field) => {
                    let Some(name) = name else { continue };
                    let value = match &field.params {
                        Some(params) => {
                            let fn_name = match name {
                                CanFieldName::Fixed(n) => n,
                                CanFieldName::Computed(_) => self.known.empty,
                            };
                            self.lower_function(fn_name, params, &field.value, field.span)
                        }
                        None => self.lower_expr(&field.value),
                    };
                    let value = if field.plus {
                        self.lower_plus_field(name, value, field.span)
                    } else {
                        value
                    };
                    fields.push(CanField {
                        name,
                        visibility: field.visibility,
                        body: self.wrap_locals(locals, value, field.span),
                        span: field.span,
                    });
                }
            }
        }
        self.object_depth -= 1;

        let fields = self.arena.push_fields(&fields);
        let asserts = self.arena.push_expr_list(&asserts);
        let object = self.push(CanExpr::Object { fields, asserts }, span);
        if keys.is_empty() {
            object
        } else {
            let binds = self.arena.push_binds(&keys);
            self.push(CanExpr::Local { binds, body: object }, span)
        }
    }

    pub(super) fn lower_object_comp(&mut self, comp: &ObjectComp, span: Span) -> CanId {
        let specs = self.lower_specs(&comp.specs);
        let key = self.lower_expr(&comp.key);

        self.object_depth += 1;
        let locals: Vec<&Bind> = comp.locals.iter().collect();
        let locals = self.lower_object_locals(&locals, span);
        let value = self.lower_expr(&comp.value);
        let value = self.wrap_locals(locals, value, span);
        // The key is re-read outside the object locals, in the scope of the
        // comprehension variables it was first evaluated in.
        let value = if comp.plus {
            self.lower_plus_field(CanFieldName::Computed(key), value, span)
        } else {
            value
        };
        self.object_depth -= 1;

        self.push(CanExpr::ObjectComp { key, value, specs }, span)
    }

    /// The object's locals, plus `$ = self` when this is the outermost
    /// object. Must be called with `object_depth` already incremented.
    fn lower_object_locals(&mut self, locals: &[&Bind], span: Span) -> Option<CanRange<CanBind>> {
        let mut binds = Vec::with_capacity(locals.len() + 1);
        if self.object_depth == 1 {
            let self_ref = self.push(CanExpr::SelfRef, span);
            binds.push(CanBind {
                name: self.known.dollar,
                body: self_ref,
                span,
            });
        }
        for bind in locals {
            binds.push(self.lower_bind(bind));
        }
        if binds.is_empty() {
            None
        } else {
            Some(self.arena.push_binds(&binds))
        }
    }

    fn wrap_locals(&mut self, locals: Option<CanRange<CanBind>>, body: CanId, span: Span) -> CanId {
        match locals {
            Some(binds) => self.push(CanExpr::Local { binds, body }, span),
            None => body,
        }
    }

    /// `name+: value` → `if name in super then super[name] + value else value`.
    fn lower_plus_field(&mut self, name: CanFieldName, value: CanId, span: Span) -> CanId {
        let name = match name {
            CanFieldName::Fixed(n) => self.push(CanExpr::Str(n), span),
            CanFieldName::Computed(id) => id,
        };
        let cond = self.push(CanExpr::InSuper(name), span);
        let inherited = self.push(CanExpr::SuperIndex(name), span);
        let merged = self.push(
            CanExpr::Binary {
                op: BinaryOp::Add,
                left: inherited,
                right: value,
            },
            span,
        );
        self.push(
            CanExpr::If {
                cond,
                then_branch: merged,
                else_branch: value,
            },
            span,
        )
    }
}
