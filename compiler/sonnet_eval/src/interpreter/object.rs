//! Objects: construction, field access, `super`, inheritance and asserts.
//!
//! An object is a stack of layers. `a + b` shares both operands' layers in
//! a new object; nothing is copied or evaluated. A field body runs with
//! `self` bound to the object being indexed and `super` pointing below the
//! layer that defined the field, so overrides in derived layers are seen by
//! base-layer code.

use std::rc::Rc;

use smallvec::SmallVec;
use sonnet_ir::canon::{CanField, CanFieldName, CanId, CanRange, CanSpec};
use sonnet_ir::{FileId, Name, Span, Visibility};
use tracing::trace;

use super::Interpreter;
use crate::diagnostics::{CallFrame, FrameName};
use crate::errors::{duplicate_field, internal, no_such_field, type_mismatch, EvalResult};
use crate::heap::{EnvRef, ObjectRef};
use crate::value::{
    AssertState, Env, FieldBody, Layer, LayerField, Object, SelfCtx, Thunk, Value,
};

impl Interpreter {
    /// The object and layer whose field body `env` belongs to.
    pub(crate) fn self_ctx(&self, env: EnvRef) -> EvalResult<SelfCtx> {
        self.heap
            .env(env)?
            .self_ctx
            .ok_or_else(|| internal("self used outside of an object"))
    }

    pub(super) fn build_object(
        &mut self,
        fields: CanRange<CanField>,
        asserts: CanRange<CanId>,
        env: EnvRef,
    ) -> EvalResult {
        let fields: SmallVec<[CanField; 8]> = SmallVec::from_slice(self.arena.fields(fields));
        let mut layer = Layer::default();
        for field in fields {
            let name = match field.name {
                CanFieldName::Fixed(name) => name,
                CanFieldName::Computed(key) => match self.field_name(key, env)? {
                    Some(name) => name,
                    None => continue,
                },
            };
            let inserted = layer.insert(LayerField {
                name,
                visibility: field.visibility,
                body: FieldBody::Code {
                    expr: field.body,
                    env,
                },
            });
            if !inserted {
                return Err(duplicate_field(&self.interner.lookup(name)));
            }
        }
        layer.asserts = self
            .arena
            .expr_list(asserts)
            .iter()
            .map(|&assert| (assert, env))
            .collect();

        let object = self.heap.alloc_object(Object::new(Rc::from(vec![Rc::new(layer)])));
        Ok(Value::Object(object))
    }

    /// Evaluate a computed field name. `null` omits the field.
    fn field_name(&mut self, key: CanId, env: EnvRef) -> EvalResult<Option<Name>> {
        match self.eval_can(key, env)? {
            Value::Str(text) => Ok(Some(self.interner.intern_rc(&text))),
            Value::Null => Ok(None),
            other => Err(type_mismatch("field name", "string", other.type_name())),
        }
    }

    pub(super) fn build_object_comp(
        &mut self,
        key: CanId,
        value: CanId,
        specs: CanRange<CanSpec>,
        env: EnvRef,
    ) -> EvalResult {
        let specs: SmallVec<[CanSpec; 4]> = SmallVec::from_slice(self.arena.specs(specs));
        let mut layer = Layer::default();
        self.comprehension(&specs, env, &mut |this, scope| {
            let Some(name) = this.field_name(key, scope)? else {
                return Ok(());
            };
            let inserted = layer.insert(LayerField {
                name,
                visibility: Visibility::Inherit,
                body: FieldBody::Code { expr: value, env: scope },
            });
            if inserted {
                Ok(())
            } else {
                Err(duplicate_field(&this.interner.lookup(name)))
            }
        })?;
        let object = self.heap.alloc_object(Object::new(Rc::from(vec![Rc::new(layer)])));
        Ok(Value::Object(object))
    }

    /// `left + right`: the right operand's layers on top of the left's.
    pub(crate) fn merge_objects(&mut self, left: ObjectRef, right: ObjectRef) -> EvalResult {
        let base = Rc::clone(&self.heap.object(left)?.layers);
        let derived = Rc::clone(&self.heap.object(right)?.layers);
        let layers: Vec<Rc<Layer>> = base.iter().chain(derived.iter()).cloned().collect();
        let object = self.heap.alloc_object(Object::new(Rc::from(layers)));
        Ok(Value::Object(object))
    }

    /// Value of field `name` as seen from `object`, searching the layers
    /// strictly below `below` (all layers if `None`). `Ok(None)` if no
    /// layer defines it.
    pub(crate) fn object_field(
        &mut self,
        object: ObjectRef,
        name: Name,
        below: Option<u32>,
        site: Option<(FileId, Span)>,
    ) -> EvalResult<Option<Value>> {
        self.ensure_asserts(object, site)?;
        let Some((layer, field)) = self.heap.object(object)?.find(name, below) else {
            return Ok(None);
        };
        let thunk = match field.body {
            FieldBody::Value(thunk) => thunk,
            FieldBody::Code { expr, env } => {
                let cached = self.heap.object(object)?.cache.get(&(name, layer)).copied();
                match cached {
                    Some(thunk) => thunk,
                    None => {
                        let scope = self.heap.alloc_env(Env {
                            parent: Some(env),
                            bindings: SmallVec::new(),
                            self_ctx: Some(SelfCtx { object, layer }),
                        });
                        let thunk = self.heap.alloc_thunk(Thunk::Code { expr, env: scope });
                        self.heap.object_mut(object)?.cache.insert((name, layer), thunk);
                        thunk
                    }
                }
            }
        };
        self.force(thunk, FrameName::Field(name), site).map(Some)
    }

    /// Run the object's asserts once, before its first field access.
    ///
    /// Asserts may read the object's own fields; those reads do not re-run
    /// the asserts.
    pub(crate) fn ensure_asserts(&mut self, object: ObjectRef, site: Option<(FileId, Span)>) -> EvalResult<()> {
        let state = self.heap.object(object)?;
        if state.asserts != AssertState::Pending {
            return Ok(());
        }
        let layers = Rc::clone(&state.layers);
        self.heap.object_mut(object)?.asserts = AssertState::Running;
        trace!(layers = layers.len(), "running object asserts");

        self.rooted([object.handle()], |this| {
            for (index, layer) in layers.iter().enumerate() {
                for &(assert, env) in &layer.asserts {
                    let scope = this.heap.alloc_env(Env {
                        parent: Some(env),
                        bindings: SmallVec::new(),
                        self_ctx: Some(SelfCtx {
                            object,
                            layer: index as u32,
                        }),
                    });
                    this.in_frame(
                        CallFrame::new(FrameName::Assert, site).with_env(scope),
                        |this| this.eval_can(assert, scope),
                    )?;
                }
            }
            Ok(())
        })?;

        self.heap.object_mut(object)?.asserts = AssertState::Done;
        Ok(())
    }

    pub(super) fn eval_super_index(&mut self, index: CanId, env: EnvRef, expr: CanId) -> EvalResult {
        let ctx = self.self_ctx(env)?;
        let name = self.super_field_name(index, env)?;
        let site = self.site(expr);
        match self.object_field(ctx.object, name, Some(ctx.layer), site)? {
            Some(value) => Ok(value),
            None => Err(no_such_field(&self.interner.lookup(name))),
        }
    }

    pub(super) fn eval_in_super(&mut self, index: CanId, env: EnvRef) -> EvalResult {
        let ctx = self.self_ctx(env)?;
        let name = self.super_field_name(index, env)?;
        let found = self.heap.object(ctx.object)?.find(name, Some(ctx.layer));
        Ok(Value::Bool(found.is_some()))
    }

    fn super_field_name(&mut self, index: CanId, env: EnvRef) -> EvalResult<Name> {
        match self.eval_can(index, env)? {
            Value::Str(text) => Ok(self.interner.intern_rc(&text)),
            other => Err(type_mismatch("super index", "string", other.type_name())),
        }
    }

    /// Whether `object` has field `name` at all (`"f" in o`).
    pub(crate) fn has_field(&self, object: ObjectRef, name: Name, include_hidden: bool) -> EvalResult<bool> {
        let object = self.heap.object(object)?;
        Ok(object.find(name, None).is_some() && (include_hidden || object.is_visible(name)))
    }
}
