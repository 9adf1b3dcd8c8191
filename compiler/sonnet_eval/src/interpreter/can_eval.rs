//! Canonical expression evaluation: `CanExpr` dispatch.
//!
//! # Borrow Pattern
//!
//! `CanExpr` is `Copy`, so the kind is copied out of the arena before
//! dispatching. Side-table slices are copied too whenever the arm evaluates
//! while walking them, since imports may grow the arena mid-evaluation.

use smallvec::SmallVec;
use sonnet_ir::canon::{CanArg, CanBind, CanExpr, CanId, CanRange};
use sonnet_ir::{BinaryOp, FileId, Name, Span};
use sonnet_stack::ensure_sufficient_stack;

use super::Interpreter;
use crate::diagnostics::{CallFrame, FrameName};
use crate::errors::{
    index_out_of_bounds, infinite_recursion, internal, no_such_field, not_callable, not_indexable,
    type_mismatch, unknown_variable, user_error, EvalResult,
};
use crate::heap::{EnvRef, ThunkRef};
use crate::operators::evaluate_unary;
use crate::value::{Array, Function, Thunk, Value};

impl Interpreter {
    /// Evaluate `expr` in `env`, with stack safety.
    ///
    /// `env` is rooted for the duration of the call; roots pushed by the arm
    /// are dropped on return. Errors leave here located at the innermost
    /// expression that raised them.
    #[tracing::instrument(level = "trace", skip(self))]
    pub(crate) fn eval_can(&mut self, expr: CanId, env: EnvRef) -> EvalResult {
        ensure_sufficient_stack(|| {
            let mark = self.roots.len();
            self.roots.push(env.handle());
            let result = self.eval_can_inner(expr, env);
            self.roots.truncate(mark);
            result.map_err(|err| self.locate(err, expr))
        })
    }

    #[inline]
    pub(crate) fn site(&self, expr: CanId) -> Option<(FileId, Span)> {
        Some((self.arena.file(expr), self.arena.span(expr)))
    }

    /// Exhaustive over `CanExpr`; no catch-all.
    fn eval_can_inner(&mut self, expr: CanId, env: EnvRef) -> EvalResult {
        match self.arena.kind(expr) {
            CanExpr::Null => Ok(Value::Null),
            CanExpr::True => Ok(Value::Bool(true)),
            CanExpr::False => Ok(Value::Bool(false)),
            CanExpr::Number(n) => Ok(Value::Number(n)),
            CanExpr::Str(text) => Ok(Value::Str(self.interner.lookup(text))),
            CanExpr::Var(name) => self.eval_var(name, env, expr),
            CanExpr::SelfRef => {
                let ctx = self.self_ctx(env)?;
                Ok(Value::Object(ctx.object))
            }
            CanExpr::SuperIndex(index) => self.eval_super_index(index, env, expr),
            CanExpr::InSuper(index) => self.eval_in_super(index, env),
            CanExpr::Local { binds, body } => {
                let scope = self.bind_locals(binds, env)?;
                self.eval_can(body, scope)
            }
            CanExpr::If {
                cond,
                then_branch,
                else_branch,
            } => match self.eval_can(cond, env)? {
                Value::Bool(true) => self.eval_can(then_branch, env),
                Value::Bool(false) => self.eval_can(else_branch, env),
                other => Err(type_mismatch(
                    "if condition",
                    "boolean",
                    other.type_name(),
                )),
            },
            CanExpr::Binary { op, left, right } => self.eval_binary(op, left, right, env),
            CanExpr::Unary { op, operand } => {
                let value = self.eval_can(operand, env)?;
                evaluate_unary(op, &value)
            }
            CanExpr::Index { target, index } => {
                let target = self.eval_can(target, env)?;
                self.root(&target);
                let index = self.eval_can(index, env)?;
                self.index_value(&target, &index, self.site(expr))
            }
            CanExpr::Apply { target, args, .. } => self.eval_apply(expr, target, args, env),
            CanExpr::Function { name, params, body } => {
                let function = self.heap.alloc_function(Function::Closure {
                    name,
                    params,
                    body,
                    env,
                });
                Ok(Value::Function(function))
            }
            CanExpr::Object { fields, asserts } => self.build_object(fields, asserts, env),
            CanExpr::ObjectComp { key, value, specs } => {
                self.build_object_comp(key, value, specs, env)
            }
            CanExpr::Array(items) => {
                let items: SmallVec<[CanId; 8]> =
                    SmallVec::from_slice(self.arena.expr_list(items));
                let elements = items
                    .into_iter()
                    .map(|item| self.heap.alloc_thunk(Thunk::Code { expr: item, env }))
                    .collect();
                Ok(Value::Array(self.heap.alloc_array(Array { elements })))
            }
            CanExpr::ArrayComp { body, specs } => self.build_array_comp(body, specs, env),
            CanExpr::Import(path) => self.import_code(expr, path),
            CanExpr::ImportStr(path) => self.import_string(expr, path),
            CanExpr::Error(message) => {
                let value = self.eval_can(message, env)?;
                self.root(&value);
                let message = match value {
                    Value::Str(text) => text.to_string(),
                    other => self.manifest_compact(&other)?,
                };
                Err(user_error(message))
            }
            CanExpr::Std => {
                let object = self.std_object(self.arena.file(expr))?;
                Ok(Value::Object(object))
            }
        }
    }

    fn eval_var(&mut self, name: Name, env: EnvRef, expr: CanId) -> EvalResult {
        match self.lookup(env, name)? {
            Some(thunk) => self.force(thunk, FrameName::Thunk(name), self.site(expr)),
            None => Err(unknown_variable(&self.interner.lookup(name))),
        }
    }

    /// Walk the scope chain for `name`.
    pub(crate) fn lookup(&self, env: EnvRef, name: Name) -> EvalResult<Option<ThunkRef>> {
        let mut current = Some(env);
        while let Some(scope) = current {
            let frame = self.heap.env(scope)?;
            if let Some(thunk) = frame.lookup_local(name) {
                return Ok(Some(thunk));
            }
            current = frame.parent;
        }
        Ok(None)
    }

    /// Bind one `local` clause: every thunk captures the new scope, so the
    /// bindings see each other.
    fn bind_locals(&mut self, binds: CanRange<CanBind>, env: EnvRef) -> EvalResult<EnvRef> {
        let binds: SmallVec<[CanBind; 4]> = SmallVec::from_slice(self.arena.binds(binds));
        let scope = self.child_env(env, SmallVec::new())?;
        let bindings = binds
            .iter()
            .map(|bind| {
                let thunk = self.heap.alloc_thunk(Thunk::Code {
                    expr: bind.body,
                    env: scope,
                });
                (bind.name, thunk)
            })
            .collect();
        self.heap.env_mut(scope)?.bindings = bindings;
        Ok(scope)
    }

    /// Force a thunk, memoizing its value.
    ///
    /// Forcing a thunk that is already being forced is a cycle
    /// (`local x = x + 1; x`) and fails with `InfiniteRecursion`.
    pub(crate) fn force(
        &mut self,
        thunk: ThunkRef,
        name: FrameName,
        site: Option<(FileId, Span)>,
    ) -> EvalResult {
        let pending = match self.heap.thunk(thunk)? {
            Thunk::Forced(value) => return Ok(value.clone()),
            Thunk::InProgress => return Err(infinite_recursion()),
            pending => pending.clone(),
        };
        *self.heap.thunk_mut(thunk)? = Thunk::InProgress;

        let value = self.rooted([thunk.handle()], |this| match pending {
            Thunk::Code { expr, env } => this.in_frame(
                CallFrame::new(name, site)
                    .with_env(env)
                    .with_thunk(thunk),
                |this| this.eval_can(expr, env),
            ),
            Thunk::Apply { function, args } => {
                this.call_function(function, &args, &[], site)
            }
            Thunk::InProgress | Thunk::Forced(_) => {
                Err(internal("thunk state changed while forcing"))
            }
        })?;

        *self.heap.thunk_mut(thunk)? = Thunk::Forced(value.clone());
        Ok(value)
    }

    fn eval_binary(
        &mut self,
        op: BinaryOp,
        left: CanId,
        right: CanId,
        env: EnvRef,
    ) -> EvalResult {
        // Short-circuit: the right operand is only forced when needed.
        if matches!(op, BinaryOp::And | BinaryOp::Or) {
            let short = op == BinaryOp::Or;
            return match self.eval_can(left, env)? {
                Value::Bool(b) if b == short => Ok(Value::Bool(short)),
                Value::Bool(_) => match self.eval_can(right, env)? {
                    Value::Bool(b) => Ok(Value::Bool(b)),
                    other => Err(type_mismatch(
                        format!("right operand of {}", op.as_symbol()),
                        "boolean",
                        other.type_name(),
                    )),
                },
                other => Err(type_mismatch(
                    format!("left operand of {}", op.as_symbol()),
                    "boolean",
                    other.type_name(),
                )),
            };
        }

        let left = self.eval_can(left, env)?;
        self.root(&left);
        let right = self.eval_can(right, env)?;
        self.root(&right);
        self.evaluate_binary(op, &left, &right)
    }

    /// `target[index]` on forced values.
    pub(crate) fn index_value(
        &mut self,
        target: &Value,
        index: &Value,
        site: Option<(FileId, Span)>,
    ) -> EvalResult {
        match (target, index) {
            (Value::Object(object), Value::Str(field)) => {
                let name = self.interner.intern_rc(field);
                match self.object_field(*object, name, None, site)? {
                    Some(value) => Ok(value),
                    None => Err(no_such_field(field)),
                }
            }
            (Value::Array(array), Value::Number(n)) => {
                let elements = &self.heap.array(*array)?.elements;
                let i = array_index(*n, elements.len())?;
                let thunk = elements[i];
                self.force(thunk, FrameName::Thunk(Name::EMPTY), site)
            }
            (Value::Str(text), Value::Number(n)) => {
                let len = text.chars().count();
                let i = array_index(*n, len)?;
                let ch: String = text.chars().skip(i).take(1).collect();
                Ok(Value::string(&ch))
            }
            _ => Err(not_indexable(target.type_name(), index.type_name())),
        }
    }

    fn eval_apply(
        &mut self,
        expr: CanId,
        target: CanId,
        args: CanRange<CanArg>,
        env: EnvRef,
    ) -> EvalResult {
        let callee = self.eval_can(target, env)?;
        let Value::Function(function) = callee else {
            return Err(not_callable(callee.type_name()));
        };
        self.root(&callee);

        let args: SmallVec<[CanArg; 4]> = SmallVec::from_slice(self.arena.args(args));
        let mut positional: SmallVec<[ThunkRef; 4]> = SmallVec::new();
        let mut named: SmallVec<[(Name, ThunkRef); 2]> = SmallVec::new();
        for arg in args {
            let thunk = self.heap.alloc_thunk(Thunk::Code {
                expr: arg.value,
                env,
            });
            match arg.name {
                None => positional.push(thunk),
                Some(name) => named.push((name, thunk)),
            }
        }
        self.call_function(function, &positional, &named, self.site(expr))
    }
}

/// Validate an array/string index.
pub(crate) fn array_index(n: f64, len: usize) -> EvalResult<usize> {
    if n.fract() != 0.0 {
        return Err(type_mismatch("index", "integer", "non-integer number"));
    }
    if n < 0.0 || n >= len as f64 {
        return Err(index_out_of_bounds(n as i64, len));
    }
    Ok(n as usize)
}
