//! Function calls: argument binding for closures and builtins.

use smallvec::SmallVec;
use sonnet_ir::canon::CanParam;
use sonnet_ir::{FileId, Name, Span, StringInterner};

use super::Interpreter;
use crate::diagnostics::{CallFrame, FrameName};
use crate::errors::{
    missing_argument, parameter_bound_twice, too_many_args, unknown_parameter, EvalResult,
};
use crate::heap::{FunctionRef, ThunkRef};
use crate::value::{Function, Thunk};

/// Argument slots in parameter order; `None` where the caller supplied
/// nothing.
pub(crate) type ArgSlots = SmallVec<[Option<ThunkRef>; 4]>;

/// Match positional then named arguments against `params`.
///
/// Positional arguments fill parameters left to right; named arguments
/// fill by name. Missing parameters are left as `None` for the caller to
/// default or reject.
pub(crate) fn bind_arguments(
    params: &[Name],
    positional: &[ThunkRef],
    named: &[(Name, ThunkRef)],
    interner: &StringInterner,
) -> EvalResult<ArgSlots> {
    if positional.len() > params.len() {
        return Err(too_many_args(params.len(), positional.len()));
    }
    let mut slots: ArgSlots = SmallVec::from_elem(None, params.len());
    for (slot, &arg) in slots.iter_mut().zip(positional) {
        *slot = Some(arg);
    }
    for &(name, arg) in named {
        let Some(index) = params.iter().position(|&param| param == name) else {
            return Err(unknown_parameter(&interner.lookup(name)));
        };
        if slots[index].is_some() {
            return Err(parameter_bound_twice(&interner.lookup(name)));
        }
        slots[index] = Some(arg);
    }
    Ok(slots)
}

impl Interpreter {
    /// Call `function`. Argument thunks are not forced here.
    pub(crate) fn call_function(
        &mut self,
        function: FunctionRef,
        positional: &[ThunkRef],
        named: &[(Name, ThunkRef)],
        site: Option<(FileId, Span)>,
    ) -> EvalResult {
        let handles = std::iter::once(function.handle())
            .chain(positional.iter().map(|arg| arg.handle()))
            .chain(named.iter().map(|(_, arg)| arg.handle()));
        self.rooted(handles, |this| {
            let callee = this.heap.function(function)?.clone();
            this.call_resolved(callee, positional, named, site)
        })
    }

    fn call_resolved(
        &mut self,
        callee: Function,
        positional: &[ThunkRef],
        named: &[(Name, ThunkRef)],
        site: Option<(FileId, Span)>,
    ) -> EvalResult {
        match callee {
            Function::Closure {
                name,
                params,
                body,
                env,
            } => {
                let params: SmallVec<[CanParam; 4]> =
                    SmallVec::from_slice(self.arena.params(params));
                let names: SmallVec<[Name; 4]> = params.iter().map(|param| param.name).collect();
                let slots = bind_arguments(&names, positional, named, &self.interner)?;

                let scope = self.child_env(env, SmallVec::new())?;
                let mut bindings = SmallVec::with_capacity(params.len());
                for (param, slot) in params.iter().zip(slots) {
                    let thunk = match (slot, param.default) {
                        (Some(thunk), _) => thunk,
                        (None, Some(default)) => self.heap.alloc_thunk(Thunk::Code {
                            expr: default,
                            env: scope,
                        }),
                        (None, None) => {
                            return Err(missing_argument(&self.interner.lookup(param.name)));
                        }
                    };
                    bindings.push((param.name, thunk));
                }
                self.heap.env_mut(scope)?.bindings = bindings;

                self.in_frame(
                    CallFrame::new(FrameName::Function(name), site).with_env(scope),
                    |this| this.eval_can(body, scope),
                )
            }
            Function::Builtin(builtin) => {
                let params = self.names.builtin_params(builtin);
                let slots = bind_arguments(params, positional, named, &self.interner)?;
                let mut args: SmallVec<[ThunkRef; 4]> = SmallVec::with_capacity(slots.len());
                for (slot, &param) in slots.into_iter().zip(params) {
                    match slot {
                        Some(thunk) => args.push(thunk),
                        None => return Err(missing_argument(&self.interner.lookup(param))),
                    }
                }
                self.in_frame(CallFrame::new(FrameName::Builtin(builtin.name()), site), |this| {
                    this.call_builtin(builtin, &args)
                })
            }
        }
    }
}
