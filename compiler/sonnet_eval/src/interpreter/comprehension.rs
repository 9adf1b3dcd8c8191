//! Array and object comprehensions.
//!
//! Generators run in textual order and `if` clauses are forced to decide
//! inclusion; the element (or field) bodies themselves stay unevaluated.

use smallvec::{smallvec, SmallVec};
use sonnet_ir::canon::{CanId, CanRange, CanSpec};

use super::Interpreter;
use crate::errors::{type_mismatch, EvalResult};
use crate::heap::{EnvRef, ThunkRef};
use crate::value::{Array, Thunk, Value};

/// Called once per surviving iteration with its scope.
pub(super) type Emit<'a> = dyn FnMut(&mut Interpreter, EnvRef) -> EvalResult<()> + 'a;

impl Interpreter {
    /// Walk `specs` from `env`, calling `emit` for each iteration.
    ///
    /// Must run inside an `eval_can` scope: every iteration scope is pushed
    /// onto the temporary root stack so what `emit` built from earlier
    /// iterations survives collections triggered by later ones.
    pub(super) fn comprehension(
        &mut self,
        specs: &[CanSpec],
        env: EnvRef,
        emit: &mut Emit<'_>,
    ) -> EvalResult<()> {
        let Some((spec, rest)) = specs.split_first() else {
            return emit(self, env);
        };
        match *spec {
            CanSpec::For { var, iter } => {
                let source = self.eval_can(iter, env)?;
                let Value::Array(array) = source else {
                    return Err(type_mismatch(
                        format!("for {} in", self.interner.lookup(var)),
                        "array",
                        source.type_name(),
                    ));
                };
                self.root(&source);
                let elements = self.heap.array(array)?.elements.clone();
                for element in elements {
                    let scope = self.child_env(env, smallvec![(var, element)])?;
                    self.roots.push(scope.handle());
                    self.comprehension(rest, scope, emit)?;
                }
                Ok(())
            }
            CanSpec::If { cond } => match self.eval_can(cond, env)? {
                Value::Bool(true) => self.comprehension(rest, env, emit),
                Value::Bool(false) => Ok(()),
                other => Err(type_mismatch(
                    "comprehension condition",
                    "boolean",
                    other.type_name(),
                )),
            },
        }
    }

    pub(super) fn build_array_comp(
        &mut self,
        body: CanId,
        specs: CanRange<CanSpec>,
        env: EnvRef,
    ) -> EvalResult {
        let specs: SmallVec<[CanSpec; 4]> = SmallVec::from_slice(self.arena.specs(specs));
        let mut elements: Vec<ThunkRef> = Vec::new();
        self.comprehension(&specs, env, &mut |this, scope| {
            let element = this.heap.alloc_thunk(Thunk::Code { expr: body, env: scope });
            this.roots.push(element.handle());
            elements.push(element);
            Ok(())
        })?;
        Ok(Value::Array(self.heap.alloc_array(Array { elements })))
    }
}
