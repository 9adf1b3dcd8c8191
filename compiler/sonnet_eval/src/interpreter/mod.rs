//! Tree-walking interpreter over the canonical tree.
//!
//! # Architecture
//!
//! All evaluation goes through `eval_can(CanId, EnvRef)` in `can_eval.rs`.
//! Helper modules cover the rest of the core semantics:
//!
//! - `function_call` - argument binding and calls (closures and builtins)
//! - `object` - object construction, field access, `super`, asserts
//! - `comprehension` - array and object comprehensions
//! - `import_cache` - `import`/`importstr` through the [`ImportResolver`]
//!
//! # Rooting discipline
//!
//! The collector only runs at frame pushes, and only sees handles reachable
//! from the frame stack, the temporary root stack, the root environment, the
//! `std` objects and the import cache. `eval_can` roots its environment for
//! the duration of the call and truncates the temporary root stack on exit,
//! so any value held across a nested evaluation must be pushed with
//! [`Interpreter::root`] first.

mod can_eval;
mod comprehension;
mod function_call;
mod import_cache;
mod interned_names;
mod object;

use std::path::PathBuf;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use sonnet_canon::CheckOptions;
use sonnet_diagnostic::{Diagnostic, SourceFile, SourceMap};
use sonnet_ir::canon::{CanArena, CanId};
use sonnet_ir::{FileId, Name, StringInterner, Visibility};
use tracing::debug;

use crate::builtins::Builtin;
use crate::diagnostics::{CallFrame, CallStack};
use crate::errors::{EvalError, EvalResult};
use crate::heap::{EnvRef, GcPolicy, Handle, Heap, ObjectRef};
use crate::import::{FileResolver, ImportResolver};
use crate::value::{Env, FieldBody, Function, Layer, LayerField, Object, Value};

use import_cache::ImportCache;
use interned_names::KnownNames;

/// Limits and inputs of one evaluation.
#[derive(Clone, Debug)]
pub struct EvalOptions {
    /// Frames (calls, thunk and field forces, imports) before `StackOverflow`.
    pub max_stack: usize,
    pub gc: GcPolicy,
    /// Trace lines kept in runtime errors; `0` keeps all of them.
    pub max_trace: usize,
    /// Values returned by `std.extVar`.
    pub external_vars: FxHashMap<String, String>,
    /// Report unbound variables before evaluation.
    pub strict_variables: bool,
}

impl Default for EvalOptions {
    fn default() -> Self {
        EvalOptions {
            max_stack: 500,
            gc: GcPolicy::default(),
            max_trace: 20,
            external_vars: FxHashMap::default(),
            strict_variables: false,
        }
    }
}

/// One evaluation: owns the heap, names, tree, sources and import cache.
///
/// Nothing is shared between interpreters, so independent instances can run
/// on separate threads.
pub struct Interpreter {
    pub(crate) interner: StringInterner,
    pub(crate) arena: CanArena,
    pub(crate) sources: SourceMap,
    pub(crate) heap: Heap,
    pub(crate) stack: CallStack,
    /// Temporary roots; see the module docs.
    pub(crate) roots: Vec<Handle>,
    pub(crate) options: EvalOptions,
    pub(crate) names: KnownNames,
    resolver: Box<dyn ImportResolver>,
    imports: ImportCache,
    root_env: EnvRef,
    std_base: ObjectRef,
    /// `std` as seen from each file (the base plus `thisFile`).
    std_files: FxHashMap<FileId, ObjectRef>,
}

impl Interpreter {
    /// An interpreter resolving imports from the filesystem with no library
    /// paths.
    pub fn new(options: EvalOptions) -> Self {
        Self::with_resolver(options, Box::new(FileResolver::default()))
    }

    pub fn with_resolver(options: EvalOptions, resolver: Box<dyn ImportResolver>) -> Self {
        let interner = StringInterner::new();
        let names = KnownNames::new(&interner);
        let mut heap = Heap::new();
        let root_env = heap.alloc_env(Env {
            parent: None,
            bindings: SmallVec::new(),
            self_ctx: None,
        });

        let mut layer = Layer::default();
        for &builtin in Builtin::ALL {
            let function = heap.alloc_function(Function::Builtin(builtin));
            let thunk = heap.alloc_value(Value::Function(function));
            layer.insert(LayerField {
                name: interner.intern(builtin.name()),
                visibility: Visibility::Hidden,
                body: FieldBody::Value(thunk),
            });
        }
        let std_base = heap.alloc_object(Object::new(Rc::from(vec![Rc::new(layer)])));

        Interpreter {
            interner,
            arena: CanArena::new(),
            sources: SourceMap::new(),
            heap,
            stack: CallStack::new(options.max_stack),
            roots: Vec::new(),
            options,
            names,
            resolver,
            imports: ImportCache::default(),
            root_env,
            std_base,
            std_files: FxHashMap::default(),
        }
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    pub fn arena(&self) -> &CanArena {
        &self.arena
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// Register `source` under `path`, then lex, parse, lower and check it.
    #[tracing::instrument(level = "debug", skip(self, source))]
    pub fn compile(&mut self, path: &str, source: Rc<str>) -> Result<CanId, Diagnostic> {
        let file = self
            .sources
            .add(SourceFile::new(path, Rc::clone(&source)));
        let program = sonnet_parse::parse_file(&source, file, &self.interner)?;
        let root = sonnet_canon::lower_program(&program, file, &mut self.arena, &self.interner);
        sonnet_canon::check(
            &self.arena,
            root,
            &self.interner,
            CheckOptions {
                strict_variables: self.options.strict_variables,
            },
        )?;
        Ok(root)
    }

    /// Render a compiled tree as text.
    pub fn dump(&self, root: CanId) -> String {
        sonnet_canon::dump(&self.arena, root, &self.interner)
    }

    /// Evaluate a compiled program to a value.
    pub fn evaluate(&mut self, root: CanId) -> EvalResult {
        let env = self.root_env;
        self.eval_can(root, env)
            .map_err(|err| self.locate(err, root))
    }

    /// Evaluate a compiled program and manifest it as multi-line JSON,
    /// terminated by a newline.
    pub fn evaluate_to_json(&mut self, root: CanId) -> EvalResult<String> {
        let value = self.evaluate(root)?;
        let mark = self.roots.len();
        self.root(&value);
        let result = self.manifest_multiline(&value, "   ");
        self.roots.truncate(mark);
        let mut json = result.map_err(|err| self.locate(err, root))?;
        json.push('\n');
        debug!(
            live = self.heap.live(),
            collections = self.heap.collections(),
            freed = self.heap.total_freed(),
            "evaluated"
        );
        Ok(json)
    }

    /// Push `value`'s handle onto the temporary root stack. It stays rooted
    /// until the enclosing `eval_can` (or [`Interpreter::rooted`] scope)
    /// returns.
    #[inline]
    pub(crate) fn root(&mut self, value: &Value) {
        self.roots.extend(value.handle());
    }

    /// Run `f` with `handles` rooted.
    pub(crate) fn rooted<T>(
        &mut self,
        handles: impl IntoIterator<Item = Handle>,
        f: impl FnOnce(&mut Self) -> EvalResult<T>,
    ) -> EvalResult<T> {
        let mark = self.roots.len();
        self.roots.extend(handles);
        let result = f(self);
        self.roots.truncate(mark);
        result
    }

    /// Run `f` inside `frame`. The frame push is the collector's safepoint.
    pub(crate) fn in_frame<T>(
        &mut self,
        frame: CallFrame,
        f: impl FnOnce(&mut Self) -> EvalResult<T>,
    ) -> EvalResult<T> {
        self.stack.push(frame)?;
        if self.heap.should_collect(&self.options.gc) {
            self.collect_garbage();
        }
        let result = f(self);
        self.stack.pop();
        result
    }

    fn collect_garbage(&mut self) {
        let mut roots: Vec<Handle> = self.stack.roots().collect();
        roots.extend_from_slice(&self.roots);
        roots.push(self.root_env.handle());
        roots.push(self.std_base.handle());
        roots.extend(self.std_files.values().map(|object| object.handle()));
        roots.extend(self.imports.roots());
        self.heap.collect(roots);
    }

    /// Attach the location of `expr` and the current trace to an error that
    /// has neither yet.
    pub(crate) fn locate(&self, err: EvalError, expr: CanId) -> EvalError {
        if err.is_located() {
            return err;
        }
        let site = (self.arena.file(expr), self.arena.span(expr));
        let trace = self
            .stack
            .capture(site, &self.interner)
            .truncated(self.options.max_trace);
        err.at(site.0, site.1).with_trace(trace)
    }

    /// A new scope under `parent`, inheriting its `self`.
    pub(crate) fn child_env(
        &mut self,
        parent: EnvRef,
        bindings: SmallVec<[(Name, crate::heap::ThunkRef); 4]>,
    ) -> EvalResult<EnvRef> {
        let self_ctx = self.heap.env(parent)?.self_ctx;
        Ok(self.heap.alloc_env(Env {
            parent: Some(parent),
            bindings,
            self_ctx,
        }))
    }

    /// `std` as seen from `file`: the builtins plus a hidden `thisFile`.
    fn std_object(&mut self, file: FileId) -> EvalResult<ObjectRef> {
        if let Some(&object) = self.std_files.get(&file) {
            return Ok(object);
        }
        let path = self
            .sources
            .get(file)
            .map_or_else(|| Rc::from(""), |source| Rc::clone(&source.path));
        let this_file = self.heap.alloc_value(Value::Str(path));
        let mut layer = Layer::default();
        layer.insert(LayerField {
            name: self.names.this_file,
            visibility: Visibility::Hidden,
            body: FieldBody::Value(this_file),
        });
        let base = &self.heap.object(self.std_base)?.layers;
        let layers: Vec<Rc<Layer>> = base
            .iter()
            .cloned()
            .chain(std::iter::once(Rc::new(layer)))
            .collect();
        let object = self.heap.alloc_object(Object::new(Rc::from(layers)));
        self.std_files.insert(file, object);
        Ok(object)
    }

    /// Path of the file `expr` was compiled from.
    pub(crate) fn file_path(&self, expr: CanId) -> PathBuf {
        self.sources
            .get(self.arena.file(expr))
            .map_or_else(PathBuf::new, |source| PathBuf::from(&*source.path))
    }
}

#[cfg(test)]
mod tests;
