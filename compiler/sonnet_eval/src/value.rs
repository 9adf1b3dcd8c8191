//! Runtime values and the heap-resident structures behind them.
//!
//! Scalars live inline in [`Value`]; arrays, objects, functions, thunks and
//! environments live in the [`Heap`](crate::heap::Heap) and are addressed by
//! generation-tagged handles.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use sonnet_ir::canon::{CanId, CanParam, CanRange};
use sonnet_ir::{Name, Visibility};

use crate::builtins::Builtin;
use crate::heap::{ArrayRef, EnvRef, FunctionRef, Handle, ObjectRef, ThunkRef};

/// A forced Jsonnet value.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Array(ArrayRef),
    Object(ObjectRef),
    Function(FunctionRef),
}

impl Value {
    /// Name reported by `std.type` and in type errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    pub fn string(text: &str) -> Self {
        Value::Str(Rc::from(text))
    }

    /// Heap handle this value keeps alive, if any.
    pub(crate) fn handle(&self) -> Option<Handle> {
        match self {
            Value::Array(r) => Some(r.handle()),
            Value::Object(r) => Some(r.handle()),
            Value::Function(r) => Some(r.handle()),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::Str(_) => None,
        }
    }
}

/// Memo state of a deferred computation.
#[derive(Clone, Debug)]
pub enum Thunk {
    /// Not yet forced: evaluate `expr` in `env`.
    Code { expr: CanId, env: EnvRef },
    /// Not yet forced: call `function` with positional `args`. Used by
    /// lazy builtins such as `std.map` and `std.makeArray`.
    Apply {
        function: FunctionRef,
        args: SmallVec<[ThunkRef; 2]>,
    },
    /// Being forced; forcing it again is a cycle.
    InProgress,
    Forced(Value),
}

/// The object whose field body is running, and the layer that defined it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SelfCtx {
    pub object: ObjectRef,
    /// Index into the object's layers; `super` searches strictly below it.
    pub layer: u32,
}

/// One lexical scope frame.
#[derive(Clone, Debug)]
pub struct Env {
    pub parent: Option<EnvRef>,
    pub bindings: SmallVec<[(Name, ThunkRef); 4]>,
    /// Inherited from the parent unless a field access rebinds it.
    pub self_ctx: Option<SelfCtx>,
}

impl Env {
    pub fn lookup_local(&self, name: Name) -> Option<ThunkRef> {
        self.bindings
            .iter()
            .rev()
            .find(|(bound, _)| *bound == name)
            .map(|(_, thunk)| *thunk)
    }
}

/// Where a field's value comes from.
#[derive(Copy, Clone, Debug)]
pub enum FieldBody {
    /// Evaluated on access with `self` bound to the indexed object.
    Code { expr: CanId, env: EnvRef },
    /// Already built, e.g. a builtin of the native `std` object.
    Value(ThunkRef),
}

#[derive(Copy, Clone, Debug)]
pub struct LayerField {
    pub name: Name,
    pub visibility: Visibility,
    pub body: FieldBody,
}

/// One object literal's fields inside a (possibly merged) object.
#[derive(Debug, Default)]
pub struct Layer {
    /// Declaration order.
    pub fields: Vec<LayerField>,
    pub index: FxHashMap<Name, usize>,
    pub asserts: Vec<(CanId, EnvRef)>,
}

impl Layer {
    pub fn get(&self, name: Name) -> Option<&LayerField> {
        self.index.get(&name).and_then(|&i| self.fields.get(i))
    }

    /// Append a field; returns `false` if `name` is already present.
    pub fn insert(&mut self, field: LayerField) -> bool {
        if self.index.contains_key(&field.name) {
            return false;
        }
        self.index.insert(field.name, self.fields.len());
        self.fields.push(field);
        true
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum AssertState {
    #[default]
    Pending,
    Running,
    Done,
}

/// An object: layers from base to most derived.
///
/// Layers are immutable and shared between the operands of `+` and the
/// merged result; the field cache is per object because `self` differs.
#[derive(Debug)]
pub struct Object {
    pub layers: Rc<[Rc<Layer>]>,
    /// Memoized field thunks keyed by (field, defining layer).
    pub cache: FxHashMap<(Name, u32), ThunkRef>,
    pub asserts: AssertState,
}

impl Object {
    pub fn new(layers: Rc<[Rc<Layer>]>) -> Self {
        let asserts = if layers.iter().all(|layer| layer.asserts.is_empty()) {
            AssertState::Done
        } else {
            AssertState::Pending
        };
        Object {
            layers,
            cache: FxHashMap::default(),
            asserts,
        }
    }

    /// Most derived definition of `name` strictly below layer `below`
    /// (all layers if `None`).
    pub fn find(&self, name: Name, below: Option<u32>) -> Option<(u32, LayerField)> {
        let end = below.map_or(self.layers.len(), |b| (b as usize).min(self.layers.len()));
        self.layers[..end]
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, layer)| layer.get(name).map(|field| (i as u32, *field)))
    }

    /// Every field name, visible or not, at its first declaration position
    /// from base to derived.
    pub fn field_names(&self) -> Vec<Name> {
        let mut seen = rustc_hash::FxHashSet::default();
        let mut names = Vec::new();
        for layer in self.layers.iter() {
            for field in &layer.fields {
                if seen.insert(field.name) {
                    names.push(field.name);
                }
            }
        }
        names
    }

    /// The most derived explicit `::`/`:::` wins; otherwise visible.
    pub fn is_visible(&self, name: Name) -> bool {
        for layer in self.layers.iter().rev() {
            match layer.get(name).map(|field| field.visibility) {
                Some(Visibility::Hidden) => return false,
                Some(Visibility::Visible) => return true,
                Some(Visibility::Inherit) | None => {}
            }
        }
        true
    }

    /// Visible field names in declaration order.
    pub fn visible_names(&self) -> Vec<Name> {
        self.field_names()
            .into_iter()
            .filter(|&name| self.is_visible(name))
            .collect()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Array {
    pub elements: Vec<ThunkRef>,
}

#[derive(Clone, Debug)]
pub enum Function {
    Closure {
        /// Declared name, or [`Name::EMPTY`].
        name: Name,
        params: CanRange<CanParam>,
        body: CanId,
        env: EnvRef,
    },
    Builtin(Builtin),
}
