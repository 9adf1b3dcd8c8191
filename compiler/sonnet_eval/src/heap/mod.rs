//! Slot arena for thunks, environments, objects, arrays and functions.
//!
//! # Handles
//!
//! Every allocation returns a typed handle (`ThunkRef`, `EnvRef`, ...) that
//! pairs a slot index with the slot's generation. Freeing a slot bumps its
//! generation, so a handle that outlived its value is detected on access and
//! reported as an internal error.
//!
//! # Collection
//!
//! Mark-sweep over an explicit worklist. The heap knows nothing about the
//! evaluator: [`Heap::collect`] takes the root set from its caller. Cycles
//! (an object whose field environment points back at it) are reclaimed like
//! anything else.

use tracing::debug;

use crate::errors::{internal, EvalError};
use crate::value::{Array, Env, FieldBody, Function, Object, Thunk, Value};

/// Untyped slot address.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Handle {
    index: u32,
    generation: u32,
}

macro_rules! typed_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub struct $name(Handle);

        impl $name {
            #[inline]
            pub fn handle(self) -> Handle {
                self.0
            }
        }
    };
}

typed_handle!(
    /// A deferred computation.
    ThunkRef
);
typed_handle!(
    /// A scope frame.
    EnvRef
);
typed_handle!(ObjectRef);
typed_handle!(ArrayRef);
typed_handle!(FunctionRef);

/// What a slot holds.
#[derive(Debug)]
pub enum HeapEntry {
    Thunk(Thunk),
    Env(Env),
    Object(Object),
    Array(Array),
    Function(Function),
}

impl HeapEntry {
    fn kind_name(&self) -> &'static str {
        match self {
            HeapEntry::Thunk(_) => "thunk",
            HeapEntry::Env(_) => "environment",
            HeapEntry::Object(_) => "object",
            HeapEntry::Array(_) => "array",
            HeapEntry::Function(_) => "function",
        }
    }

    /// Push every handle this entry references.
    fn trace(&self, out: &mut Vec<Handle>) {
        match self {
            HeapEntry::Thunk(thunk) => match thunk {
                Thunk::Code { env, .. } => out.push(env.handle()),
                Thunk::Apply { function, args } => {
                    out.push(function.handle());
                    out.extend(args.iter().map(|arg| arg.handle()));
                }
                Thunk::Forced(value) => out.extend(value.handle()),
                Thunk::InProgress => {}
            },
            HeapEntry::Env(env) => {
                out.extend(env.parent.map(EnvRef::handle));
                out.extend(env.bindings.iter().map(|(_, thunk)| thunk.handle()));
                out.extend(env.self_ctx.map(|ctx| ctx.object.handle()));
            }
            HeapEntry::Object(object) => {
                for layer in object.layers.iter() {
                    for field in &layer.fields {
                        out.push(match field.body {
                            FieldBody::Code { env, .. } => env.handle(),
                            FieldBody::Value(thunk) => thunk.handle(),
                        });
                    }
                    out.extend(layer.asserts.iter().map(|(_, env)| env.handle()));
                }
                out.extend(object.cache.values().map(|thunk| thunk.handle()));
            }
            HeapEntry::Array(array) => {
                out.extend(array.elements.iter().map(|thunk| thunk.handle()));
            }
            HeapEntry::Function(function) => match function {
                Function::Closure { env, .. } => out.push(env.handle()),
                Function::Builtin(_) => {}
            },
        }
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    marked: bool,
    entry: Option<HeapEntry>,
}

/// Statistics from one collection pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CollectionStats {
    pub marked: usize,
    pub freed: usize,
}

/// When to consider collecting.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GcPolicy {
    /// No collection while fewer objects are live.
    pub min_objects: usize,
    /// Collect once live objects exceed this multiple of the count that
    /// survived the previous collection.
    pub growth_trigger: f64,
}

impl Default for GcPolicy {
    fn default() -> Self {
        GcPolicy {
            min_objects: 1000,
            growth_trigger: 2.0,
        }
    }
}

/// The per-evaluation heap.
#[derive(Debug, Default)]
pub struct Heap {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    live_after_last: usize,
    collections: usize,
    total_freed: usize,
}

macro_rules! accessors {
    ($get:ident, $get_mut:ident, $alloc:ident, $handle:ident, $variant:ident, $ty:ty) => {
        pub fn $alloc(&mut self, value: $ty) -> $handle {
            $handle(self.alloc(HeapEntry::$variant(value)))
        }

        pub fn $get(&self, r: $handle) -> Result<&$ty, EvalError> {
            match self.entry(r.0)? {
                HeapEntry::$variant(value) => Ok(value),
                other => Err(wrong_kind(stringify!($variant), other)),
            }
        }

        pub fn $get_mut(&mut self, r: $handle) -> Result<&mut $ty, EvalError> {
            match self.entry_mut(r.0)? {
                HeapEntry::$variant(value) => Ok(value),
                other => Err(wrong_kind(stringify!($variant), other)),
            }
        }
    };
}

#[cold]
fn wrong_kind(expected: &str, found: &HeapEntry) -> EvalError {
    internal(format!(
        "heap handle for {expected} points at {}",
        found.kind_name()
    ))
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    accessors!(thunk, thunk_mut, alloc_thunk, ThunkRef, Thunk, Thunk);
    accessors!(env, env_mut, alloc_env, EnvRef, Env, Env);
    accessors!(object, object_mut, alloc_object, ObjectRef, Object, Object);
    accessors!(array, array_mut, alloc_array, ArrayRef, Array, Array);
    accessors!(function, function_mut, alloc_function, FunctionRef, Function, Function);

    /// A thunk that is already forced.
    pub fn alloc_value(&mut self, value: Value) -> ThunkRef {
        self.alloc_thunk(Thunk::Forced(value))
    }

    /// Number of live slots.
    pub fn live(&self) -> usize {
        self.live
    }

    pub fn collections(&self) -> usize {
        self.collections
    }

    pub fn total_freed(&self) -> usize {
        self.total_freed
    }

    /// Whether a safepoint should collect under `policy`.
    pub fn should_collect(&self, policy: &GcPolicy) -> bool {
        self.live > policy.min_objects
            && self.live as f64 > policy.growth_trigger * self.live_after_last as f64
    }

    fn alloc(&mut self, entry: HeapEntry) -> Handle {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(index as usize) {
                slot.entry = Some(entry);
                slot.marked = false;
                return Handle {
                    index,
                    generation: slot.generation,
                };
            }
        }
        let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot {
            generation: 0,
            marked: false,
            entry: Some(entry),
        });
        Handle {
            index,
            generation: 0,
        }
    }

    fn entry(&self, handle: Handle) -> Result<&HeapEntry, EvalError> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entry.as_ref())
            .ok_or_else(|| stale(handle))
    }

    fn entry_mut(&mut self, handle: Handle) -> Result<&mut HeapEntry, EvalError> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entry.as_mut())
            .ok_or_else(|| stale(handle))
    }

    /// Whether `handle` still addresses a live slot.
    pub fn contains(&self, handle: Handle) -> bool {
        self.entry(handle).is_ok()
    }

    /// Mark everything reachable from `roots`, free the rest.
    pub fn collect(&mut self, roots: impl IntoIterator<Item = Handle>) -> CollectionStats {
        // Mark
        let mut worklist: Vec<Handle> = roots.into_iter().collect();
        let mut marked = 0;
        while let Some(handle) = worklist.pop() {
            let Some(slot) = self.slots.get_mut(handle.index as usize) else {
                continue;
            };
            if slot.marked || slot.generation != handle.generation {
                continue;
            }
            let Some(entry) = slot.entry.as_ref() else {
                continue;
            };
            slot.marked = true;
            marked += 1;
            entry.trace(&mut worklist);
        }

        // Sweep
        let mut freed = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.entry.is_none() {
                continue;
            }
            if slot.marked {
                slot.marked = false;
            } else {
                slot.entry = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
                freed += 1;
            }
        }

        self.live -= freed;
        self.live_after_last = self.live;
        self.collections += 1;
        self.total_freed += freed;
        debug!(
            collections = self.collections,
            live = self.live,
            freed,
            "gc"
        );
        CollectionStats { marked, freed }
    }
}

#[cold]
fn stale(handle: Handle) -> EvalError {
    internal(format!(
        "stale heap handle (slot {}, generation {})",
        handle.index, handle.generation
    ))
}
