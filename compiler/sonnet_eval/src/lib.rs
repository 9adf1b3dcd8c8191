//! Sonnet Eval - lazy evaluator for the canonical Jsonnet tree.
//!
//! # Architecture
//!
//! - `interpreter`: `Interpreter`, the per-evaluation owner of the heap,
//!   names, tree, sources and import cache; `eval_can` dispatches on
//!   `CanExpr`
//! - `heap`: slot arena with generation-tagged handles and a mark-sweep
//!   collector
//! - `value`: forced values and the heap-resident thunks, environments,
//!   objects, arrays and functions
//! - `operators`: unary and binary operators, equality and ordering
//! - `builtins`: the native `std` object
//! - `manifest`: JSON output
//! - `import`: the `ImportResolver` trait and the filesystem resolver
//! - `errors` / `diagnostics`: runtime error kinds, traces and the frame
//!   stack
//!
//! Values are lazy: every array element, object field, local binding and
//! call argument is a thunk forced at most once.

mod builtins;
pub mod diagnostics;
pub mod errors;
pub mod heap;
pub mod import;
pub mod interpreter;
mod manifest;
mod operators;
pub mod value;

pub use builtins::Builtin;
pub use errors::{EvalError, EvalErrorKind, EvalResult, EvalTrace, TraceLine};
pub use heap::{CollectionStats, GcPolicy, Heap};
pub use import::{FileResolver, ImportError, ImportResolver, ResolvedImport};
pub use interpreter::{EvalOptions, Interpreter};
pub use manifest::{escape_string, format_number};
pub use value::Value;
