//! Canonical IR: the sugar-free tree the evaluator runs.
//!
//! ```text
//! Source → Lex → Parse → Lower (sonnet_canon) → Check → sonnet_eval
//! ```
//!
//! # What's Different from `ast::ExprKind`
//!
//! - No `Field`/`SuperField` - `a.b` becomes `a["b"]`, `super.b` becomes `SuperIndex`
//! - No `Slice` - becomes a call to `std.slice`
//! - No `Assert` - becomes `if cond then rest else error msg`
//! - No `Dollar` - a `local $ = self` is injected into the outermost object
//! - No object `local`s - each field body is wrapped in the locals instead
//! - No `+:` fields - the body reads `super` explicitly
//! - No `!=`, `a { }` or `Parens`
//! - Added `Std` - the native standard library object

mod arena;
mod expr;
mod ids;

pub use arena::CanArena;
pub use expr::{CanArg, CanBind, CanExpr, CanField, CanFieldName, CanNode, CanParam, CanSpec};
pub use ids::{CanId, CanRange};
