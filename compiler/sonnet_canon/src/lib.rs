//! Canonicalization: surface AST → core tree, then static checks.
//!
//! ```text
//! ast::Expr ──lower──▶ CanArena ──check──▶ evaluator
//!                          │
//!                          └──dump──▶ text (debug_ast)
//! ```
//!
//! - [`lower_program`] removes every piece of sugar and wraps the program so
//!   `std` is bound to the native standard library.
//! - [`check`] rejects scoping mistakes before evaluation starts.
//! - [`dump`] renders a lowered tree as indented text.

mod check;
mod dump;
mod lower;

pub use check::{check, CheckOptions};
pub use dump::dump;
pub use lower::lower_program;

use sonnet_ir::{Name, StringInterner};

/// Names the lowering pass introduces and the checker recognises.
#[derive(Copy, Clone, Debug)]
pub(crate) struct WellKnown {
    pub std: Name,
    /// `$` is lowered to an ordinary variable that no source identifier can
    /// spell.
    pub dollar: Name,
    pub slice: Name,
    pub modulo: Name,
    pub assertion_failed: Name,
    pub empty: Name,
}

impl WellKnown {
    pub(crate) fn new(interner: &StringInterner) -> Self {
        WellKnown {
            std: interner.intern("std"),
            dollar: interner.intern("$"),
            slice: interner.intern("slice"),
            modulo: interner.intern("mod"),
            assertion_failed: interner.intern("Assertion failed"),
            empty: interner.intern(""),
        }
    }
}
