//! Native stack growth for deep recursion.
//!
//! The parser, desugarer, checker and evaluator all recurse over the
//! expression tree. Jsonnet programs bound their own depth through the
//! configured `max_stack`, so the native stack must never be the limit that
//! trips first: every recursive entry point goes through
//! [`ensure_sufficient_stack`], which grows the stack on demand.
//!
//! - **Native targets**: `stacker::maybe_grow`.
//! - **WASM targets**: passthrough.

/// Remaining stack below which a new segment is allocated (128KB).
///
/// A single evaluator step (binary operator, call binding, manifest of one
/// value) keeps well under this.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2MB).
const STACK_PER_RECURSION: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the native stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly (WASM has its own stack management).
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
