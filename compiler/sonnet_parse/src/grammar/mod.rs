//! Grammar productions, as `impl Parser` blocks.
//!
//! - `expr`: the binary operator chain, unary, postfix and terminals
//! - `object`: object literals and object comprehensions
//! - `params`: parameters, call arguments, `local` binds, comprehension clauses

mod expr;
mod object;
mod params;
