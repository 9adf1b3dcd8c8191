//! Sonnet IR - shared data types for every phase of the evaluator.
//!
//! - Spans and file ids for source locations
//! - Interned names
//! - Tokens produced by the lexer
//! - The surface AST produced by the parser (`ast`)
//! - The canonical core tree consumed by the evaluator (`canon`)
//!
//! # Design Philosophy
//!
//! - **Intern names**: identifiers and field names are `Name(u32)`
//! - **Flatten the core tree**: `CanId(u32)` indices into one arena per
//!   evaluation, with side tables for variable-length children
//! - **Keep the surface tree simple**: it lives for one lowering pass only

pub mod ast;
pub mod canon;
mod interner;
mod name;
mod operators;
mod span;
mod token;

pub use interner::StringInterner;
pub use name::Name;
pub use operators::{BinaryOp, UnaryOp, Visibility};
pub use span::{FileId, Span};
pub use token::{StrStyle, Token, TokenKind};
