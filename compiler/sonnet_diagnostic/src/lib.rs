//! Diagnostic plumbing shared by every phase.
//!
//! - [`ErrorCode`]: one searchable code per error condition, grouped by phase
//! - [`Phase`]: the error taxonomy (lex, parse, static, runtime, manifest)
//! - [`Diagnostic`]: a compile-time error with its location
//! - [`SourceMap`]: registered files and byte-offset → line/column mapping
//!
//! Every error ends up rendered in the `<path>:<line>:<col> <message>`
//! convention, so the line/column mapping lives here rather than in each
//! phase.

mod diagnostic;
mod error_code;
mod source_map;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Phase};
pub use error_code::ErrorCode;
pub use source_map::{Location, SourceFile, SourceMap};
pub use span_utils::LineOffsetTable;
