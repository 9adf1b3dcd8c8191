//! Tokenizer for Jsonnet source text.
//!
//! The lexer is lazy: [`Lexer`] yields one token at a time and can be
//! restarted from the beginning. String literals are cooked as they are
//! lexed, so the parser only ever sees interned string values.
//!
//! - Quoted strings with JSON escapes plus `\'`
//! - Verbatim strings (`@"..."`, `@'...'`)
//! - `|||` text blocks with indentation stripping
//! - Comments: `//`, `#` and `/* */`

mod cursor;
mod escape;
mod lex_error;
mod lexer;
mod text_block;

pub use lex_error::{LexError, LexErrorKind};
pub use lexer::{lex, Lexer};
