//! Parse error type.
//!
//! Lexer errors are folded into `ParseError` so the parser has a single
//! error path; the phase survives through the error code.

use std::fmt;

use sonnet_diagnostic::{Diagnostic, ErrorCode};
use sonnet_ir::{FileId, Span};
use sonnet_lexer::LexError;

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
        }
    }

    pub fn to_diagnostic(&self, file: FileId) -> Diagnostic {
        Diagnostic::new(self.code, self.message.clone(), file, self.span)
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::new(err.code(), err.to_string(), err.span)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ParseError {}
