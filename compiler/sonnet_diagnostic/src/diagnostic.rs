use std::fmt;

use sonnet_ir::{FileId, Span};

use crate::{ErrorCode, SourceMap};

/// Error taxonomy. Every failure of an evaluation belongs to exactly one
/// phase; all of them are terminal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Phase {
    Lex,
    Parse,
    Static,
    Runtime,
    Manifest,
}

impl Phase {
    /// Label used in rendered messages, e.g. `STATIC ERROR`.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Lex => "LEXER ERROR",
            Phase::Parse => "PARSE ERROR",
            Phase::Static => "STATIC ERROR",
            Phase::Runtime => "RUNTIME ERROR",
            Phase::Manifest => "MANIFEST ERROR",
        }
    }

    /// Phase implied by an error code.
    pub fn of(code: ErrorCode) -> Phase {
        if code.is_lexer_error() {
            Phase::Lex
        } else if code.is_parser_error() {
            Phase::Parse
        } else if code.is_static_error() {
            Phase::Static
        } else if code.is_manifest_error() {
            Phase::Manifest
        } else {
            Phase::Runtime
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A positioned compile-time error (lex, parse or static).
///
/// Compile-time errors never carry a stack trace: they abort before any
/// evaluation frame exists.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub message: String,
    pub file: FileId,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(code: ErrorCode, message: impl Into<String>, file: FileId, span: Span) -> Self {
        Diagnostic {
            code,
            message: message.into(),
            file,
            span,
        }
    }

    pub fn phase(&self) -> Phase {
        Phase::of(self.code)
    }

    /// Render as `<path>:<line>:<col> <PHASE> ERROR: <message>`.
    pub fn render(&self, sources: &SourceMap) -> String {
        format!(
            "{} {}: {}",
            sources.locate(self.file, self.span),
            self.phase(),
            self.message
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.phase(), self.code, self.message)
    }
}

impl std::error::Error for Diagnostic {}
