//! Lexer error types.
//!
//! A `LexError` is the `span` of the offending text plus a `kind`. It is
//! converted to a [`Diagnostic`] at the crate boundary, once the caller
//! knows which file was being lexed.

use std::fmt;

use sonnet_diagnostic::{Diagnostic, ErrorCode};
use sonnet_ir::{FileId, Span};

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexError {
    pub span: Span,
    pub kind: LexErrorKind,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum LexErrorKind {
    /// Missing closing quote.
    UnterminatedString,
    /// A byte that cannot start any token.
    InvalidChar { ch: char },
    /// A number with a leading zero, an empty fraction or an empty exponent.
    InvalidNumber { reason: &'static str },
    /// `\q` and friends.
    InvalidEscape { escape: String },
    /// `\u` not followed by four hex digits, or an unpaired surrogate.
    InvalidUnicodeEscape,
    /// `/*` with no matching `*/`.
    UnterminatedComment,
    /// Structural problem in a `|||` text block.
    TextBlock { reason: &'static str },
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        LexError { span, kind }
    }

    pub fn unterminated_string(span: Span) -> Self {
        Self::new(LexErrorKind::UnterminatedString, span)
    }

    pub fn invalid_char(span: Span, ch: char) -> Self {
        Self::new(LexErrorKind::InvalidChar { ch }, span)
    }

    pub fn invalid_number(span: Span, reason: &'static str) -> Self {
        Self::new(LexErrorKind::InvalidNumber { reason }, span)
    }

    pub fn invalid_escape(span: Span, escape: impl Into<String>) -> Self {
        Self::new(
            LexErrorKind::InvalidEscape {
                escape: escape.into(),
            },
            span,
        )
    }

    pub fn text_block(span: Span, reason: &'static str) -> Self {
        Self::new(LexErrorKind::TextBlock { reason }, span)
    }

    pub fn code(&self) -> ErrorCode {
        match self.kind {
            LexErrorKind::UnterminatedString => ErrorCode::E0001,
            LexErrorKind::InvalidChar { .. } => ErrorCode::E0002,
            LexErrorKind::InvalidNumber { .. } => ErrorCode::E0003,
            LexErrorKind::InvalidEscape { .. } | LexErrorKind::InvalidUnicodeEscape => {
                ErrorCode::E0004
            }
            LexErrorKind::UnterminatedComment => ErrorCode::E0005,
            LexErrorKind::TextBlock { .. } => ErrorCode::E0006,
        }
    }

    pub fn to_diagnostic(&self, file: FileId) -> Diagnostic {
        Diagnostic::new(self.code(), self.to_string(), file, self.span)
    }
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::UnterminatedString => f.write_str("unterminated string"),
            LexErrorKind::InvalidChar { ch } => write!(f, "could not lex the character {ch:?}"),
            LexErrorKind::InvalidNumber { reason } => write!(f, "couldn't lex number, {reason}"),
            LexErrorKind::InvalidEscape { escape } => {
                write!(f, "unknown escape sequence in string literal: '\\{escape}'")
            }
            LexErrorKind::InvalidUnicodeEscape => {
                f.write_str("invalid \\u escape sequence in string literal")
            }
            LexErrorKind::UnterminatedComment => f.write_str("multi-line comment has no terminating */"),
            LexErrorKind::TextBlock { reason } => f.write_str(reason),
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl std::error::Error for LexError {}
