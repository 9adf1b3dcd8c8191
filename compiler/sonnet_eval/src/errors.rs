//! Error types for evaluation and manifestation.
//!
//! # Structured Error Categories
//!
//! `EvalErrorKind` carries the typed error category; each kind maps to one
//! [`ErrorCode`]. Factory functions (e.g. [`division_by_zero`]) are the
//! public API: they fill in both `kind` and `message`.
//!
//! Location and trace are attached once, by the evaluator, at the innermost
//! expression that produced the error.

use std::fmt;

use sonnet_diagnostic::{Diagnostic, ErrorCode};
use sonnet_ir::{FileId, Span};

use crate::value::Value;

/// Result of evaluation.
pub type EvalResult<T = Value> = Result<T, EvalError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    /// `error e`, including failed assertions.
    User { message: String },

    // Type/Operator
    TypeMismatch {
        context: String,
        expected: String,
        got: String,
    },
    BinaryTypeMismatch {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },
    NotCallable { got: &'static str },
    NotIndexable { target: &'static str, index: &'static str },
    FunctionComparison,

    // Resources
    StackOverflow,
    InfiniteRecursion,

    // Access
    UnknownVariable { name: String },
    NoSuchField { field: String },
    IndexOutOfBounds { index: i64, len: usize },

    // Calls
    TooManyArgs { params: usize, got: usize },
    UnknownParameter { name: String },
    ParameterBoundTwice { name: String },
    MissingArgument { name: String },

    // Arithmetic
    DivisionByZero,
    Overflow,

    // Imports
    ImportNotFound { literal: String, reason: String },
    ImportCompile(Box<Diagnostic>),

    // Objects
    DuplicateField { name: String },

    // Builtins
    Builtin { name: &'static str, message: String },

    // Manifestation
    ManifestFunction,
    ManifestNonFinite,

    /// Invariant violation inside the evaluator.
    Internal { message: String },
}

impl EvalErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::User { .. } => ErrorCode::E6001,
            Self::TypeMismatch { .. }
            | Self::BinaryTypeMismatch { .. }
            | Self::NotCallable { .. }
            | Self::NotIndexable { .. }
            | Self::FunctionComparison => ErrorCode::E6002,
            Self::StackOverflow => ErrorCode::E6003,
            Self::InfiniteRecursion => ErrorCode::E6004,
            Self::UnknownVariable { .. } => ErrorCode::E6005,
            Self::NoSuchField { .. } => ErrorCode::E6006,
            Self::IndexOutOfBounds { .. } => ErrorCode::E6007,
            Self::TooManyArgs { .. }
            | Self::UnknownParameter { .. }
            | Self::ParameterBoundTwice { .. }
            | Self::MissingArgument { .. } => ErrorCode::E6008,
            Self::DivisionByZero => ErrorCode::E6009,
            Self::Overflow => ErrorCode::E6010,
            Self::ImportNotFound { .. } => ErrorCode::E6011,
            Self::ImportCompile(_) => ErrorCode::E6012,
            Self::DuplicateField { .. } => ErrorCode::E6013,
            Self::Builtin { .. } => ErrorCode::E6014,
            Self::ManifestFunction => ErrorCode::E7001,
            Self::ManifestNonFinite => ErrorCode::E7002,
            Self::Internal { .. } => ErrorCode::E9001,
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User { message } => f.write_str(message),

            Self::TypeMismatch {
                context,
                expected,
                got,
            } => write!(f, "{context}: expected {expected}, got {got}"),
            Self::BinaryTypeMismatch { op, left, right } => {
                write!(f, "binary operator {op} does not operate on {left} and {right}")
            }
            Self::NotCallable { got } => write!(f, "only functions can be called, got {got}"),
            Self::NotIndexable { target, index } => {
                write!(f, "value of type {target} cannot be indexed by {index}")
            }
            Self::FunctionComparison => write!(f, "cannot test equality of functions"),

            Self::StackOverflow => write!(f, "max stack frames exceeded."),
            Self::InfiniteRecursion => write!(f, "infinite recursion detected"),

            Self::UnknownVariable { name } => write!(f, "Unknown variable: {name}"),
            Self::NoSuchField { field } => write!(f, "field does not exist: {field}"),
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds, not within [0, {len})")
            }

            Self::TooManyArgs { params, got } => {
                let word = if *params == 1 { "parameter" } else { "parameters" };
                write!(f, "too many args, function has {params} {word}, got {got}")
            }
            Self::UnknownParameter { name } => {
                write!(f, "function has no parameter {name}")
            }
            Self::ParameterBoundTwice { name } => {
                write!(f, "binding parameter a second time: {name}")
            }
            Self::MissingArgument { name } => {
                write!(f, "function parameter {name} not bound in call")
            }

            Self::DivisionByZero => write!(f, "Division by zero."),
            Self::Overflow => write!(f, "Overflow"),

            Self::ImportNotFound { literal, reason } => {
                write!(f, "couldn't open import \"{literal}\": {reason}")
            }
            Self::ImportCompile(diagnostic) => f.write_str(&diagnostic.message),

            Self::DuplicateField { name } => write!(f, "duplicate field name: \"{name}\""),

            Self::Builtin { name, message } => write!(f, "std.{name}: {message}"),

            Self::ManifestFunction => write!(f, "couldn't manifest function as JSON"),
            Self::ManifestNonFinite => write!(f, "couldn't manifest a non-finite number"),

            Self::Internal { message } => write!(f, "internal error: {message}"),
        }
    }
}

/// One line of a stack trace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraceLine {
    Frame {
        file: FileId,
        span: Span,
        name: String,
    },
    /// Stands in for the frames dropped by `max_trace`.
    Elided { count: usize },
}

/// Snapshot of the frame stack at an error site, innermost first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalTrace {
    lines: Vec<TraceLine>,
}

impl EvalTrace {
    pub fn new(lines: Vec<TraceLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[TraceLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Keep the first `max / 2` and last `max - max / 2` lines, with an
    /// [`TraceLine::Elided`] marker between. `max == 0` keeps everything.
    #[must_use]
    pub fn truncated(mut self, max: usize) -> Self {
        if max == 0 || self.lines.len() <= max {
            return self;
        }
        let head = max / 2;
        let tail = max - head;
        let dropped = self.lines.len() - head - tail;
        let rest = self.lines.split_off(self.lines.len() - tail);
        self.lines.truncate(head);
        self.lines.push(TraceLine::Elided { count: dropped });
        self.lines.extend(rest);
        self
    }
}

/// Evaluation error.
#[derive(Clone, Debug)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Human-readable message; equals `kind.to_string()`.
    pub message: String,
    /// Innermost expression that produced the error.
    pub location: Option<(FileId, Span)>,
    /// Frame stack at the error site.
    pub trace: Option<EvalTrace>,
}

impl EvalError {
    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            location: None,
            trace: None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    /// Attach a location unless one is already set.
    #[must_use]
    pub fn at(mut self, file: FileId, span: Span) -> Self {
        if self.location.is_none() {
            self.location = Some((file, span));
        }
        self
    }

    #[must_use]
    pub fn with_trace(mut self, trace: EvalTrace) -> Self {
        self.trace = Some(trace);
        self
    }

    pub fn is_located(&self) -> bool {
        self.location.is_some()
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {}

// User errors

/// `error <msg>` or a failed assertion.
#[cold]
pub fn user_error(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::User {
        message: message.into(),
    })
}

// Type errors

/// A value of the wrong type reached `context`.
#[cold]
pub fn type_mismatch(context: impl Into<String>, expected: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        context: context.into(),
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

#[cold]
pub fn binary_type_mismatch(op: &'static str, left: &'static str, right: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::BinaryTypeMismatch { op, left, right })
}

#[cold]
pub fn not_callable(got: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable { got })
}

#[cold]
pub fn not_indexable(target: &'static str, index: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotIndexable { target, index })
}

#[cold]
pub fn function_comparison() -> EvalError {
    EvalError::from_kind(EvalErrorKind::FunctionComparison)
}

// Resource errors

#[cold]
pub fn stack_overflow() -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow)
}

#[cold]
pub fn infinite_recursion() -> EvalError {
    EvalError::from_kind(EvalErrorKind::InfiniteRecursion)
}

// Access errors

#[cold]
pub fn unknown_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn no_such_field(field: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoSuchField {
        field: field.to_string(),
    })
}

#[cold]
pub fn index_out_of_bounds(index: i64, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds { index, len })
}

// Call errors

#[cold]
pub fn too_many_args(params: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TooManyArgs { params, got })
}

#[cold]
pub fn unknown_parameter(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownParameter {
        name: name.to_string(),
    })
}

#[cold]
pub fn parameter_bound_twice(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ParameterBoundTwice {
        name: name.to_string(),
    })
}

#[cold]
pub fn missing_argument(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MissingArgument {
        name: name.to_string(),
    })
}

// Arithmetic errors

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn overflow() -> EvalError {
    EvalError::from_kind(EvalErrorKind::Overflow)
}

// Import errors

#[cold]
pub fn import_not_found(literal: &str, reason: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ImportNotFound {
        literal: literal.to_string(),
        reason: reason.into(),
    })
}

/// An imported file failed to lex, parse or check. The error keeps the
/// diagnostic's own location.
#[cold]
pub fn import_compile(diagnostic: Diagnostic) -> EvalError {
    let location = Some((diagnostic.file, diagnostic.span));
    let mut err = EvalError::from_kind(EvalErrorKind::ImportCompile(Box::new(diagnostic)));
    err.location = location;
    err
}

// Object errors

#[cold]
pub fn duplicate_field(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateField {
        name: name.to_string(),
    })
}

// Builtin errors

#[cold]
pub fn builtin_error(name: &'static str, message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Builtin {
        name,
        message: message.into(),
    })
}

// Manifestation errors

#[cold]
pub fn manifest_function() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ManifestFunction)
}

#[cold]
pub fn manifest_non_finite() -> EvalError {
    EvalError::from_kind(EvalErrorKind::ManifestNonFinite)
}

// Internal errors

#[cold]
pub fn internal(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Internal {
        message: message.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn frame(n: u32) -> TraceLine {
        TraceLine::Frame {
            file: FileId::ROOT,
            span: Span::new(n, n + 1),
            name: format!("f{n}"),
        }
    }

    #[test]
    fn messages_match_kinds() {
        assert_eq!(stack_overflow().message, "max stack frames exceeded.");
        assert_eq!(division_by_zero().message, "Division by zero.");
        assert_eq!(unknown_variable("x").message, "Unknown variable: x");
        assert_eq!(
            builtin_error("substr", "expected a string").message,
            "std.substr: expected a string"
        );
        assert_eq!(user_error("boom").message, "boom");
    }

    #[test]
    fn codes_follow_phases() {
        assert_eq!(user_error("x").code(), ErrorCode::E6001);
        assert_eq!(infinite_recursion().code(), ErrorCode::E6004);
        assert_eq!(manifest_function().code(), ErrorCode::E7001);
        assert_eq!(internal("stale").code(), ErrorCode::E9001);
    }

    #[test]
    fn first_location_wins() {
        let err = overflow()
            .at(FileId::ROOT, Span::new(1, 2))
            .at(FileId::ROOT, Span::new(5, 9));
        assert_eq!(err.location, Some((FileId::ROOT, Span::new(1, 2))));
    }

    #[test]
    fn short_traces_are_kept_whole() {
        let trace = EvalTrace::new((0..4).map(frame).collect()).truncated(20);
        assert_eq!(trace.len(), 4);
        let unlimited = EvalTrace::new((0..40).map(frame).collect()).truncated(0);
        assert_eq!(unlimited.len(), 40);
    }

    #[test]
    fn long_traces_keep_both_ends() {
        let trace = EvalTrace::new((0..10).map(frame).collect()).truncated(5);
        assert_eq!(
            trace.lines(),
            &[
                frame(0),
                frame(1),
                TraceLine::Elided { count: 5 },
                frame(7),
                frame(8),
                frame(9),
            ]
        );
    }
}
