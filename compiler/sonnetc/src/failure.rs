//! The single error type returned by the library entry points.
//!
//! Compile diagnostics and runtime errors are both flattened here, with every
//! location already resolved against the evaluation's source map. Nothing in
//! an `EvalFailure` borrows from the interpreter, so failures can cross
//! threads in batch mode.

use std::fmt;
use std::path::Path;

use sonnet_diagnostic::{Diagnostic, ErrorCode, Phase, SourceMap};
use sonnet_eval::{EvalError, EvalErrorKind, TraceLine};
use sonnet_ir::{FileId, Span};

/// A resolved `path:line:col`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub path: String,
    pub line: u32,
    pub column: u32,
}

impl Position {
    fn resolve(sources: &SourceMap, file: FileId, span: Span) -> Self {
        let location = sources.locate(file, span);
        Position {
            path: location.path.to_string(),
            line: location.line,
            column: location.column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.line, self.column)
    }
}

/// One rendered stack trace line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraceEntry {
    Frame { position: Position, name: String },
    Elided { count: usize },
}

/// Why an evaluation failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalFailure {
    pub phase: Phase,
    /// Absent when the input file itself could not be read.
    pub code: Option<ErrorCode>,
    pub message: String,
    pub position: Option<Position>,
    /// Innermost first. Empty for compile-time failures.
    pub trace: Vec<TraceEntry>,
}

impl EvalFailure {
    pub(crate) fn unreadable(path: &Path, err: &std::io::Error) -> Self {
        EvalFailure {
            phase: Phase::Runtime,
            code: None,
            message: format!("couldn't open {}: {err}", path.display()),
            position: None,
            trace: Vec::new(),
        }
    }

    pub(crate) fn from_diagnostic(diagnostic: &Diagnostic, sources: &SourceMap) -> Self {
        EvalFailure {
            phase: diagnostic.phase(),
            code: Some(diagnostic.code),
            message: diagnostic.message.clone(),
            position: Some(Position::resolve(sources, diagnostic.file, diagnostic.span)),
            trace: Vec::new(),
        }
    }

    /// A runtime error. An imported file that failed to compile reports its
    /// own phase and position, with the trace of the importing evaluation.
    pub(crate) fn from_eval(err: EvalError, sources: &SourceMap) -> Self {
        let trace = err
            .trace
            .as_ref()
            .map(|trace| {
                trace
                    .lines()
                    .iter()
                    .map(|line| match line {
                        TraceLine::Frame { file, span, name } => TraceEntry::Frame {
                            position: Position::resolve(sources, *file, *span),
                            name: name.clone(),
                        },
                        TraceLine::Elided { count } => TraceEntry::Elided { count: *count },
                    })
                    .collect()
            })
            .unwrap_or_default();

        if let EvalErrorKind::ImportCompile(diagnostic) = &err.kind {
            return EvalFailure {
                trace,
                ..Self::from_diagnostic(diagnostic, sources)
            };
        }

        let code = err.code();
        EvalFailure {
            phase: Phase::of(code),
            code: Some(code),
            message: err.message,
            position: err
                .location
                .map(|(file, span)| Position::resolve(sources, file, span)),
            trace,
        }
    }
}

impl fmt::Display for EvalFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.position {
            Some(position) => write!(f, "{position} {}: {}", self.phase, self.message)?,
            None => write!(f, "{}: {}", self.phase, self.message)?,
        }
        for entry in &self.trace {
            match entry {
                TraceEntry::Frame { position, name } => write!(f, "\n\t{position}\t{name}")?,
                TraceEntry::Elided { .. } => f.write_str("\n\t...")?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for EvalFailure {}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sonnet_diagnostic::SourceFile;
    use sonnet_eval::EvalTrace;

    use super::*;

    fn sources() -> (SourceMap, FileId) {
        let mut sources = SourceMap::new();
        let file = sources.add(SourceFile::new("main.jsonnet", "local f() = error 'x';\nf()"));
        (sources, file)
    }

    #[test]
    fn diagnostic_renders_phase_and_position() {
        let (sources, file) = sources();
        let diagnostic = Diagnostic::new(ErrorCode::E2001, "Unknown variable: y", file, Span::new(23, 24));
        let failure = EvalFailure::from_diagnostic(&diagnostic, &sources);
        assert_eq!(failure.to_string(), "main.jsonnet:2:1 STATIC ERROR: Unknown variable: y");
        assert!(failure.trace.is_empty());
    }

    #[test]
    fn runtime_error_renders_trace() {
        let (sources, file) = sources();
        let err = sonnet_eval::errors::user_error("x")
            .at(file, Span::new(12, 21))
            .with_trace(EvalTrace::new(vec![
                TraceLine::Frame {
                    file,
                    span: Span::new(12, 21),
                    name: "function <f>".to_string(),
                },
                TraceLine::Elided { count: 3 },
                TraceLine::Frame {
                    file,
                    span: Span::new(23, 26),
                    name: "$".to_string(),
                },
            ]));
        let failure = EvalFailure::from_eval(err, &sources);
        assert_eq!(failure.phase, Phase::Runtime);
        assert_eq!(
            failure.to_string(),
            "main.jsonnet:1:13 RUNTIME ERROR: x\n\tmain.jsonnet:1:13\tfunction <f>\n\t...\n\tmain.jsonnet:2:1\t$"
        );
    }

    #[test]
    fn unreadable_has_no_position() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let failure = EvalFailure::unreadable(Path::new("a.jsonnet"), &err);
        assert_eq!(failure.to_string(), "RUNTIME ERROR: couldn't open a.jsonnet: missing");
    }
}
