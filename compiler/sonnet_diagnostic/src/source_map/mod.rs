//! Registered source files and location rendering.

use crate::LineOffsetTable;
use sonnet_ir::{FileId, Span};
use std::fmt;
use std::rc::Rc;

/// One loaded source file.
#[derive(Debug)]
pub struct SourceFile {
    /// Path as reported in errors (the snippet's virtual filename, or the
    /// resolved import path).
    pub path: Rc<str>,
    pub text: Rc<str>,
    lines: LineOffsetTable,
}

impl SourceFile {
    pub fn new(path: impl Into<Rc<str>>, text: impl Into<Rc<str>>) -> Self {
        let text = text.into();
        let lines = LineOffsetTable::build(&text);
        SourceFile {
            path: path.into(),
            text,
            lines,
        }
    }

    /// 1-based (line, column) of a byte offset.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        self.lines.offset_to_line_col(&self.text, offset)
    }
}

/// A rendered source position: `path:line:col`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub path: Rc<str>,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.line, self.column)
    }
}

/// All files loaded during one evaluation, indexed by [`FileId`].
#[derive(Debug, Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file, returning its id.
    pub fn add(&mut self, file: SourceFile) -> FileId {
        let id = FileId::new(u32::try_from(self.files.len()).unwrap_or(u32::MAX));
        self.files.push(file);
        id
    }

    pub fn get(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.index())
    }

    /// Resolve a span start to a [`Location`].
    ///
    /// Unknown files render as `<unknown>:0:0` rather than failing: a
    /// location is only ever used to decorate an error that is already
    /// being reported.
    pub fn locate(&self, file: FileId, span: Span) -> Location {
        match self.get(file) {
            Some(source) => {
                let (line, column) = source.line_col(span.start);
                Location {
                    path: Rc::clone(&source.path),
                    line,
                    column,
                }
            }
            None => Location {
                path: Rc::from("<unknown>"),
                line: 0,
                column: 0,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests;
