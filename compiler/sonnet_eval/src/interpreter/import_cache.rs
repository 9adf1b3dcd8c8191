//! `import` and `importstr`.
//!
//! Two cache levels keep each distinct import to one resolver call and one
//! evaluation: `(importing directory, literal)` maps to the resolved path,
//! and each resolved path holds its contents and, once imported as code,
//! the thunk of its top-level expression.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use rustc_hash::FxHashMap;
use sonnet_ir::canon::CanId;
use sonnet_ir::Name;
use tracing::debug;

use super::Interpreter;
use crate::diagnostics::FrameName;
use crate::errors::{import_compile, import_not_found, internal, EvalResult};
use crate::heap::{Handle, ThunkRef};
use crate::value::{Thunk, Value};

struct CachedImport {
    contents: Rc<str>,
    /// Set on the first `import`; `importstr` never sets it.
    thunk: Option<ThunkRef>,
}

#[derive(Default)]
pub(super) struct ImportCache {
    resolved: FxHashMap<(PathBuf, Name), PathBuf>,
    files: FxHashMap<PathBuf, CachedImport>,
}

impl ImportCache {
    /// Thunks of every file imported as code.
    pub(super) fn roots(&self) -> impl Iterator<Item = Handle> + '_ {
        self.files
            .values()
            .filter_map(|file| file.thunk.map(ThunkRef::handle))
    }

    pub(super) fn len(&self) -> usize {
        self.files.len()
    }
}

impl Interpreter {
    /// Resolved path of `literal` as written at `expr`, calling the
    /// resolver only on a cache miss.
    fn resolve_import(&mut self, expr: CanId, literal: Name) -> EvalResult<PathBuf> {
        let importing = self.file_path(expr);
        let dir = importing.parent().map_or_else(PathBuf::new, Path::to_path_buf);
        let key = (dir, literal);
        if let Some(path) = self.imports.resolved.get(&key) {
            return Ok(path.clone());
        }

        let text = self.interner.lookup(literal);
        let resolved = self
            .resolver
            .resolve(&importing, &text)
            .map_err(|err| import_not_found(&text, err.to_string()))?;
        debug!(literal = %text, path = %resolved.path.display(), "resolved import");

        let path = resolved.path;
        self.imports
            .files
            .entry(path.clone())
            .or_insert_with(|| CachedImport {
                contents: Rc::from(resolved.contents),
                thunk: None,
            });
        self.imports.resolved.insert(key, path.clone());
        Ok(path)
    }

    fn cached_import(&self, path: &Path) -> EvalResult<&CachedImport> {
        self.imports
            .files
            .get(path)
            .ok_or_else(|| internal("import cache lost a resolved path"))
    }

    /// `import "literal"`: evaluate the file once, then reuse its value.
    pub(super) fn import_code(&mut self, expr: CanId, literal: Name) -> EvalResult {
        let path = self.resolve_import(expr, literal)?;
        let shown: Rc<str> = Rc::from(path.to_string_lossy().as_ref());

        let thunk = match self.cached_import(&path)?.thunk {
            Some(thunk) => thunk,
            None => {
                let contents = Rc::clone(&self.cached_import(&path)?.contents);
                let root = self
                    .compile(&shown, contents)
                    .map_err(import_compile)?;
                let thunk = self.heap.alloc_thunk(Thunk::Code {
                    expr: root,
                    env: self.root_env,
                });
                if let Some(file) = self.imports.files.get_mut(&path) {
                    file.thunk = Some(thunk);
                }
                debug!(path = %shown, files = self.imports.len(), "compiled import");
                thunk
            }
        };
        self.force(thunk, FrameName::Import(shown), self.site(expr))
    }

    /// `importstr "literal"`: the file's contents as a string.
    pub(super) fn import_string(&mut self, expr: CanId, literal: Name) -> EvalResult {
        let path = self.resolve_import(expr, literal)?;
        let contents = Rc::clone(&self.cached_import(&path)?.contents);
        Ok(Value::Str(contents))
    }
}
