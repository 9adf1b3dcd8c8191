//! Import resolution.
//!
//! The interpreter never touches the filesystem itself: every `import` and
//! `importstr` goes through an [`ImportResolver`]. [`FileResolver`] is the
//! default, probing the importing file's directory and then each library
//! search directory (`jpath`) in order.

use std::fmt;
use std::path::{Path, PathBuf};

/// A located import: where it was found and what it contains.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedImport {
    /// Path reported in errors and used as the cache key.
    pub path: PathBuf,
    pub contents: String,
}

/// Why an import could not be loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportError {
    /// No candidate path exists.
    NotFound { searched: Vec<PathBuf> },
    /// A candidate exists but could not be read.
    Unreadable { path: PathBuf, message: String },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::NotFound { searched } => {
                let searched = searched
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "no match locally or in library paths (searched: {searched})")
            }
            ImportError::Unreadable { path, message } => {
                write!(f, "{}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for ImportError {}

/// Locates and loads imported files.
pub trait ImportResolver {
    /// Resolve `literal` as written in `importing_file`.
    fn resolve(&mut self, importing_file: &Path, literal: &str)
        -> Result<ResolvedImport, ImportError>;
}

/// Filesystem resolver: the importing file's directory, then `jpath` in
/// order. Absolute literals are used as-is.
#[derive(Clone, Debug, Default)]
pub struct FileResolver {
    jpath: Vec<PathBuf>,
}

impl FileResolver {
    pub fn new(jpath: Vec<PathBuf>) -> Self {
        FileResolver { jpath }
    }

    /// Paths to try for `literal`, in priority order.
    fn candidates(&self, importing_file: &Path, literal: &str) -> Vec<PathBuf> {
        let literal = Path::new(literal);
        if literal.is_absolute() {
            return vec![literal.to_path_buf()];
        }
        let current_dir = importing_file.parent().unwrap_or(Path::new(""));
        std::iter::once(current_dir.join(literal))
            .chain(self.jpath.iter().map(|dir| dir.join(literal)))
            .collect()
    }
}

impl ImportResolver for FileResolver {
    fn resolve(
        &mut self,
        importing_file: &Path,
        literal: &str,
    ) -> Result<ResolvedImport, ImportError> {
        let candidates = self.candidates(importing_file, literal);
        for path in &candidates {
            if !path.is_file() {
                continue;
            }
            return match std::fs::read_to_string(path) {
                Ok(contents) => Ok(ResolvedImport {
                    path: path.clone(),
                    contents,
                }),
                Err(err) => Err(ImportError::Unreadable {
                    path: path.clone(),
                    message: err.to_string(),
                }),
            };
        }
        Err(ImportError::NotFound {
            searched: candidates,
        })
    }
}

#[cfg(test)]
mod tests;
