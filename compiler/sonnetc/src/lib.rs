//! Sonnet - a lazy Jsonnet evaluator.
//!
//! # Architecture
//!
//! ```text
//! source ──► sonnet_lexer ──► sonnet_parse ──► sonnet_canon ──► sonnet_eval ──► JSON
//!             tokens           surface AST      core tree +       thunks, heap,
//!                                               static check      manifest
//! ```
//!
//! This crate is the boundary: [`evaluate_file`] and [`evaluate_snippet`]
//! build one [`Interpreter`](sonnet_eval::Interpreter) per call from an
//! [`EvalConfig`] and flatten every failure into an [`EvalFailure`].
//! Interpreters share nothing, so calls may run concurrently.

pub mod cli;
mod config;
mod failure;

use std::path::Path;
use std::rc::Rc;

use sonnet_eval::{FileResolver, Interpreter};
use tracing::debug;

pub use config::EvalConfig;
pub use failure::{EvalFailure, Position, TraceEntry};

/// Evaluate the file at `path` to multi-line JSON terminated by a newline.
pub fn evaluate_file(path: impl AsRef<Path>, config: &EvalConfig) -> Result<String, EvalFailure> {
    let path = path.as_ref();
    let source =
        std::fs::read_to_string(path).map_err(|err| EvalFailure::unreadable(path, &err))?;
    evaluate_snippet(&path.to_string_lossy(), &source, config)
}

/// Evaluate `source` as if read from `filename`. Relative imports resolve
/// against `filename`'s directory.
#[tracing::instrument(level = "debug", skip(source, config))]
pub fn evaluate_snippet(
    filename: &str,
    source: &str,
    config: &EvalConfig,
) -> Result<String, EvalFailure> {
    let resolver = FileResolver::new(config.jpath.clone());
    let mut interp = Interpreter::with_resolver(config.eval_options(), Box::new(resolver));

    let root = match interp.compile(filename, Rc::from(source)) {
        Ok(root) => root,
        Err(diagnostic) => return Err(EvalFailure::from_diagnostic(&diagnostic, interp.sources())),
    };
    if config.debug_ast {
        return Ok(interp.dump(root));
    }

    let result = interp.evaluate_to_json(root);
    debug!(
        files = interp.sources().len(),
        collections = interp.heap().collections(),
        ok = result.is_ok(),
        "evaluation finished"
    );
    result.map_err(|err| EvalFailure::from_eval(err, interp.sources()))
}
