//! Evaluation settings shared by the library entry points and the CLI.

use std::path::PathBuf;

use rustc_hash::FxHashMap;
use sonnet_eval::{EvalOptions, GcPolicy};

/// Settings for one evaluation.
///
/// Built with `Default` plus chained `with_*` setters:
///
/// ```text
/// let config = EvalConfig::default()
///     .with_max_stack(200)
///     .with_external_var("env", "prod");
/// ```
#[derive(Clone, Debug)]
pub struct EvalConfig {
    /// Frames before evaluation fails with a stack overflow.
    pub max_stack: usize,
    /// No collection below this many live heap objects.
    pub gc_min_objects: usize,
    /// Collect when live objects exceed this multiple of the last survivors.
    pub gc_growth_trigger: f64,
    /// Trace lines kept in runtime errors; `0` keeps them all.
    pub max_trace: usize,
    /// Render the lowered tree instead of evaluating.
    pub debug_ast: bool,
    pub external_vars: FxHashMap<String, String>,
    /// Library search directories, tried after the importing file's own.
    pub jpath: Vec<PathBuf>,
    pub strict_variables: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        let gc = GcPolicy::default();
        EvalConfig {
            max_stack: 500,
            gc_min_objects: gc.min_objects,
            gc_growth_trigger: gc.growth_trigger,
            max_trace: 20,
            debug_ast: false,
            external_vars: FxHashMap::default(),
            jpath: Vec::new(),
            strict_variables: false,
        }
    }
}

impl EvalConfig {
    #[must_use]
    pub fn with_max_stack(mut self, max_stack: usize) -> Self {
        self.max_stack = max_stack;
        self
    }

    #[must_use]
    pub fn with_gc_min_objects(mut self, min_objects: usize) -> Self {
        self.gc_min_objects = min_objects;
        self
    }

    #[must_use]
    pub fn with_gc_growth_trigger(mut self, growth_trigger: f64) -> Self {
        self.gc_growth_trigger = growth_trigger;
        self
    }

    #[must_use]
    pub fn with_max_trace(mut self, max_trace: usize) -> Self {
        self.max_trace = max_trace;
        self
    }

    #[must_use]
    pub fn with_debug_ast(mut self, debug_ast: bool) -> Self {
        self.debug_ast = debug_ast;
        self
    }

    #[must_use]
    pub fn with_external_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.external_vars.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_jpath(mut self, dir: impl Into<PathBuf>) -> Self {
        self.jpath.push(dir.into());
        self
    }

    #[must_use]
    pub fn with_strict_variables(mut self, strict: bool) -> Self {
        self.strict_variables = strict;
        self
    }

    pub(crate) fn eval_options(&self) -> EvalOptions {
        EvalOptions {
            max_stack: self.max_stack,
            gc: GcPolicy {
                min_objects: self.gc_min_objects,
                growth_trigger: self.gc_growth_trigger,
            },
            max_trace: self.max_trace,
            external_vars: self.external_vars.clone(),
            strict_variables: self.strict_variables,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EvalConfig::default();
        assert_eq!(config.max_stack, 500);
        assert_eq!(config.gc_min_objects, 1000);
        assert!((config.gc_growth_trigger - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.max_trace, 20);
        assert!(!config.debug_ast);
        assert!(!config.strict_variables);
    }

    #[test]
    fn setters_flow_into_eval_options() {
        let options = EvalConfig::default()
            .with_max_stack(7)
            .with_gc_min_objects(3)
            .with_max_trace(0)
            .with_external_var("a", "b")
            .with_strict_variables(true)
            .eval_options();
        assert_eq!(options.max_stack, 7);
        assert_eq!(options.gc.min_objects, 3);
        assert_eq!(options.max_trace, 0);
        assert_eq!(options.external_vars.get("a").map(String::as_str), Some("b"));
        assert!(options.strict_variables);
    }
}
