//! Manifestation: forced values to JSON text.
//!
//! Two layouts share one walker. The multi-line layout puts every array
//! element and object field on its own line at the given indent; the
//! compact layout (used by `std.toString` and string concatenation) keeps
//! everything on one line with `", "` separators. Empty containers print as
//! `[ ]` and `{ }` in both.

use std::fmt::Write as _;

use sonnet_stack::ensure_sufficient_stack;

use crate::errors::{manifest_function, manifest_non_finite, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::Value;

#[derive(Copy, Clone)]
enum Layout<'a> {
    Multiline { indent: &'a str },
    Compact,
}

/// JSON text for a number: integers without a fractional part, otherwise
/// the shortest decimal that reads back as the same double. Very large and
/// very small magnitudes use exponent notation.
pub fn format_number(n: f64) -> String {
    let magnitude = n.abs();
    if n.fract() == 0.0 && magnitude < 1e21 {
        format!("{n}")
    } else if magnitude >= 1e21 || (magnitude > 0.0 && magnitude < 1e-6) {
        format!("{n:e}")
    } else {
        format!("{n}")
    }
}

/// `text` as a quoted JSON string. Non-ASCII passes through unescaped.
pub fn escape_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c < ' ' || c == '\u{7f}' => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl Interpreter {
    /// Multi-line JSON with `indent` per level, without a trailing newline.
    pub fn manifest_multiline(&mut self, value: &Value, indent: &str) -> EvalResult<String> {
        let mut out = String::new();
        self.manifest_into(value, Layout::Multiline { indent }, &mut String::new(), &mut out)?;
        Ok(out)
    }

    /// Single-line JSON.
    pub fn manifest_compact(&mut self, value: &Value) -> EvalResult<String> {
        let mut out = String::new();
        self.manifest_into(value, Layout::Compact, &mut String::new(), &mut out)?;
        Ok(out)
    }

    /// Stack-safe: nesting depth is bounded by the heap, not the native stack.
    fn manifest_into(
        &mut self,
        value: &Value,
        layout: Layout<'_>,
        current: &mut String,
        out: &mut String,
    ) -> EvalResult<()> {
        ensure_sufficient_stack(|| self.manifest_value(value, layout, current, out))
    }

    fn manifest_value(
        &mut self,
        value: &Value,
        layout: Layout<'_>,
        current: &mut String,
        out: &mut String,
    ) -> EvalResult<()> {
        match value {
            Value::Null => out.push_str("null"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => {
                if !n.is_finite() {
                    return Err(manifest_non_finite());
                }
                out.push_str(&format_number(*n));
            }
            Value::Str(text) => out.push_str(&escape_string(text)),
            Value::Function(_) => return Err(manifest_function()),
            Value::Array(array) => {
                let elements = self.heap.array(*array)?.elements.clone();
                if elements.is_empty() {
                    out.push_str("[ ]");
                    return Ok(());
                }
                out.push('[');
                let outer = current.len();
                for (i, thunk) in elements.into_iter().enumerate() {
                    separator(layout, i, current, out);
                    let element = self.force_element(thunk)?;
                    self.manifest_into(&element, layout, current, out)?;
                }
                close(layout, outer, current, out, ']');
            }
            Value::Object(object) => {
                self.ensure_asserts(*object, None)?;
                let names = self.heap.object(*object)?.visible_names();
                if names.is_empty() {
                    out.push_str("{ }");
                    return Ok(());
                }
                out.push('{');
                let outer = current.len();
                for (i, name) in names.into_iter().enumerate() {
                    separator(layout, i, current, out);
                    let field = self.field_value(*object, name)?;
                    self.root(&field);
                    out.push_str(&escape_string(&self.interner.lookup(name)));
                    out.push_str(": ");
                    self.manifest_into(&field, layout, current, out)?;
                }
                close(layout, outer, current, out, '}');
            }
        }
        Ok(())
    }
}

/// Start item `i` of a container; the first item also opens a level.
fn separator(layout: Layout<'_>, i: usize, current: &mut String, out: &mut String) {
    match layout {
        Layout::Multiline { indent } => {
            if i == 0 {
                current.push_str(indent);
            } else {
                out.push(',');
            }
            out.push('\n');
            out.push_str(current);
        }
        Layout::Compact => {
            if i > 0 {
                out.push_str(", ");
            }
        }
    }
}

fn close(layout: Layout<'_>, outer: usize, current: &mut String, out: &mut String, bracket: char) {
    if let Layout::Multiline { .. } = layout {
        current.truncate(outer);
        out.push('\n');
        out.push_str(current);
    }
    out.push(bracket);
}
