//! Frame stack for the interpreter.
//!
//! - `CallFrame`: what was entered (function, field, thunk, import) and
//!   from where
//! - `CallStack`: the live frames, with the `max_stack` check built into
//!   `push()`
//!
//! Frames double as GC roots: a frame keeps the environment it runs in and
//! the thunk it is forcing alive until it is popped.

use std::rc::Rc;

use sonnet_ir::{FileId, Name, Span, StringInterner};

use crate::errors::{stack_overflow, EvalError, EvalTrace, TraceLine};
use crate::heap::{EnvRef, Handle, ThunkRef};

/// What a frame is evaluating, for stack traces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameName {
    /// A closure, by declared name ([`Name::EMPTY`] if anonymous).
    Function(Name),
    Builtin(&'static str),
    Field(Name),
    /// A variable or argument thunk ([`Name::EMPTY`] if anonymous).
    Thunk(Name),
    Assert,
    Import(Rc<str>),
}

impl FrameName {
    fn describe(&self, interner: &StringInterner) -> String {
        let named = |kind: &str, name: Name| {
            if name == Name::EMPTY {
                format!("{kind} <anonymous>")
            } else {
                format!("{kind} <{}>", interner.lookup(name))
            }
        };
        match self {
            FrameName::Function(name) => named("function", *name),
            FrameName::Builtin(name) => format!("builtin function <{name}>"),
            FrameName::Field(name) => named("field", *name),
            FrameName::Thunk(name) => named("thunk", *name),
            FrameName::Assert => "object assert".to_string(),
            FrameName::Import(path) => format!("import <{path}>"),
        }
    }
}

/// One live frame.
#[derive(Clone, Debug)]
pub struct CallFrame {
    pub name: FrameName,
    /// Expression that entered the frame.
    pub site: Option<(FileId, Span)>,
    pub env: Option<EnvRef>,
    pub thunk: Option<ThunkRef>,
}

impl CallFrame {
    pub fn new(name: FrameName, site: Option<(FileId, Span)>) -> Self {
        CallFrame {
            name,
            site,
            env: None,
            thunk: None,
        }
    }

    #[must_use]
    pub fn with_env(mut self, env: EnvRef) -> Self {
        self.env = Some(env);
        self
    }

    #[must_use]
    pub fn with_thunk(mut self, thunk: ThunkRef) -> Self {
        self.thunk = Some(thunk);
        self
    }
}

/// Live frame stack, bounded by `max_stack`.
#[derive(Clone, Debug)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: usize,
}

impl CallStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a frame, checking the depth limit. The frame is not pushed on
    /// overflow.
    pub fn push(&mut self, frame: CallFrame) -> Result<(), EvalError> {
        if self.frames.len() >= self.max_depth {
            return Err(stack_overflow());
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) {
        debug_assert!(
            !self.frames.is_empty(),
            "CallStack::pop() called on empty stack"
        );
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Handles the frames keep alive.
    pub fn roots(&self) -> impl Iterator<Item = Handle> + '_ {
        self.frames.iter().flat_map(|frame| {
            frame
                .env
                .map(EnvRef::handle)
                .into_iter()
                .chain(frame.thunk.map(ThunkRef::handle))
        })
    }

    /// Snapshot the stack for an error raised at `site`.
    ///
    /// Each line pairs a location with the frame it lies in: the error site
    /// with the innermost frame, each frame's entry site with the frame
    /// below it, and the outermost entry site with the top level (`$`).
    pub fn capture(&self, site: (FileId, Span), interner: &StringInterner) -> EvalTrace {
        let mut lines = Vec::with_capacity(self.frames.len() + 1);
        let mut location = site;
        for frame in self.frames.iter().rev() {
            lines.push(TraceLine::Frame {
                file: location.0,
                span: location.1,
                name: frame.name.describe(interner),
            });
            if let Some(entered_from) = frame.site {
                location = entered_from;
            }
        }
        lines.push(TraceLine::Frame {
            file: location.0,
            span: location.1,
            name: "$".to_string(),
        });
        EvalTrace::new(lines)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(start: u32) -> Option<(FileId, Span)> {
        Some((FileId::ROOT, Span::new(start, start + 1)))
    }

    #[test]
    fn push_respects_limit() {
        let mut stack = CallStack::new(2);
        stack.push(CallFrame::new(FrameName::Assert, None)).unwrap();
        stack.push(CallFrame::new(FrameName::Assert, None)).unwrap();
        let err = stack
            .push(CallFrame::new(FrameName::Assert, None))
            .unwrap_err();
        assert_eq!(err.message, "max stack frames exceeded.");
        assert_eq!(stack.depth(), 2);
        stack.pop();
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn capture_pairs_sites_with_enclosing_frames() {
        let interner = StringInterner::new();
        let f = interner.intern("f");
        let x = interner.intern("x");
        let mut stack = CallStack::new(10);
        stack
            .push(CallFrame::new(FrameName::Thunk(x), at(3)))
            .unwrap();
        stack
            .push(CallFrame::new(FrameName::Function(f), at(7)))
            .unwrap();

        let trace = stack.capture((FileId::ROOT, Span::new(20, 25)), &interner);
        let names: Vec<(u32, String)> = trace
            .lines()
            .iter()
            .map(|line| match line {
                TraceLine::Frame { span, name, .. } => (span.start, name.clone()),
                TraceLine::Elided { .. } => (0, "...".to_string()),
            })
            .collect();
        assert_eq!(
            names,
            vec![
                (20, "function <f>".to_string()),
                (7, "thunk <x>".to_string()),
                (3, "$".to_string()),
            ]
        );
    }

    #[test]
    fn anonymous_frames_are_labelled() {
        let interner = StringInterner::new();
        assert_eq!(
            FrameName::Function(Name::EMPTY).describe(&interner),
            "function <anonymous>"
        );
        assert_eq!(
            FrameName::Builtin("map").describe(&interner),
            "builtin function <map>"
        );
    }
}
