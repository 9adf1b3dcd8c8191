//! Canonical expression arena.
//!
//! [`CanArena`] uses struct-of-arrays layout (parallel `kinds`, `spans`,
//! `files` arrays indexed by [`CanId`]) plus flat side tables addressed by
//! [`CanRange`]s. One arena holds every file of an evaluation: imports are
//! lowered into the same arena as they are first loaded, so a `CanId` is
//! valid for the whole evaluation.

use super::expr::{CanArg, CanBind, CanExpr, CanField, CanNode, CanParam, CanSpec};
use super::ids::{CanId, CanRange};
use crate::{FileId, Span};

fn to_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Arena for canonical expressions.
#[derive(Clone, Debug, Default)]
pub struct CanArena {
    kinds: Vec<CanExpr>,
    spans: Vec<Span>,
    files: Vec<FileId>,
    /// File that newly pushed nodes belong to.
    current_file: FileId,
    expr_lists: Vec<CanId>,
    binds: Vec<CanBind>,
    params: Vec<CanParam>,
    args: Vec<CanArg>,
    fields: Vec<CanField>,
    specs: Vec<CanSpec>,
}

impl CanArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the file that subsequently pushed nodes are attributed to.
    pub fn set_current_file(&mut self, file: FileId) {
        self.current_file = file;
    }

    /// Allocate a node, returning its ID.
    pub fn push(&mut self, node: CanNode) -> CanId {
        let id = CanId::new(to_u32(self.kinds.len()));
        self.kinds.push(node.kind);
        self.spans.push(node.span);
        self.files.push(self.current_file);
        id
    }

    /// Expression kind of a node.
    #[inline]
    pub fn kind(&self, id: CanId) -> CanExpr {
        self.kinds.get(id.index()).copied().unwrap_or(CanExpr::Null)
    }

    /// Source span of a node.
    #[inline]
    pub fn span(&self, id: CanId) -> Span {
        self.spans.get(id.index()).copied().unwrap_or(Span::DUMMY)
    }

    /// File a node was lowered from.
    #[inline]
    pub fn file(&self, id: CanId) -> FileId {
        self.files.get(id.index()).copied().unwrap_or(FileId::ROOT)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn push_expr_list(&mut self, ids: &[CanId]) -> CanRange<CanId> {
        push_slice(&mut self.expr_lists, ids)
    }

    pub fn push_binds(&mut self, binds: &[CanBind]) -> CanRange<CanBind> {
        push_slice(&mut self.binds, binds)
    }

    pub fn push_params(&mut self, params: &[CanParam]) -> CanRange<CanParam> {
        push_slice(&mut self.params, params)
    }

    pub fn push_args(&mut self, args: &[CanArg]) -> CanRange<CanArg> {
        push_slice(&mut self.args, args)
    }

    pub fn push_fields(&mut self, fields: &[CanField]) -> CanRange<CanField> {
        push_slice(&mut self.fields, fields)
    }

    pub fn push_specs(&mut self, specs: &[CanSpec]) -> CanRange<CanSpec> {
        push_slice(&mut self.specs, specs)
    }

    pub fn expr_list(&self, range: CanRange<CanId>) -> &[CanId] {
        slice(&self.expr_lists, range)
    }

    pub fn binds(&self, range: CanRange<CanBind>) -> &[CanBind] {
        slice(&self.binds, range)
    }

    pub fn params(&self, range: CanRange<CanParam>) -> &[CanParam] {
        slice(&self.params, range)
    }

    pub fn args(&self, range: CanRange<CanArg>) -> &[CanArg] {
        slice(&self.args, range)
    }

    pub fn fields(&self, range: CanRange<CanField>) -> &[CanField] {
        slice(&self.fields, range)
    }

    pub fn specs(&self, range: CanRange<CanSpec>) -> &[CanSpec] {
        slice(&self.specs, range)
    }
}

fn push_slice<T: Copy>(table: &mut Vec<T>, items: &[T]) -> CanRange<T> {
    if items.is_empty() {
        return CanRange::EMPTY;
    }
    let start = to_u32(table.len());
    table.extend_from_slice(items);
    CanRange::new(start, to_u32(items.len()))
}

fn slice<T>(table: &[T], range: CanRange<T>) -> &[T] {
    table.get(range.to_range()).unwrap_or(&[])
}
