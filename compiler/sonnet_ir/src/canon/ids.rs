//! ID and range newtypes for the canonical IR.
//!
//! Typed indices into [`CanArena`](super::CanArena) storage. Ranges address
//! contiguous runs of the arena's side tables (argument lists, bindings,
//! fields, comprehension clauses).

use std::fmt;
use std::marker::PhantomData;

/// Index of a node in a [`CanArena`](super::CanArena).
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct CanId(u32);

impl CanId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Raw index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for CanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CanId({})", self.0)
    }
}

/// A contiguous run of side-table entries of type `T`.
///
/// `T` only tags which table the range belongs to, so a `CanRange<CanBind>`
/// cannot be used to read the field table.
pub struct CanRange<T> {
    start: u32,
    len: u32,
    _table: PhantomData<fn() -> T>,
}

impl<T> CanRange<T> {
    pub const EMPTY: Self = CanRange {
        start: 0,
        len: 0,
        _table: PhantomData,
    };

    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        CanRange {
            start,
            len,
            _table: PhantomData,
        }
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    #[inline]
    pub(crate) fn to_range(self) -> std::ops::Range<usize> {
        self.start as usize..(self.start + self.len) as usize
    }
}

// Manual impls: derives would require `T: Copy` etc.
impl<T> Clone for CanRange<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for CanRange<T> {}

impl<T> PartialEq for CanRange<T> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.len == other.len
    }
}

impl<T> Eq for CanRange<T> {}

impl<T> fmt::Debug for CanRange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CanRange({}..+{})", self.start, self.len)
    }
}
