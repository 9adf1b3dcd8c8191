//! String interner for identifiers and field names.
//!
//! One interner lives for the duration of one evaluation. Field names that
//! are only known at runtime (`{[k]: v}`, `std.objectHas(o, k)`) are interned
//! on the fly, so the table keeps growing while the interpreter runs.
//!
//! The interner is single-threaded (`RefCell`): an evaluation never shares
//! it, and independent evaluations each create their own.

use super::Name;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct InternTable {
    map: FxHashMap<Rc<str>, Name>,
    strings: Vec<Rc<str>>,
}

/// Interns strings into compact [`Name`]s.
pub struct StringInterner {
    table: RefCell<InternTable>,
}

impl StringInterner {
    /// Create an interner holding only the empty string (as [`Name::EMPTY`]).
    pub fn new() -> Self {
        let interner = StringInterner {
            table: RefCell::new(InternTable::default()),
        };
        let empty = interner.intern("");
        debug_assert_eq!(empty, Name::EMPTY);
        interner
    }

    /// Intern a string, returning its name.
    pub fn intern(&self, s: &str) -> Name {
        if let Some(&name) = self.table.borrow().map.get(s) {
            return name;
        }
        let mut table = self.table.borrow_mut();
        let index = u32::try_from(table.strings.len()).unwrap_or(u32::MAX);
        let name = Name::from_index(index);
        let text: Rc<str> = Rc::from(s);
        table.strings.push(Rc::clone(&text));
        table.map.insert(text, name);
        name
    }

    /// Intern an already shared string without copying it.
    pub fn intern_rc(&self, s: &Rc<str>) -> Name {
        if let Some(&name) = self.table.borrow().map.get(&**s) {
            return name;
        }
        let mut table = self.table.borrow_mut();
        let index = u32::try_from(table.strings.len()).unwrap_or(u32::MAX);
        let name = Name::from_index(index);
        table.strings.push(Rc::clone(s));
        table.map.insert(Rc::clone(s), name);
        name
    }

    /// Look up the text of a name.
    ///
    /// Unknown names (from another interner) resolve to the empty string.
    pub fn lookup(&self, name: Name) -> Rc<str> {
        self.table
            .borrow()
            .strings
            .get(name.index())
            .cloned()
            .unwrap_or_else(|| Rc::from(""))
    }

    /// Number of interned strings.
    pub fn len(&self) -> usize {
        self.table.borrow().strings.len()
    }

    /// Always false: the empty string is pre-interned.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent() {
        let interner = StringInterner::new();
        let a = interner.intern("field");
        let b = interner.intern("field");
        assert_eq!(a, b);
        assert_eq!(&*interner.lookup(a), "field");
    }

    #[test]
    fn empty_string_is_pre_interned() {
        let interner = StringInterner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn shared_strings_intern_to_same_name() {
        let interner = StringInterner::new();
        let text: Rc<str> = Rc::from("x");
        assert_eq!(interner.intern_rc(&text), interner.intern("x"));
    }
}
