//! Names interned once at `Interpreter` construction.
//!
//! Builtin calls bind arguments by parameter name, so the parameter lists
//! are interned up front rather than on every call.

use sonnet_ir::{Name, StringInterner};

use crate::builtins::Builtin;

pub(crate) struct KnownNames {
    pub(crate) this_file: Name,
    /// Parameter names per builtin, indexed by `Builtin as usize`.
    builtin_params: Vec<Vec<Name>>,
}

impl KnownNames {
    pub(crate) fn new(interner: &StringInterner) -> Self {
        let builtin_params = Builtin::ALL
            .iter()
            .map(|builtin| {
                builtin
                    .params()
                    .iter()
                    .map(|param| interner.intern(param))
                    .collect()
            })
            .collect();
        KnownNames {
            this_file: interner.intern("thisFile"),
            builtin_params,
        }
    }

    pub(crate) fn builtin_params(&self, builtin: Builtin) -> &[Name] {
        self.builtin_params
            .get(builtin as usize)
            .map_or(&[], Vec::as_slice)
    }
}
