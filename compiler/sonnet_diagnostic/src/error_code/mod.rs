use std::fmt;

/// Error codes for all evaluator diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E0xxx: Lexer errors
/// - E1xxx: Parser errors
/// - E2xxx: Static check errors
/// - E6xxx: Runtime errors
/// - E7xxx: Manifestation errors
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Unterminated string literal
    E0001,
    /// Invalid character in source
    E0002,
    /// Invalid number literal
    E0003,
    /// Invalid escape sequence
    E0004,
    /// Unterminated block comment
    E0005,
    /// Malformed text block (`|||`)
    E0006,

    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed delimiter
    E1003,
    /// Expected identifier
    E1004,
    /// Malformed object member
    E1005,
    /// Import path must be a string literal
    E1006,
    /// Positional argument after named argument
    E1007,

    // Static Errors (E2xxx)
    /// Unknown variable
    E2001,
    /// Duplicate parameter
    E2002,
    /// Duplicate local binding
    E2003,
    /// Duplicate field name
    E2004,
    /// `self`/`super`/`$` outside of an object
    E2005,

    // Runtime Errors (E6xxx)
    /// User `error` expression or failed assertion
    E6001,
    /// Type error
    E6002,
    /// Stack depth exceeded
    E6003,
    /// Infinite recursion through a thunk
    E6004,
    /// Unknown variable at runtime
    E6005,
    /// Field does not exist
    E6006,
    /// Index out of bounds
    E6007,
    /// Wrong arguments in a call
    E6008,
    /// Division by zero
    E6009,
    /// Arithmetic overflow
    E6010,
    /// Import could not be resolved
    E6011,
    /// Imported file failed to compile
    E6012,
    /// Duplicate field in a constructed object
    E6013,
    /// Builtin argument error
    E6014,

    // Manifestation Errors (E7xxx)
    /// Function reached manifestation
    E7001,
    /// Non-finite number reached manifestation
    E7002,

    // Internal Errors (E9xxx)
    /// Invariant violation inside the evaluator
    E9001,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E0006 => "E0006",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E6003 => "E6003",
            ErrorCode::E6004 => "E6004",
            ErrorCode::E6005 => "E6005",
            ErrorCode::E6006 => "E6006",
            ErrorCode::E6007 => "E6007",
            ErrorCode::E6008 => "E6008",
            ErrorCode::E6009 => "E6009",
            ErrorCode::E6010 => "E6010",
            ErrorCode::E6011 => "E6011",
            ErrorCode::E6012 => "E6012",
            ErrorCode::E6013 => "E6013",
            ErrorCode::E6014 => "E6014",
            ErrorCode::E7001 => "E7001",
            ErrorCode::E7002 => "E7002",
            ErrorCode::E9001 => "E9001",
        }
    }

    pub fn is_lexer_error(&self) -> bool {
        self.as_str().starts_with("E0")
    }

    pub fn is_parser_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    pub fn is_static_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    pub fn is_runtime_error(&self) -> bool {
        self.as_str().starts_with("E6")
    }

    pub fn is_manifest_error(&self) -> bool {
        self.as_str().starts_with("E7")
    }

    pub fn is_internal_error(&self) -> bool {
        self.as_str().starts_with("E9")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
