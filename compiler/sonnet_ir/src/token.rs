//! Token types produced by `sonnet_lexer`.

use super::{Name, Span};
use std::fmt;

/// A token with its span in the source.
#[derive(Clone, Copy, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.span)
    }
}

/// How a string literal was written.
///
/// All styles cook to the same value; the style only matters for
/// diagnostics and the AST dump.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum StrStyle {
    /// `"..."`
    Double,
    /// `'...'`
    Single,
    /// `@"..."`
    VerbatimDouble,
    /// `@'...'`
    VerbatimSingle,
    /// `|||` block
    Block,
}

/// Token kinds.
///
/// Literal payloads are already cooked: escapes resolved, block-string
/// indentation stripped, numbers parsed.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum TokenKind {
    Ident(Name),
    Number(f64),
    Str(Name, StrStyle),

    // Keywords
    Assert,
    Else,
    Error,
    False,
    For,
    Function,
    If,
    Import,
    ImportStr,
    In,
    Local,
    Null,
    SelfKw,
    Super,
    TailStrict,
    Then,
    True,

    // Delimiters
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Dot,
    Semicolon,
    Colon,
    DoubleColon,
    TripleColon,
    Dollar,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Tilde,
    Amp,
    Pipe,
    Caret,
    AmpAmp,
    PipePipe,
    Eq,
    EqEq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Shl,
    Shr,

    Eof,
}

impl TokenKind {
    /// Resolve a keyword from identifier text.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        Some(match text {
            "assert" => TokenKind::Assert,
            "else" => TokenKind::Else,
            "error" => TokenKind::Error,
            "false" => TokenKind::False,
            "for" => TokenKind::For,
            "function" => TokenKind::Function,
            "if" => TokenKind::If,
            "import" => TokenKind::Import,
            "importstr" => TokenKind::ImportStr,
            "in" => TokenKind::In,
            "local" => TokenKind::Local,
            "null" => TokenKind::Null,
            "self" => TokenKind::SelfKw,
            "super" => TokenKind::Super,
            "tailstrict" => TokenKind::TailStrict,
            "then" => TokenKind::Then,
            "true" => TokenKind::True,
            _ => return None,
        })
    }

    /// Human-readable description for "expected X, got Y" messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Ident(_) => "identifier",
            TokenKind::Number(_) => "number",
            TokenKind::Str(..) => "string",
            TokenKind::Assert => "assert",
            TokenKind::Else => "else",
            TokenKind::Error => "error",
            TokenKind::False => "false",
            TokenKind::For => "for",
            TokenKind::Function => "function",
            TokenKind::If => "if",
            TokenKind::Import => "import",
            TokenKind::ImportStr => "importstr",
            TokenKind::In => "in",
            TokenKind::Local => "local",
            TokenKind::Null => "null",
            TokenKind::SelfKw => "self",
            TokenKind::Super => "super",
            TokenKind::TailStrict => "tailstrict",
            TokenKind::Then => "then",
            TokenKind::True => "true",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::DoubleColon => "::",
            TokenKind::TripleColon => ":::",
            TokenKind::Dollar => "$",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Bang => "!",
            TokenKind::Tilde => "~",
            TokenKind::Amp => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::AmpAmp => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::Eq => "=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::LtEq => "<=",
            TokenKind::GtEq => ">=",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::Eof => "end of file",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_resolve() {
        assert_eq!(TokenKind::keyword("local"), Some(TokenKind::Local));
        assert_eq!(TokenKind::keyword("importstr"), Some(TokenKind::ImportStr));
        assert_eq!(TokenKind::keyword("locals"), None);
    }

    #[test]
    fn display_names_are_source_text() {
        assert_eq!(TokenKind::TripleColon.display_name(), ":::");
        assert_eq!(TokenKind::Eof.display_name(), "end of file");
    }
}
