//! Byte cursor over source text.
//!
//! Jsonnet's lexical structure is ASCII apart from string and comment
//! contents, so the cursor works on bytes and only the cooking layer
//! (escapes, text blocks) looks at characters. Line comments and block
//! comments are skipped with `memchr`.

use memchr::memmem;

pub(crate) struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Cursor {
            bytes: source.as_bytes(),
            pos: 0,
        }
    }

    #[inline]
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) fn set_pos(&mut self, pos: usize) {
        self.pos = pos.min(self.bytes.len());
    }

    #[inline]
    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Current byte, or `0` at end of input.
    #[inline]
    pub(crate) fn current(&self) -> u8 {
        self.peek(0)
    }

    /// Byte `n` positions ahead, or `0` past the end.
    #[inline]
    pub(crate) fn peek(&self, n: usize) -> u8 {
        self.bytes.get(self.pos + n).copied().unwrap_or(0)
    }

    /// Whether the remaining input starts with `prefix`.
    #[inline]
    pub(crate) fn starts_with(&self, prefix: &[u8]) -> bool {
        self.bytes
            .get(self.pos..)
            .is_some_and(|rest| rest.starts_with(prefix))
    }

    #[inline]
    pub(crate) fn advance(&mut self) {
        if self.pos < self.bytes.len() {
            self.pos += 1;
        }
    }

    #[inline]
    pub(crate) fn advance_by(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.bytes.len());
    }

    /// Skip spaces, tabs, carriage returns and newlines.
    pub(crate) fn eat_whitespace(&mut self) {
        while matches!(self.current(), b' ' | b'\t' | b'\r' | b'\n') {
            self.pos += 1;
        }
    }

    /// Skip horizontal whitespace only; returns how many bytes were skipped.
    pub(crate) fn eat_horizontal_whitespace(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.current(), b' ' | b'\t') {
            self.pos += 1;
        }
        self.pos - start
    }

    /// Move to the next `\n` (not consumed) or to the end of input.
    pub(crate) fn eat_until_newline_or_eof(&mut self) {
        let rest = &self.bytes[self.pos..];
        match memchr::memchr(b'\n', rest) {
            Some(offset) => self.pos += offset,
            None => self.pos = self.bytes.len(),
        }
    }

    /// Move just past the next `*/`. Returns `false` (cursor at end of
    /// input) if there is none.
    pub(crate) fn eat_block_comment_body(&mut self) -> bool {
        let rest = &self.bytes[self.pos..];
        match memmem::find(rest, b"*/") {
            Some(offset) => {
                self.pos += offset + 2;
                true
            }
            None => {
                self.pos = self.bytes.len();
                false
            }
        }
    }

    /// Move just past the closing `quote` of a quoted string body, skipping
    /// backslash escapes. Returns `false` (cursor at end of input) if the
    /// string is unterminated.
    pub(crate) fn eat_quoted_body(&mut self, quote: u8) -> bool {
        loop {
            let rest = &self.bytes[self.pos..];
            match memchr::memchr2(quote, b'\\', rest) {
                Some(offset) if rest[offset] == b'\\' => self.advance_by(offset + 2),
                Some(offset) => {
                    self.pos += offset + 1;
                    return true;
                }
                None => {
                    self.pos = self.bytes.len();
                    return false;
                }
            }
        }
    }

    /// Like [`Cursor::eat_quoted_body`] for verbatim strings, where a doubled
    /// quote stands for itself and backslashes are ordinary.
    pub(crate) fn eat_verbatim_body(&mut self, quote: u8) -> bool {
        loop {
            let rest = &self.bytes[self.pos..];
            let Some(offset) = memchr::memchr(quote, rest) else {
                self.pos = self.bytes.len();
                return false;
            };
            self.pos += offset + 1;
            if self.current() == quote {
                self.pos += 1;
            } else {
                return true;
            }
        }
    }

    pub(crate) fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while !self.is_eof() && pred(self.current()) {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests;
