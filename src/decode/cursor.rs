use crate::constants::{is_json_whitespace, is_space};
use crate::error::SyntaxKind;
use crate::options::Whitespace;
use crate::{Error, Result};

/// Remaining unparsed input. Cursors only move forward; every parse step takes
/// one by value and hands back the advanced position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    input: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, offset: 0 }
    }

    /// Byte offset from the start of the input.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.offset..]
    }

    pub fn len(&self) -> usize {
        self.input.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.offset).copied()
    }

    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.remaining().starts_with(prefix)
    }

    pub fn skip_whitespace(self, whitespace: Whitespace) -> Self {
        let is_skippable: fn(u8) -> bool = match whitespace {
            Whitespace::SpaceOnly => is_space,
            Whitespace::Json => is_json_whitespace,
        };
        let skipped = self
            .remaining()
            .iter()
            .take_while(|&&byte| is_skippable(byte))
            .count();
        Self {
            input: self.input,
            offset: self.offset + skipped,
        }
    }

    pub fn drop_first_n(self, n: usize) -> Result<Self> {
        if n > self.len() {
            return Err(self.error_at_end());
        }
        Ok(Self {
            input: self.input,
            offset: self.offset + n,
        })
    }

    pub fn error(&self, kind: SyntaxKind) -> Error {
        Error::syntax(kind, self.input, self.offset)
    }

    pub fn error_at(&self, kind: SyntaxKind, offset: usize) -> Error {
        Error::syntax(kind, self.input, offset)
    }

    /// Attaches this cursor's position to an error raised outside the grammar.
    pub fn locate(&self, err: Error) -> Error {
        err.with_location(self.input, self.offset)
    }

    pub fn error_at_end(&self) -> Error {
        Error::syntax(SyntaxKind::UnexpectedEnd, self.input, self.input.len())
    }
}
