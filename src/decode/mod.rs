pub mod cursor;
mod parser;

use crate::arena::Arena;
use crate::error::SyntaxKind;
use crate::types::{Node, Value};
use crate::{ParseOptions, Result};

pub use cursor::Cursor;
use parser::Parser;

/// Root value of a parse plus how many input bytes it consumed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parsed {
    pub value: Value,
    pub consumed: usize,
}

/// A parsed tree together with the arena that owns its storage.
#[derive(Debug)]
pub struct Document {
    arena: Arena,
    root: Value,
    consumed: usize,
}

impl Document {
    pub fn root(&self) -> Node<'_> {
        Node::new(&self.arena, self.root)
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn into_parts(self) -> (Arena, Parsed) {
        let parsed = Parsed {
            value: self.root,
            consumed: self.consumed,
        };
        (self.arena, parsed)
    }
}

pub fn parse(input: &[u8], options: &ParseOptions) -> Result<Document> {
    let mut arena = Arena::with_options(&options.arena)?;
    let parsed = parse_in(&mut arena, input, options)?;
    Ok(Document {
        arena,
        root: parsed.value,
        consumed: parsed.consumed,
    })
}

/// Parses one value into an existing arena.
///
/// On failure the arena is rewound to where it stood before the call, so no
/// partially built tree is left behind.
pub fn parse_in(arena: &mut Arena, input: &[u8], options: &ParseOptions) -> Result<Parsed> {
    let checkpoint = arena.checkpoint();
    let result = parse_root(arena, input, options);
    if let Err(err) = &result {
        tracing::debug!(kind = ?err.kind, offset = ?err.offset(), "parse failed");
        arena.rewind(checkpoint);
    }
    result
}

fn parse_root(arena: &mut Arena, input: &[u8], options: &ParseOptions) -> Result<Parsed> {
    let mut parser = Parser::new(arena, options);
    let (value, cursor) = parser.parse_value(Cursor::new(input), 0)?;
    if options.require_eof {
        let rest = parser.skip(cursor);
        if !rest.is_empty() {
            return Err(rest.error(SyntaxKind::TrailingContent));
        }
    }
    Ok(Parsed {
        value,
        consumed: cursor.offset(),
    })
}
