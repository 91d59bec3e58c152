pub mod arena;
pub mod constants;
pub mod decode;
pub mod error;
pub mod num;
pub mod options;
pub mod parallel;
pub mod types;

pub use crate::arena::{Arena, BlockList, Span};
pub use crate::decode::{Cursor, Document, Parsed};
pub use crate::error::{Error, ErrorKind, Location, SyntaxKind};
pub use crate::options::{ArenaOptions, ParseOptions, Whitespace};
pub use crate::parallel::parse_many;
pub use crate::types::{Node, Value, ValueKind};

pub type Result<T> = std::result::Result<T, Error>;

pub fn parse(input: &[u8]) -> Result<Document> {
    parse_with_options(input, &ParseOptions::default())
}

pub fn parse_with_options(input: &[u8], options: &ParseOptions) -> Result<Document> {
    decode::parse(input, options)
}

pub fn parse_str(input: &str) -> Result<Document> {
    parse(input.as_bytes())
}

/// Parses into a caller-owned arena, leaving the arena untouched on failure.
pub fn parse_in(arena: &mut Arena, input: &[u8], options: &ParseOptions) -> Result<Parsed> {
    decode::parse_in(arena, input, options)
}
