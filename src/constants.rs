pub const NULL_LITERAL: &[u8] = b"null";

pub const TRUE_LITERAL: &[u8] = b"true";

pub const FALSE_LITERAL: &[u8] = b"false";

/// Slots per block in a `BlockList`. Traversal relies on this being a power of two.
pub const BLOCK_CAPACITY: usize = 16;

pub const PAGE_SIZE: usize = 4096;

pub const DEFAULT_RESERVE_SIZE: usize = 64 * 1024 * 1024;

pub const DEFAULT_COMMIT_SIZE: usize = 64 * 1024;

pub const MAX_DEPTH: usize = 256;

#[inline]
pub fn is_space(byte: u8) -> bool {
    byte == b' '
}

#[inline]
pub fn is_json_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

#[inline]
pub fn starts_number(byte: u8) -> bool {
    byte.is_ascii_digit() || byte == b'-' || byte == b'+'
}
