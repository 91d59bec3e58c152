use crate::constants::BLOCK_CAPACITY;
use crate::types::Value;
use crate::{Error, Result};

use super::{Arena, BlockId};

/// Append-only sequence stored as a chain of fixed-capacity arena blocks.
///
/// Objects reuse the same storage with keys at even indices and values at odd
/// indices. Elements are never moved once written, and a new block is only
/// taken from the arena when the current last block is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockList {
    head: Option<BlockId>,
    last: Option<BlockId>,
    len: u32,
}

impl BlockList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn head(&self) -> Option<BlockId> {
        self.head
    }

    /// False once the arena has been reset past the generation this list was built in.
    pub(crate) fn is_readable(&self, arena: &Arena) -> bool {
        self.head.is_none_or(|head| arena.block(head).is_some())
    }

    pub fn append(&mut self, arena: &mut Arena, value: Value) -> Result<()> {
        let len = self.len();
        let next_len = self
            .len
            .checked_add(1)
            .ok_or_else(|| Error::exhausted("block list length overflow"))?;
        let slot = len % BLOCK_CAPACITY;

        let target = match self.last {
            Some(last) if slot != 0 => last,
            previous => {
                let id = arena.alloc_block()?;
                match previous {
                    Some(last) => {
                        let block = arena.block_mut(last).ok_or_else(released_block)?;
                        block.next = Some(id);
                    }
                    None => self.head = Some(id),
                }
                self.last = Some(id);
                id
            }
        };

        let block = arena.block_mut(target).ok_or_else(released_block)?;
        block.values[slot] = value;
        self.len = next_len;
        Ok(())
    }

    /// Walks from the head, one block per `BLOCK_CAPACITY` elements.
    pub fn get(&self, arena: &Arena, index: usize) -> Option<Value> {
        if index >= self.len() {
            return None;
        }
        let mut current = self.head?;
        for _ in 0..index / BLOCK_CAPACITY {
            current = arena.block(current)?.next?;
        }
        arena
            .block(current)
            .map(|block| block.values[index % BLOCK_CAPACITY])
    }

    pub fn iter<'a>(&self, arena: &'a Arena) -> BlockIter<'a> {
        BlockIter {
            arena,
            block: self.head,
            index: 0,
            len: self.len(),
        }
    }
}

fn released_block() -> Error {
    Error::exhausted("block list refers to a block released by a reset")
}

#[derive(Debug, Clone)]
pub struct BlockIter<'a> {
    arena: &'a Arena,
    block: Option<BlockId>,
    index: usize,
    len: usize,
}

impl Iterator for BlockIter<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        if self.index >= self.len {
            return None;
        }
        let block = self.arena.block(self.block?)?;
        let value = block.values[self.index % BLOCK_CAPACITY];
        self.index += 1;
        if self.index % BLOCK_CAPACITY == 0 {
            self.block = block.next;
        }
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (0, Some(remaining))
    }
}
