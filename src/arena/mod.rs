//! Region allocator backing every parsed document.
//!
//! An [`Arena`] reserves its whole address range once at creation and commits
//! backing storage lazily, in whole multiples of `commit_size`, as the bump
//! offset moves forward. The reservation is never grown, so committed bytes
//! never move and a [`Span`] stays valid until the arena is reset or dropped.
//!
//! Container blocks live in an index-addressed slab next to the byte region.
//! Each block is charged against the same byte budget, so a document that
//! needs more than `reserved_size` fails with `AllocationExhausted` whether it
//! is heavy on strings or on elements.
//!
//! Spans and block ids carry the arena generation they were handed out in.
//! `reset` starts a new generation, so lookups through anything taken before
//! the reset come back empty instead of reading the next document's data.

pub mod blocks;

use std::fmt;
use std::mem::size_of;

use crate::constants::{BLOCK_CAPACITY, PAGE_SIZE};
use crate::options::ArenaOptions;
use crate::types::Value;
use crate::{Error, Result};

pub use blocks::{BlockIter, BlockList};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub len: usize,
    generation: u32,
}

impl Span {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId {
    index: u32,
    generation: u32,
}

impl BlockId {
    pub fn index(self) -> usize {
        self.index as usize
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Block {
    pub(crate) values: [Value; BLOCK_CAPACITY],
    pub(crate) next: Option<BlockId>,
}

impl Block {
    const FOOTPRINT: usize = size_of::<Block>();

    fn empty() -> Self {
        Self {
            values: [Value::Null; BLOCK_CAPACITY],
            next: None,
        }
    }
}

/// Restore point taken before a parse so a failed parse can be rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Checkpoint {
    offset: usize,
    blocks: usize,
}

pub struct Arena {
    region: Vec<u8>,
    blocks: Vec<Block>,
    reserved_size: usize,
    commit_size: usize,
    offset: usize,
    commits: usize,
    generation: u32,
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("reserved_size", &self.reserved_size)
            .field("commit_size", &self.commit_size)
            .field("committed_size", &self.region.len())
            .field("offset", &self.offset)
            .field("blocks", &self.blocks.len())
            .field("generation", &self.generation)
            .finish()
    }
}

impl Arena {
    /// Reserves `reserve_size` bytes of address space without committing any of it.
    pub fn new(reserve_size: usize, commit_size: usize) -> Result<Self> {
        if commit_size == 0 || !commit_size.is_multiple_of(PAGE_SIZE) {
            return Err(Error::reservation(format!(
                "commit size {commit_size} is not a positive multiple of the page size {PAGE_SIZE}"
            )));
        }
        if commit_size > reserve_size {
            return Err(Error::reservation(format!(
                "commit size {commit_size} exceeds reserve size {reserve_size}"
            )));
        }

        let mut region = Vec::new();
        region.try_reserve_exact(reserve_size).map_err(|err| {
            Error::reservation(format!("unable to reserve {reserve_size} bytes: {err}"))
        })?;
        tracing::debug!(reserve_size, commit_size, "arena reserved");

        Ok(Self {
            region,
            blocks: Vec::new(),
            reserved_size: reserve_size,
            commit_size,
            offset: 0,
            commits: 0,
            generation: 0,
        })
    }

    pub fn with_options(options: &ArenaOptions) -> Result<Self> {
        Self::new(options.reserve_size, options.commit_size)
    }

    pub fn reserved_size(&self) -> usize {
        self.reserved_size
    }

    pub fn commit_size(&self) -> usize {
        self.commit_size
    }

    pub fn committed_size(&self) -> usize {
        self.region.len()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of times backing storage had to be committed since creation.
    pub fn commit_count(&self) -> usize {
        self.commits
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Bumped by every `reset`.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Carves `size` zeroed bytes from the region.
    pub fn allocate(&mut self, size: usize) -> Result<Span> {
        let span = self.carve(size)?;
        self.region[span.start..span.end()].fill(0);
        Ok(span)
    }

    /// Carves room for `bytes` and copies them in.
    pub fn alloc_bytes(&mut self, bytes: &[u8]) -> Result<Span> {
        let span = self.carve(bytes.len())?;
        self.region[span.start..span.end()].copy_from_slice(bytes);
        Ok(span)
    }

    /// Returns the bytes behind `span`, or `None` if the span lies past the
    /// offset or was handed out before the last reset.
    pub fn bytes(&self, span: Span) -> Option<&[u8]> {
        if !self.holds(span) {
            return None;
        }
        self.region.get(span.start..span.end())
    }

    pub fn bytes_mut(&mut self, span: Span) -> Option<&mut [u8]> {
        if !self.holds(span) {
            return None;
        }
        self.region.get_mut(span.start..span.end())
    }

    fn holds(&self, span: Span) -> bool {
        span.generation == self.generation && span.end() <= self.offset
    }

    /// Rewinds the offset to zero and forgets every block.
    ///
    /// Committed storage is kept, so refilling up to the previous high-water
    /// mark commits nothing new. Spans and block lists handed out before the
    /// reset read as empty from then on.
    pub fn reset(&mut self) {
        tracing::debug!(
            offset = self.offset,
            committed = self.region.len(),
            generation = self.generation,
            "arena reset"
        );
        self.offset = 0;
        self.blocks.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Releases the reservation. Dropping the arena does the same.
    pub fn destroy(self) {
        tracing::debug!(reserved = self.reserved_size, "arena released");
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            offset: self.offset,
            blocks: self.blocks.len(),
        }
    }

    pub(crate) fn rewind(&mut self, checkpoint: Checkpoint) {
        self.offset = checkpoint.offset.min(self.offset);
        self.blocks.truncate(checkpoint.blocks);
    }

    pub(crate) fn alloc_block(&mut self) -> Result<BlockId> {
        let index = u32::try_from(self.blocks.len())
            .map_err(|_| Error::exhausted("block index space exhausted"))?;
        let id = BlockId {
            index,
            generation: self.generation,
        };
        self.carve(Block::FOOTPRINT)?;
        self.blocks.push(Block::empty());
        Ok(id)
    }

    pub(crate) fn block(&self, id: BlockId) -> Option<&Block> {
        if id.generation != self.generation {
            return None;
        }
        self.blocks.get(id.index())
    }

    pub(crate) fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        if id.generation != self.generation {
            return None;
        }
        self.blocks.get_mut(id.index())
    }

    fn carve(&mut self, size: usize) -> Result<Span> {
        let end = self
            .offset
            .checked_add(size)
            .filter(|&end| end <= self.reserved_size)
            .ok_or_else(|| {
                Error::exhausted(format!(
                    "allocation of {size} bytes at offset {} exceeds reserved size {}",
                    self.offset, self.reserved_size
                ))
            })?;
        self.ensure_committed(end)?;
        let span = Span {
            start: self.offset,
            len: size,
            generation: self.generation,
        };
        self.offset = end;
        Ok(span)
    }

    fn ensure_committed(&mut self, required: usize) -> Result<()> {
        let committed = self.region.len();
        if required <= committed {
            return Ok(());
        }
        let shortfall = required - committed;
        let increments = shortfall.div_ceil(self.commit_size);
        let target = increments
            .checked_mul(self.commit_size)
            .and_then(|grow| committed.checked_add(grow))
            .map_or(self.reserved_size, |target| target.min(self.reserved_size));
        if target > self.region.capacity() {
            return Err(Error::exhausted(format!(
                "commit to {target} bytes exceeds reservation"
            )));
        }
        self.region.resize(target, 0);
        self.commits += 1;
        tracing::trace!(committed = target, "arena commit");
        Ok(())
    }
}
