//! Ordered block list for a single loaded document.
//!
//! A [`BlockStore`] is pure in-memory bookkeeping and never fails. After any
//! [`load`](BlockStore::load) or [`upsert`](BlockStore::upsert) the list is
//! sorted by position (ties broken by id) and holds no duplicate ids.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::types::{Block, BlockPatch};

/// Position-sorted blocks of one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockStore {
    blocks: Vec<Block>,
}

impl BlockStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `blocks` (see [`load`](Self::load)).
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        let mut store = Self::new();
        store.load(blocks);
        store
    }

    /// Replace the whole list.
    ///
    /// Duplicate ids keep their first occurrence. Loading the same rows twice
    /// yields the same store.
    pub fn load(&mut self, blocks: Vec<Block>) {
        let mut seen = HashSet::with_capacity(blocks.len());
        let mut deduped: Vec<Block> = blocks
            .into_iter()
            .filter(|block| seen.insert(block.id.clone()))
            .collect();
        deduped.sort_by(Block::display_order);
        self.blocks = deduped;
    }

    /// Insert or replace a block.
    ///
    /// An existing block is replaced where it sits so that unchanged rows do
    /// not move. A new block is appended and the list re-sorted.
    pub fn upsert(&mut self, block: Block) {
        match self.index_of(&block.id) {
            Some(index) => {
                let moved = self.blocks[index].position != block.position;
                self.blocks[index] = block;
                if moved {
                    self.blocks.sort_by(Block::display_order);
                }
            }
            None => {
                self.blocks.push(block);
                self.blocks.sort_by(Block::display_order);
            }
        }
    }

    /// Merge a partial update into a cached block and stamp `updated_at`.
    ///
    /// Returns `false` if the block is not cached.
    pub fn merge(&mut self, block_id: &str, patch: &BlockPatch, now: DateTime<Utc>) -> bool {
        let Some(index) = self.index_of(block_id) else {
            return false;
        };
        self.blocks[index].apply_patch(patch, now);
        if patch.position.is_some() {
            self.blocks.sort_by(Block::display_order);
        }
        true
    }

    /// Drop a block. Returns the removed block, if it was present.
    pub fn remove(&mut self, block_id: &str) -> Option<Block> {
        let index = self.index_of(block_id)?;
        Some(self.blocks.remove(index))
    }

    /// Look up a block by id.
    pub fn get(&self, block_id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == block_id)
    }

    /// Whether a block with this id is cached.
    pub fn contains(&self, block_id: &str) -> bool {
        self.index_of(block_id).is_some()
    }

    /// Blocks in display order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the store holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Position for a block appended at the end: `max(position) + 1`, or 1
    /// for an empty document.
    pub fn next_position(&self) -> f64 {
        self.blocks
            .iter()
            .map(|b| b.position)
            .fold(0.0_f64, f64::max)
            + 1.0
    }

    fn index_of(&self, block_id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == block_id)
    }
}
