//! Management of the allocation table.
//! One entry per volume block tells whether the block is free, ends a chain,
//! or links to the next block of the same file.
//!
//! Allocation is first fit: the data region is scanned in ascending order,
//! so every allocated block costs O(total_blocks).

use alloc::boxed::Box;
use alloc::vec::Vec;

use log::trace;

use crate::config::*;
use crate::error::{FsError, Result};
use crate::structs::*;
use crate::BlockDevice;

#[derive(Debug, Clone)]
pub struct AllocationTable {
    entries: Vec<TableEntry>,
    data_start: BlockId,
}

fn reserve(total_blocks: u32) -> Result<Vec<TableEntry>> {
    let mut entries = Vec::new();
    entries
        .try_reserve_exact(total_blocks as usize)
        .map_err(|_| FsError::AllocationFailure)?;
    Ok(entries)
}

impl AllocationTable {
    /// A table with every block free.
    pub fn new(superblock: &SuperBlock) -> Result<Self> {
        let mut entries = reserve(superblock.total_blocks)?;
        entries.resize(superblock.total_blocks as usize, TableEntry::Free);
        Ok(Self {
            entries,
            data_start: superblock.data_start(),
        })
    }

    pub fn load(device: &impl BlockDevice, superblock: &SuperBlock) -> Result<Self> {
        let mut entries = reserve(superblock.total_blocks)?;
        let mut buf = Box::new([0u8; BLOCK_SIZE]);

        for i in 0..superblock.table_blocks {
            device.read_block(TABLE_START + i, &mut buf)?;
            for raw in buf.chunks_exact(TABLE_ENTRY_SIZE) {
                let block_id = entries.len() as u32;
                if block_id >= superblock.total_blocks {
                    break;
                }
                let raw = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
                let entry = TableEntry::from_raw(raw, superblock)
                    .ok_or(FsError::CorruptTable(block_id))?;
                entries.push(entry);
            }
        }

        Ok(Self {
            entries,
            data_start: superblock.data_start(),
        })
    }

    pub fn store(&self, device: &impl BlockDevice) -> Result<()> {
        let mut buf = Box::new([0u8; BLOCK_SIZE]);
        for (i, chunk) in self.entries.chunks(TABLE_ENTRIES_PER_BLOCK).enumerate() {
            buf.fill(0);
            for (entry, raw) in chunk.iter().zip(buf.chunks_exact_mut(TABLE_ENTRY_SIZE)) {
                raw.copy_from_slice(&entry.to_raw().to_le_bytes());
            }
            device.write_block(TABLE_START + i as u32, &buf)?;
        }
        Ok(())
    }

    pub fn total_blocks(&self) -> u32 {
        self.entries.len() as u32
    }

    pub fn get(&self, block_id: BlockId) -> Result<TableEntry> {
        self.entries
            .get(block_id as usize)
            .copied()
            .ok_or(FsError::InvalidBlockId(block_id))
    }

    /// The block following `block_id` in its chain, `None` at the end.
    pub fn next(&self, block_id: BlockId) -> Result<Option<BlockId>> {
        match self.get(block_id)? {
            TableEntry::Next(next) => Ok(Some(next)),
            TableEntry::EndOfChain => Ok(None),
            TableEntry::Free => Err(FsError::CorruptChain(block_id)),
        }
    }

    /// Claims the lowest free data block, zero-fills it on disk and marks it
    /// as the end of a chain. Returns `None` when the volume is full.
    pub fn allocate(&mut self, device: &impl BlockDevice) -> Result<Option<BlockId>> {
        let start = self.data_start as usize;
        let Some(offset) = self.entries[start..]
            .iter()
            .position(|&e| e == TableEntry::Free)
        else {
            return Ok(None);
        };
        let block_id = (start + offset) as BlockId;

        let zero_block = Box::new([0u8; BLOCK_SIZE]);
        device.write_block(block_id, &zero_block)?;
        self.entries[block_id as usize] = TableEntry::EndOfChain;
        trace!("allocated block {}", block_id);
        Ok(Some(block_id))
    }

    /// Follows `tail`'s link, appending a fresh block when `tail` ends its chain.
    /// Returns `None` when a block is needed and the volume is full.
    pub fn next_or_extend(
        &mut self,
        device: &impl BlockDevice,
        tail: BlockId,
    ) -> Result<Option<BlockId>> {
        if let Some(next) = self.next(tail)? {
            return Ok(Some(next));
        }
        let Some(block_id) = self.allocate(device)? else {
            return Ok(None);
        };
        self.entries[tail as usize] = TableEntry::Next(block_id);
        Ok(Some(block_id))
    }

    /// Blocks of the chain starting at `first`, in order.
    /// A walk longer than the volume means the chain loops.
    pub fn chain(&self, first: BlockId) -> Result<Vec<BlockId>> {
        let mut blocks = Vec::new();
        let mut current = Some(first);
        while let Some(block_id) = current {
            if blocks.len() >= self.entries.len() {
                return Err(FsError::CorruptChain(first));
            }
            blocks.push(block_id);
            current = self.next(block_id)?;
        }
        Ok(blocks)
    }

    /// Marks every block of the chain starting at `first` free.
    /// Returns the number of blocks released.
    pub fn free_chain(&mut self, first: BlockId) -> Result<usize> {
        let blocks = self.chain(first)?;
        for &block_id in &blocks {
            self.entries[block_id as usize] = TableEntry::Free;
            trace!("released block {}", block_id);
        }
        Ok(blocks.len())
    }

    /// Number of free blocks in the data region.
    pub fn free_count(&self) -> usize {
        self.entries[self.data_start as usize..]
            .iter()
            .filter(|&&e| e == TableEntry::Free)
            .count()
    }
}
