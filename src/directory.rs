//! The flat directory: a fixed table of `NUM_DIR_ENTRIES` slots living in a
//! single block. Lookups are a linear scan in slot order.

use alloc::boxed::Box;

use crate::config::*;
use crate::error::{FsError, Result};
use crate::structs::*;
use crate::table::AllocationTable;
use crate::BlockDevice;

#[derive(Debug, Clone)]
pub struct Directory {
    entries: [DirEntry; NUM_DIR_ENTRIES],
}

impl Directory {
    pub fn empty() -> Self {
        Self {
            entries: [DirEntry::NULL; NUM_DIR_ENTRIES],
        }
    }

    /// Loads the directory block. A used slot either is empty (`length == 0`,
    /// no block) or has data whose first block is a data block of
    /// `superblock` that `table` does not mark free.
    pub fn load(
        device: &impl BlockDevice,
        superblock: &SuperBlock,
        table: &AllocationTable,
    ) -> Result<Self> {
        let mut buf = Box::new([0u8; BLOCK_SIZE]);
        device.read_block(DIRECTORY_ID, &mut buf)?;

        let mut dir = Self::empty();
        for (slot, raw) in buf.chunks_exact(DIR_ENTRY_SIZE).enumerate() {
            let entry = DirEntry::decode(raw);
            if !entry.used {
                continue;
            }
            let consistent = match entry.first {
                None => entry.length == 0,
                Some(first) => {
                    entry.length > 0
                        && superblock.is_data_block(first)
                        && table.get(first)? != TableEntry::Free
                }
            };
            if !consistent {
                return Err(FsError::CorruptDirectory(slot));
            }
            dir.entries[slot] = entry;
        }
        Ok(dir)
    }

    pub fn store(&self, device: &impl BlockDevice) -> Result<()> {
        let mut buf = Box::new([0u8; BLOCK_SIZE]);
        for (entry, raw) in self.entries.iter().zip(buf.chunks_exact_mut(DIR_ENTRY_SIZE)) {
            entry.encode(raw);
        }
        device.write_block(DIRECTORY_ID, &buf)
    }

    /// Slot index of the used entry called `name`.
    pub fn lookup(&self, name: &str) -> Result<usize> {
        let name = encode_name(name)?;
        self.entries
            .iter()
            .position(|entry| entry.name_eq(&name))
            .ok_or(FsError::FileNotFound)
    }

    /// Places a new empty file in the first unused slot.
    pub fn add(&mut self, name: &str) -> Result<usize> {
        let entry = DirEntry::new(name)?;
        if self.entries.iter().any(|e| e.name_eq(&entry.name)) {
            return Err(FsError::NameExists);
        }
        let slot = self
            .entries
            .iter()
            .position(|e| !e.used)
            .ok_or(FsError::DirectoryFull)?;
        self.entries[slot] = entry;
        Ok(slot)
    }

    pub fn remove(&mut self, slot: usize) {
        self.entries[slot] = DirEntry::NULL;
    }

    pub fn get(&self, slot: usize) -> &DirEntry {
        &self.entries[slot]
    }

    pub fn get_mut(&mut self, slot: usize) -> &mut DirEntry {
        &mut self.entries[slot]
    }

    /// Used entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &DirEntry> {
        self.entries.iter().filter(|e| e.used)
    }
}
