//! In-memory forms of the on-disk records and their little-endian codecs.

use crate::config::*;
use crate::error::{FsError, Result};

/// Index of a block on the device.
pub type BlockId = u32;

fn read_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

fn write_u32(buf: &mut [u8], at: usize, value: u32) {
    buf[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuperBlock {
    pub magic: u32,        // Magic number to identify the filesystem
    pub total_blocks: u32, // Total number of blocks reported by the device at format time
    pub table_blocks: u32, // Blocks occupied by the allocation table
}

impl SuperBlock {
    /// Derives the layout for a device of `total_blocks` blocks.
    pub fn new(total_blocks: u32) -> Self {
        Self {
            magic: MAGIC,
            total_blocks,
            table_blocks: Self::table_blocks_for(total_blocks),
        }
    }

    /// Blocks needed to hold one 4-byte table entry per volume block, i.e.
    /// `ceil(total_blocks / TABLE_ENTRIES_PER_BLOCK)`. Dividing by `BLOCK_SIZE`
    /// instead would leave no room for the entries of volumes above
    /// `TABLE_ENTRIES_PER_BLOCK` blocks; both agree below that size.
    pub fn table_blocks_for(total_blocks: u32) -> u32 {
        (total_blocks as usize).div_ceil(TABLE_ENTRIES_PER_BLOCK) as u32
    }

    pub fn is_valid(&self) -> bool {
        self.magic == MAGIC
    }

    /// First block that may hold file data.
    pub fn data_start(&self) -> BlockId {
        TABLE_START + self.table_blocks
    }

    pub fn is_data_block(&self, block_id: BlockId) -> bool {
        block_id >= self.data_start() && block_id < self.total_blocks
    }

    pub fn decode(buf: &[u8; BLOCK_SIZE]) -> Self {
        Self {
            magic: read_u32(buf, 0),
            total_blocks: read_u32(buf, 4),
            table_blocks: read_u32(buf, 8),
        }
    }

    pub fn encode(&self, buf: &mut [u8; BLOCK_SIZE]) {
        buf.fill(0);
        write_u32(buf, 0, self.magic);
        write_u32(buf, 4, self.total_blocks);
        write_u32(buf, 8, self.table_blocks);
    }
}

/// State of one block in the allocation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEntry {
    Free,
    EndOfChain,
    Next(BlockId),
}

impl TableEntry {
    pub fn to_raw(self) -> u32 {
        match self {
            TableEntry::Free => FREE_RAW,
            TableEntry::EndOfChain => END_OF_CHAIN_RAW,
            TableEntry::Next(next) => next,
        }
    }

    /// Decodes a raw entry; a link must point at a data block of `superblock`.
    pub fn from_raw(raw: u32, superblock: &SuperBlock) -> Option<Self> {
        match raw {
            FREE_RAW => Some(TableEntry::Free),
            END_OF_CHAIN_RAW => Some(TableEntry::EndOfChain),
            next if superblock.is_data_block(next) => Some(TableEntry::Next(next)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirEntry {
    pub used: bool,
    pub name: [u8; NAME_FIELD_LEN],
    pub length: u32,
    pub first: Option<BlockId>, // None for an empty file
}

impl DirEntry {
    pub const NULL: Self = Self {
        used: false,
        name: [0; NAME_FIELD_LEN],
        length: 0,
        first: None,
    };

    /// A fresh, empty file called `name`.
    pub fn new(name: &str) -> Result<Self> {
        Ok(Self {
            used: true,
            name: encode_name(name)?,
            length: 0,
            first: None,
        })
    }

    pub fn name_eq(&self, name: &[u8; NAME_FIELD_LEN]) -> bool {
        self.used && &self.name == name
    }

    pub fn name_str(&self) -> alloc::string::String {
        let end = self.name.iter().position(|&c| c == 0).unwrap_or(MAX_NAME_LEN);
        alloc::string::String::from_utf8_lossy(&self.name[..end]).into_owned()
    }

    pub fn decode(raw: &[u8]) -> Self {
        let first = read_u32(raw, 12);
        let mut name = [0u8; NAME_FIELD_LEN];
        name.copy_from_slice(&raw[1..1 + NAME_FIELD_LEN]);
        name[MAX_NAME_LEN] = 0;
        Self {
            used: raw[0] != 0,
            name,
            length: read_u32(raw, 8),
            first: (first != NO_BLOCK_RAW).then_some(first),
        }
    }

    pub fn encode(&self, raw: &mut [u8]) {
        raw[0] = self.used as u8;
        raw[1..1 + NAME_FIELD_LEN].copy_from_slice(&self.name);
        write_u32(raw, 8, self.length);
        write_u32(raw, 12, self.first.unwrap_or(NO_BLOCK_RAW));
    }
}

/// Turns a caller-supplied name into the stored, NUL-terminated form.
/// Longer names are truncated to `MAX_NAME_LEN` bytes.
pub fn encode_name(name: &str) -> Result<[u8; NAME_FIELD_LEN]> {
    let bytes = name.as_bytes();
    if bytes.is_empty() || bytes.contains(&0) {
        return Err(FsError::InvalidArgument);
    }
    let len = bytes.len().min(MAX_NAME_LEN);
    let mut arr = [0u8; NAME_FIELD_LEN];
    arr[..len].copy_from_slice(&bytes[..len]);
    Ok(arr)
}
