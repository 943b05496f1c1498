//! Diagnostic snapshot of a mounted volume.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::config::MAGIC;
use crate::directory::Directory;
use crate::structs::*;
use crate::table::AllocationTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub name: String,
    pub length: u32,
    pub blocks: Vec<BlockId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeReport {
    pub magic: u32,
    pub total_blocks: u32,
    pub table_blocks: u32,
    pub files: Vec<FileReport>,
}

impl VolumeReport {
    pub(crate) fn collect(
        superblock: &SuperBlock,
        directory: &Directory,
        table: &AllocationTable,
    ) -> Self {
        let files = directory
            .iter()
            .map(|entry| FileReport {
                name: entry.name_str(),
                length: entry.length,
                blocks: entry.first.map(|first| walk(table, first)).unwrap_or_default(),
            })
            .collect();

        Self {
            magic: superblock.magic,
            total_blocks: superblock.total_blocks,
            table_blocks: superblock.table_blocks,
            files,
        }
    }

    pub fn magic_ok(&self) -> bool {
        self.magic == MAGIC
    }
}

// Best effort: stops at the first broken link instead of failing the report.
fn walk(table: &AllocationTable, first: BlockId) -> Vec<BlockId> {
    let mut blocks = Vec::new();
    let mut current = Some(first);
    while let Some(block_id) = current {
        if blocks.len() >= table.total_blocks() as usize {
            break;
        }
        blocks.push(block_id);
        current = table.next(block_id).ok().flatten();
    }
    blocks
}

impl fmt::Display for VolumeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "superblock:")?;
        if self.magic_ok() {
            writeln!(f, "magic is ok")?;
        } else {
            writeln!(f, "magic is wrong ({:#x})", self.magic)?;
        }
        writeln!(f, "{} blocks", self.total_blocks)?;
        writeln!(f, "{} block(s) fat", self.table_blocks)?;

        for file in &self.files {
            writeln!(f, "File \"{}\":", file.name)?;
            writeln!(f, "  size: {} bytes", file.length)?;
            write!(f, "  Blocks:")?;
            for block_id in &file.blocks {
                write!(f, " {}", block_id)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
