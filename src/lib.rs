//! Tinyfat is a minimal single-volume file system built on a file allocation table.
//! Files live in one flat directory and are stored as chains of fixed-size blocks.
//! For simplicity, no support for subdirectories, permissions, or timestamps.
//!
//! Tinyfat's linear layout:
//! - Block 0: Superblock (magic, total blocks, table blocks)
//! - Block 1: Directory (`NUM_DIR_ENTRIES` fixed slots)
//! - Blocks 2..2+table_blocks: Allocation Table (one `u32` per volume block)
//! - Remaining blocks: File data
//!
//! Tinyfat's layers (from bottom to top):
//! 1. Block Device: Abstraction for low level devices.        | User implemented (hardware-specific)
//! 2. Superblock/Directory/Table: On-disk metadata.           | Fs implemented
//! 3. File: Offset-based reads and writes over block chains.  | Fs implemented
//! 4. Volume: A mounted volume and its file operations.       | Fs implemented
//! 5. FileSystem: Mount-state front end for callers and CLIs. | Fs implemented
//!
//! Everything is single threaded and synchronous; wrap a lock around the
//! volume if several callers share it.

extern crate alloc;

mod config;
mod block_dev;
mod structs;
mod superblock;
mod directory;
mod table;
mod file;
mod report;
mod fs;
mod error;

pub use block_dev::BlockDevice;
pub use config::*;
pub use superblock::*;
pub use structs::*;
pub use directory::Directory;
pub use table::AllocationTable;
pub use file::*;
pub use report::*;
pub use fs::*;
pub use error::FsError as Error;
pub use error::Result;
