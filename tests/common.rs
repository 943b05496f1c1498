//! Common utilities for tests

#![allow(unused)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tinyfat::{BlockDevice, Error, Result, BLOCK_SIZE};

pub const ORANGE: &str = "\x1b[38;5;214m";
pub const RESET: &str = "\x1b[0m";

/// Provides a macro for logging messages during tests.
/// e.g. log!("placeholder") -> println!("[test] placeholder");
#[macro_export]
macro_rules! log {
    ($msg:expr) => {
        println!("{}[test] {}{}", crate::common::ORANGE, $msg, crate::common::RESET)
    };
    ($msg:expr, $($arg:tt)*) => {
        println!("{}[test] {}{}", crate::common::ORANGE, format!($msg, $($arg)*), crate::common::RESET)
    };
}

#[derive(Debug)]
pub struct RamDisk {
    inner: Mutex<Vec<u8>>,
    num_blocks: usize,
}

impl RamDisk {
    /// Creates a new RamDisk with the specified number of blocks.
    /// Each block is BLOCK_SIZE bytes.
    pub fn new(num_blocks: usize) -> Self {
        RamDisk {
            inner: Mutex::new(vec![0u8; num_blocks * BLOCK_SIZE]),
            num_blocks,
        }
    }

    /// Copy of a block, bypassing the file system.
    pub fn raw_block(&self, block_id: u32) -> Vec<u8> {
        let start = block_id as usize * BLOCK_SIZE;
        self.inner.lock().unwrap()[start..start + BLOCK_SIZE].to_vec()
    }

    /// Overwrites bytes of a block, bypassing the file system.
    pub fn poke(&self, block_id: u32, offset: usize, bytes: &[u8]) {
        let start = block_id as usize * BLOCK_SIZE + offset;
        self.inner.lock().unwrap()[start..start + bytes.len()].copy_from_slice(bytes);
    }
}

impl BlockDevice for RamDisk {
    fn block_count(&self) -> usize {
        self.num_blocks
    }

    fn read_block(&self, block_id: u32, buf: &mut [u8; BLOCK_SIZE]) -> Result<()> {
        if block_id as usize >= self.num_blocks {
            return Err(Error::InvalidBlockId(block_id));
        }
        let start = block_id as usize * BLOCK_SIZE;
        let data = self.inner.lock().unwrap();
        buf.copy_from_slice(&data[start..start + BLOCK_SIZE]);
        Ok(())
    }

    fn write_block(&self, block_id: u32, buf: &[u8; BLOCK_SIZE]) -> Result<()> {
        if block_id as usize >= self.num_blocks {
            return Err(Error::InvalidBlockId(block_id));
        }
        let start = block_id as usize * BLOCK_SIZE;
        let mut data = self.inner.lock().unwrap();
        data[start..start + BLOCK_SIZE].copy_from_slice(buf);
        Ok(())
    }
}

/// A RamDisk whose reads, writes and flushes can be made to fail on demand.
#[derive(Debug)]
pub struct FlakyDisk {
    disk: RamDisk,
    writes_left: Mutex<Option<usize>>, // None: unlimited
    fail_reads: AtomicBool,
    fail_flush: AtomicBool,
}

impl FlakyDisk {
    pub fn new(num_blocks: usize) -> Self {
        FlakyDisk {
            disk: RamDisk::new(num_blocks),
            writes_left: Mutex::new(None),
            fail_reads: AtomicBool::new(false),
            fail_flush: AtomicBool::new(false),
        }
    }

    /// Lets `n` more block writes through, then fails every following one.
    pub fn fail_writes_after(&self, n: usize) {
        *self.writes_left.lock().unwrap() = Some(n);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_flush(&self, fail: bool) {
        self.fail_flush.store(fail, Ordering::SeqCst);
    }

    /// Back to a healthy device.
    pub fn heal(&self) {
        *self.writes_left.lock().unwrap() = None;
        self.fail_reads(false);
        self.fail_flush(false);
    }

    pub fn raw_block(&self, block_id: u32) -> Vec<u8> {
        self.disk.raw_block(block_id)
    }
}

impl BlockDevice for FlakyDisk {
    fn block_count(&self) -> usize {
        self.disk.block_count()
    }

    fn read_block(&self, block_id: u32, buf: &mut [u8; BLOCK_SIZE]) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::IoError);
        }
        self.disk.read_block(block_id, buf)
    }

    fn write_block(&self, block_id: u32, buf: &[u8; BLOCK_SIZE]) -> Result<()> {
        let mut writes_left = self.writes_left.lock().unwrap();
        match writes_left.as_mut() {
            Some(0) => return Err(Error::IoError),
            Some(n) => *n -= 1,
            None => {}
        }
        self.disk.write_block(block_id, buf)
    }

    fn flush(&self) -> Result<()> {
        if self.fail_flush.load(Ordering::SeqCst) {
            return Err(Error::IoError);
        }
        Ok(())
    }
}
