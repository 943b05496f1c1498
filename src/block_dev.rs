use crate::config::BLOCK_SIZE;
use crate::error::Result;

/// Whole-block storage the volume is built on.
///
/// Indices run over `0..block_count()`. Rejecting out-of-range ids is the
/// adapter's job; implementations usually answer with `FsError::InvalidBlockId`.
pub trait BlockDevice: Send + Sync {
    /// Returns the number of blocks in the block device.
    fn block_count(&self) -> usize;

    /// Reads a whole block into `buf`.
    fn read_block(&self, block_id: u32, buf: &mut [u8; BLOCK_SIZE]) -> Result<()>;

    /// Writes a whole block from `buf`.
    fn write_block(&self, block_id: u32, buf: &[u8; BLOCK_SIZE]) -> Result<()>;

    /// Flushes any cached data to the block device.
    /// This is typically used to ensure that all writes are persisted.
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}
