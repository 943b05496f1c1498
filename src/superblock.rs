use alloc::boxed::Box;

use crate::config::*;
use crate::error::{FsError, Result};
use crate::{BlockDevice, SuperBlock};

/// Reads block 0 and checks that it describes a volume that fits `device`.
pub fn read_superblock<D: BlockDevice>(device: &D) -> Result<SuperBlock> {
    let mut buf = Box::new([0u8; BLOCK_SIZE]);
    device.read_block(SUPERBLOCK_ID, &mut buf)?;
    let superblock = SuperBlock::decode(&buf);

    if !superblock.is_valid() {
        return Err(FsError::NotFormatted(superblock.magic));
    }
    if superblock.total_blocks as usize > device.block_count()
        || superblock.table_blocks != SuperBlock::table_blocks_for(superblock.total_blocks)
        || superblock.data_start() >= superblock.total_blocks
    {
        return Err(FsError::InvalidSuperBlock);
    }

    Ok(superblock)
}

pub fn write_superblock<D: BlockDevice>(device: &D, superblock: &SuperBlock) -> Result<()> {
    let mut buf = Box::new([0u8; BLOCK_SIZE]);
    superblock.encode(&mut buf);
    device.write_block(SUPERBLOCK_ID, &buf)?;
    Ok(())
}
