//! Offset-based reads and writes over a file's block chain.
//! Neither function persists metadata; the caller writes back the directory
//! and the allocation table afterwards.

use alloc::boxed::Box;

use log::warn;

use crate::config::BLOCK_SIZE;
use crate::error::{FsError, Result};
use crate::structs::{BlockId, DirEntry};
use crate::table::AllocationTable;
use crate::BlockDevice;

/// Reads data from a file into the provided buffer.
/// The `offset` is the position in the file to start reading from.
/// Returns the number of bytes read, which is short when the request runs past
/// the end of the file or the chain is shorter than the recorded length.
pub fn fread(
    device: &impl BlockDevice,
    table: &AllocationTable,
    entry: &DirEntry,
    offset: usize,
    buffer: &mut [u8],
) -> Result<usize> {
    if buffer.is_empty() {
        return Err(FsError::InvalidArgument);
    }
    let file_len = entry.length as usize;
    if offset >= file_len {
        return Err(FsError::OffsetBeyondEnd);
    }
    let len = buffer.len().min(file_len - offset);

    let mut current = entry.first;
    for _ in 0..offset / BLOCK_SIZE {
        current = match current {
            Some(block_id) => table.next(block_id)?,
            None => break,
        };
    }

    let mut bytes_read = 0;
    let mut start_offset = offset % BLOCK_SIZE;
    let mut block_buf = Box::new([0u8; BLOCK_SIZE]);

    while bytes_read < len {
        let Some(block_id) = current else {
            warn!(
                "chain of \"{}\" ends before its recorded length {}",
                entry.name_str(),
                entry.length
            );
            break;
        };
        device.read_block(block_id, &mut block_buf)?;
        let bytes_to_read = (BLOCK_SIZE - start_offset).min(len - bytes_read);
        buffer[bytes_read..bytes_read + bytes_to_read]
            .copy_from_slice(&block_buf[start_offset..start_offset + bytes_to_read]);

        bytes_read += bytes_to_read;
        start_offset = 0;
        if bytes_read < len {
            current = table.next(block_id)?;
        }
    }

    Ok(bytes_read)
}

/// Writes data from the provided buffer to a file at the specified offset,
/// growing the chain as needed. A full volume ends the write early; the
/// returned count tells how much landed. The file length never shrinks.
///
/// On every return, including device errors, an entry with `length == 0`
/// owns no blocks.
pub fn fwrite(
    device: &impl BlockDevice,
    table: &mut AllocationTable,
    entry: &mut DirEntry,
    offset: usize,
    buffer: &[u8],
) -> Result<usize> {
    if buffer.is_empty() {
        return Err(FsError::InvalidArgument);
    }
    offset
        .checked_add(buffer.len())
        .filter(|&end| end <= u32::MAX as usize)
        .ok_or(FsError::InvalidArgument)?;

    let was_empty = entry.first.is_none();
    if was_empty {
        entry.first = table.allocate(device)?;
    }

    let bytes_written = match write_chain(device, table, entry.first, offset, buffer) {
        Ok(bytes_written) => bytes_written,
        Err(e) => {
            if was_empty {
                release_head(table, entry)?;
            }
            return Err(e);
        }
    };

    if bytes_written < buffer.len() {
        warn!(
            "volume full: wrote {} of {} bytes to \"{}\"",
            bytes_written,
            buffer.len(),
            entry.name_str()
        );
    }

    if bytes_written > 0 {
        let end = (offset + bytes_written) as u32;
        entry.length = entry.length.max(end);
    } else if was_empty {
        release_head(table, entry)?;
    }

    Ok(bytes_written)
}

// Nothing landed in a file that was empty; it keeps no blocks.
fn release_head(table: &mut AllocationTable, entry: &mut DirEntry) -> Result<()> {
    if let Some(first) = entry.first.take() {
        table.free_chain(first)?;
    }
    Ok(())
}

/// Copies `buffer` into the chain starting at `first`, from `offset` on.
/// Blocks are appended on demand; stops early when the volume is full.
fn write_chain(
    device: &impl BlockDevice,
    table: &mut AllocationTable,
    first: Option<BlockId>,
    offset: usize,
    buffer: &[u8],
) -> Result<usize> {
    // Walk to the block holding `offset`, extending the chain across any gap.
    let mut current = first;
    for _ in 0..offset / BLOCK_SIZE {
        current = match current {
            Some(block_id) => table.next_or_extend(device, block_id)?,
            None => break,
        };
    }

    let mut bytes_written = 0;
    let mut start_offset = offset % BLOCK_SIZE;
    let mut block_buf = Box::new([0u8; BLOCK_SIZE]);

    while let Some(block_id) = current {
        let bytes_to_write = (BLOCK_SIZE - start_offset).min(buffer.len() - bytes_written);
        device.read_block(block_id, &mut block_buf)?;
        block_buf[start_offset..start_offset + bytes_to_write]
            .copy_from_slice(&buffer[bytes_written..bytes_written + bytes_to_write]);
        device.write_block(block_id, &block_buf)?;

        bytes_written += bytes_to_write;
        start_offset = 0;
        if bytes_written == buffer.len() {
            break;
        }
        current = table.next_or_extend(device, block_id)?;
    }

    Ok(bytes_written)
}
