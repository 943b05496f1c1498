use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use log::{debug, info, warn};

use crate::directory::Directory;
use crate::error::{FsError, Result};
use crate::file::{fread, fwrite};
use crate::report::VolumeReport;
use crate::structs::*;
use crate::table::AllocationTable;
use crate::{read_superblock, write_superblock, BlockDevice};

/// Name and size of a file, as listed by [`Volume::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub length: u32,
}

/// A formatted, mounted volume.
///
/// Holds the in-memory mirror of every metadata block. Each mutating call
/// writes the directory and allocation table back before it returns.
#[derive(Debug)]
pub struct Volume<D: BlockDevice> {
    device: Arc<D>,
    superblock: SuperBlock,
    directory: Directory,
    table: AllocationTable,
}

impl<D: BlockDevice> Volume<D> {
    /// Lays out a fresh volume over the whole device: superblock, an empty
    /// directory and an all-free allocation table.
    pub fn format(device: Arc<D>) -> Result<Self> {
        let num_blocks = device.block_count();
        let total_blocks = u32::try_from(num_blocks).map_err(|_| FsError::InvalidArgument)?;
        let superblock = SuperBlock::new(total_blocks);
        if superblock.data_start() >= total_blocks {
            return Err(FsError::VolumeTooSmall(num_blocks));
        }

        let volume = Self {
            table: AllocationTable::new(&superblock)?,
            directory: Directory::empty(),
            superblock,
            device,
        };
        write_superblock(&*volume.device, &volume.superblock)?;
        volume.persist()?;

        info!(
            "formatted volume: {} blocks, {} table block(s)",
            total_blocks, volume.superblock.table_blocks
        );
        Ok(volume)
    }

    /// Loads and validates the metadata of a previously formatted device.
    pub fn mount(device: Arc<D>) -> Result<Self> {
        let superblock = read_superblock(&*device)?;
        let table = AllocationTable::load(&*device, &superblock)?;
        let directory = Directory::load(&*device, &superblock, &table)?;

        info!(
            "mounted volume: {} blocks, {} file(s)",
            superblock.total_blocks,
            directory.iter().count()
        );
        Ok(Self {
            device,
            superblock,
            directory,
            table,
        })
    }

    // Table first: a directory entry must never point at blocks still marked free.
    // Always writes the whole mirror, so an earlier failed write-back is repaired
    // by the next successful one.
    fn persist(&self) -> Result<()> {
        self.table.store(&*self.device)?;
        self.directory.store(&*self.device)?;
        self.device.flush()
    }

    /// Creates an empty file in the first free directory slot.
    pub fn create(&mut self, name: &str) -> Result<()> {
        let slot = self.directory.add(name)?;
        if let Err(e) = self.persist() {
            self.directory.remove(slot);
            return Err(e);
        }
        debug!("created \"{}\" in slot {}", name, slot);
        Ok(())
    }

    /// Removes a file and returns its blocks to the free pool.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        let slot = self.directory.lookup(name)?;
        let released = match self.directory.get(slot).first {
            Some(first) => self.table.free_chain(first)?,
            None => 0,
        };
        self.directory.remove(slot);
        self.persist()?;
        debug!("deleted \"{}\", released {} block(s)", name, released);
        Ok(())
    }

    pub fn get_size(&self, name: &str) -> Result<u32> {
        let slot = self.directory.lookup(name)?;
        Ok(self.directory.get(slot).length)
    }

    /// Reads up to `buf.len()` bytes starting at `offset`.
    pub fn read(&self, name: &str, buf: &mut [u8], offset: usize) -> Result<usize> {
        let slot = self.directory.lookup(name)?;
        let entry = self.directory.get(slot);
        let bytes_read = fread(&*self.device, &self.table, entry, offset, buf)?;
        debug!("read {} byte(s) of \"{}\" at {}", bytes_read, name, offset);
        Ok(bytes_read)
    }

    /// Writes `data` at `offset`. A short count means the volume filled up.
    pub fn write(&mut self, name: &str, data: &[u8], offset: usize) -> Result<usize> {
        let slot = self.directory.lookup(name)?;
        let entry = self.directory.get_mut(slot);
        let bytes_written = match fwrite(&*self.device, &mut self.table, entry, offset, data) {
            Ok(bytes_written) => bytes_written,
            Err(e) => {
                // The chain may have grown before the failure.
                if let Err(persist_err) = self.persist() {
                    warn!("metadata of \"{}\" not written back: {}", name, persist_err);
                }
                return Err(e);
            }
        };
        self.persist()?;
        debug!("wrote {} byte(s) to \"{}\" at {}", bytes_written, name, offset);
        Ok(bytes_written)
    }

    /// Used directory entries in slot order.
    pub fn list(&self) -> Vec<FileInfo> {
        self.directory
            .iter()
            .map(|entry| FileInfo {
                name: entry.name_str(),
                length: entry.length,
            })
            .collect()
    }

    pub fn free_blocks(&self) -> usize {
        self.table.free_count()
    }

    pub fn dump(&self) -> VolumeReport {
        VolumeReport::collect(&self.superblock, &self.directory, &self.table)
    }

    pub fn sync(&self) -> Result<()> {
        self.device.flush()
    }

    pub fn superblock(&self) -> &SuperBlock {
        &self.superblock
    }

    pub fn device(&self) -> Arc<D> {
        Arc::clone(&self.device)
    }
}

/// Front end tracking whether the device has been formatted or mounted yet.
///
/// The state only moves from unmounted to mounted. File operations issued
/// before that fail with [`FsError::NotMounted`]; callers that want the check
/// done by the type system can use [`Volume`] directly.
#[derive(Debug)]
pub struct FileSystem<D: BlockDevice> {
    device: Arc<D>,
    volume: Option<Volume<D>>,
}

impl<D: BlockDevice> FileSystem<D> {
    pub fn new(device: Arc<D>) -> Self {
        Self {
            device,
            volume: None,
        }
    }

    pub fn format(&mut self) -> Result<()> {
        if self.volume.is_some() {
            return Err(FsError::AlreadyFormatted);
        }
        self.volume = Some(Volume::format(Arc::clone(&self.device))?);
        Ok(())
    }

    pub fn mount(&mut self) -> Result<()> {
        if self.volume.is_some() {
            return Err(FsError::AlreadyMounted);
        }
        self.volume = Some(Volume::mount(Arc::clone(&self.device))?);
        Ok(())
    }

    pub fn is_mounted(&self) -> bool {
        self.volume.is_some()
    }

    pub fn volume(&self) -> Result<&Volume<D>> {
        self.volume.as_ref().ok_or(FsError::NotMounted)
    }

    pub fn volume_mut(&mut self) -> Result<&mut Volume<D>> {
        self.volume.as_mut().ok_or(FsError::NotMounted)
    }

    pub fn create(&mut self, name: &str) -> Result<()> {
        self.volume_mut()?.create(name)
    }

    pub fn delete(&mut self, name: &str) -> Result<()> {
        self.volume_mut()?.delete(name)
    }

    pub fn get_size(&self, name: &str) -> Result<u32> {
        self.volume()?.get_size(name)
    }

    pub fn read(&self, name: &str, buf: &mut [u8], offset: usize) -> Result<usize> {
        self.volume()?.read(name, buf, offset)
    }

    pub fn write(&mut self, name: &str, data: &[u8], offset: usize) -> Result<usize> {
        self.volume_mut()?.write(name, data, offset)
    }

    pub fn list(&self) -> Result<Vec<FileInfo>> {
        Ok(self.volume()?.list())
    }

    pub fn free_blocks(&self) -> Result<usize> {
        Ok(self.volume()?.free_blocks())
    }

    pub fn dump(&self) -> Result<VolumeReport> {
        Ok(self.volume()?.dump())
    }

    pub fn sync(&self) -> Result<()> {
        self.volume()?.sync()
    }

    pub fn device(&self) -> Arc<D> {
        Arc::clone(&self.device)
    }
}
