use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FsError {
    #[error("volume is not mounted")]
    NotMounted,
    #[error("volume is already formatted and mounted")]
    AlreadyFormatted,
    #[error("volume is already mounted")]
    AlreadyMounted,
    #[error("volume is not formatted (bad magic {0:#x})")]
    NotFormatted(u32),
    #[error("a file with this name already exists")]
    NameExists,
    #[error("no free directory slot")]
    DirectoryFull,
    #[error("file not found")]
    FileNotFound,
    #[error("invalid argument")]
    InvalidArgument,
    #[error("offset is at or beyond the end of the file")]
    OffsetBeyondEnd,
    #[error("cannot allocate the in-memory allocation table")]
    AllocationFailure,
    #[error("device has {0} blocks, too few to hold the metadata and any data")]
    VolumeTooSmall(usize),
    #[error("superblock does not describe this device")]
    InvalidSuperBlock,
    #[error("allocation table entry {0} is corrupt")]
    CorruptTable(u32),
    #[error("directory slot {0} is corrupt")]
    CorruptDirectory(usize),
    #[error("block chain starting at {0} is corrupt")]
    CorruptChain(u32),
    #[error("block id {0} is out of range")]
    InvalidBlockId(u32),
    #[error("device I/O error")]
    IoError,
}

pub type Result<T> = core::result::Result<T, FsError>;
