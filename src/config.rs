pub const MAGIC: u32 = 0xAC0010DE;

pub const BLOCK_SIZE: usize = 1024;
pub const SUPERBLOCK_ID: u32 = 0; // Block ID for the superblock
pub const DIRECTORY_ID: u32 = 1; // Block ID for the flat directory
pub const TABLE_START: u32 = 2; // First block of the allocation table

pub const MAX_NAME_LEN: usize = 6;
pub const NAME_FIELD_LEN: usize = MAX_NAME_LEN + 1; // Name plus NUL terminator
pub const DIR_ENTRY_SIZE: usize = 16; // used (1) + name (7) + length (4) + first (4)
pub const NUM_DIR_ENTRIES: usize = BLOCK_SIZE / DIR_ENTRY_SIZE;

pub const TABLE_ENTRY_SIZE: usize = 4;
pub const TABLE_ENTRIES_PER_BLOCK: usize = BLOCK_SIZE / TABLE_ENTRY_SIZE;

pub const FREE_RAW: u32 = 0;
pub const END_OF_CHAIN_RAW: u32 = 1;
pub const NO_BLOCK_RAW: u32 = 0; // `first` of an empty file
