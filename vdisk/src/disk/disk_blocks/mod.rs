mod ebr;
mod file_block;
mod folder_block;
mod inode;
mod mbr;
mod partition;
mod pointer_block;
mod super_block;

/// Folder, file and pointer blocks all share this size.
pub const BLOCK_SIZE: u64 = 64;

pub use ebr::{Ebr, EBR_SIZE};
pub use file_block::FileBlock;
pub use folder_block::{FolderBlock, FolderEntry, FOLDER_ENTRIES, FOLDER_NAME_LEN};
pub use inode::{Inode, InodeType, DIRECT_POINTERS, INODE_SIZE, POINTER_COUNT};
pub use mbr::{Mbr, MBR_SIZE, PARTITION_SLOTS};
pub use partition::{
    inode_capacity, Partition, PartitionStatus, PartitionType, PARTITION_NAME_LEN, PARTITION_SIZE,
};
pub use pointer_block::{PointerBlock, POINTERS_PER_BLOCK};
pub use super_block::{SuperBlock, EXT2_MAGIC, SUPER_BLOCK_SIZE};
