use crate::disk::disk_blocks::SuperBlock;
use crate::disk::disk_handler::{read_raw, write_raw};
use crate::{DiskHandler, VDiskError, VDiskErrorConvertible};

pub const INODE_FREE: u8 = b'0';
pub const INODE_USED: u8 = b'1';
pub const BLOCK_FREE: u8 = b'O';
pub const BLOCK_USED: u8 = b'X';

/// A character bitmap on disk: one byte per inode or block.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct BitMap {
    start: i64,
    len: i64,
    free: u8,
    used: u8,
}

impl BitMap {
    pub fn inodes(super_block: &SuperBlock) -> Self {
        return Self {
            start: super_block.bm_inode_start as i64,
            len: super_block.inode_capacity() as i64,
            free: INODE_FREE,
            used: INODE_USED,
        };
    }

    pub fn blocks(super_block: &SuperBlock) -> Self {
        return Self {
            start: super_block.bm_block_start as i64,
            len: super_block.block_capacity() as i64,
            free: BLOCK_FREE,
            used: BLOCK_USED,
        };
    }

    /// Fills the whole map with the free marker.
    pub fn initialize<E: VDiskErrorConvertible>(
        &self,
        handler: &mut dyn DiskHandler<E>,
    ) -> Result<(), VDiskError<E>> {
        let bytes = vec![self.free; self.len as usize];

        return write_raw(handler, &bytes, self.start, self.start + self.len);
    }

    /// Writes the used marker at `index`.
    pub fn set_used<E: VDiskErrorConvertible>(
        &self,
        handler: &mut dyn DiskHandler<E>,
        index: i32,
    ) -> Result<(), VDiskError<E>> {
        return write_raw(
            handler,
            &[self.used],
            self.start + index as i64,
            self.start + self.len,
        );
    }

    pub fn load<E: VDiskErrorConvertible>(
        &self,
        handler: &dyn DiskHandler<E>,
    ) -> Result<Vec<u8>, VDiskError<E>> {
        return read_raw(handler, self.start, self.len as u64);
    }

    pub fn count_used(&self, bytes: &[u8]) -> usize {
        return bytes.iter().filter(|b| **b == self.used).count();
    }
}
