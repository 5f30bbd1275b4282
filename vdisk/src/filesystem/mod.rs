mod block_tree;
mod path;

use crate::bitmap::BitMap;
use crate::disk::disk_blocks::{
    FolderBlock, Inode, Partition, SuperBlock, BLOCK_SIZE, EXT2_MAGIC,
};
use crate::disk::disk_handler::{read_record, write_record};
use crate::registry::{DEFAULT_USERS, USERS_FILE};
use crate::{ByteSerializable, DiskHandler, OSManager, VDiskError, VDiskErrorConvertible};
use log::{debug, info};

pub use path::{split_path, DirectoryEntry};

pub const ROOT_INODE: i32 = 0;

/// An ext2 style filesystem inside one partition.
///
/// The superblock is kept in memory and written back after every allocation.
pub struct Filesystem<'a, 'b, E: VDiskErrorConvertible> {
    handler: &'a mut dyn DiskHandler<E>,
    manager: &'b dyn OSManager,
    partition_name: String,
    super_block: SuperBlock,
}

impl<'a, 'b, E: VDiskErrorConvertible> Filesystem<'a, 'b, E> {
    /// Lays out a new filesystem over the partition and seeds the root directory and `users.txt`.
    pub fn format(
        handler: &'a mut dyn DiskHandler<E>,
        manager: &'b dyn OSManager,
        partition: &Partition,
    ) -> Result<Self, VDiskError<E>> {
        if partition.is_empty() {
            return Err(VDiskError::PartitionNotFound(partition.name()));
        }

        let n = partition.calculate_n();

        if n <= 0 {
            return Err(VDiskError::InsufficientSpace(partition.size as i64));
        }

        let now = manager.timestamp();
        let super_block = SuperBlock::new(partition.start, n, now);

        BitMap::inodes(&super_block).initialize(handler)?;
        BitMap::blocks(&super_block).initialize(handler)?;

        let mut fs = Self {
            handler,
            manager,
            partition_name: partition.name(),
            super_block,
        };
        fs.write_super_block()?;

        debug!(
            "[FS] '{}': {} inodes, {} blocks, block area at {}",
            fs.partition_name,
            n,
            3 * n,
            fs.super_block.block_start
        );

        let root = fs.allocate_inode(&Inode::root(now))?;
        let root_block = fs.allocate_block(&FolderBlock::new(root, root))?;
        let mut root_inode = fs.read_inode(root)?;
        root_inode.blocks[0] = root_block;
        fs.write_inode(root, &root_inode)?;

        fs.write_file(&format!("/{}", USERS_FILE), DEFAULT_USERS.as_bytes())?;

        info!("[FS] formatted '{}'", fs.partition_name);

        return Ok(fs);
    }

    /// Opens the filesystem of an already formatted partition.
    pub fn open(
        handler: &'a mut dyn DiskHandler<E>,
        manager: &'b dyn OSManager,
        partition: &Partition,
    ) -> Result<Self, VDiskError<E>> {
        if partition.is_empty() {
            return Err(VDiskError::PartitionNotFound(partition.name()));
        }

        let super_block = read_record::<SuperBlock, E>(handler, partition.start as i64)?;

        if super_block.magic != EXT2_MAGIC {
            return Err(VDiskError::NoFilesystem(partition.name()));
        }

        return Ok(Self {
            handler,
            manager,
            partition_name: partition.name(),
            super_block,
        });
    }

    pub fn super_block(&self) -> &SuperBlock {
        return &self.super_block;
    }

    pub fn inode_bitmap(&self) -> Result<Vec<u8>, VDiskError<E>> {
        return BitMap::inodes(&self.super_block).load(self.handler);
    }

    pub fn block_bitmap(&self) -> Result<Vec<u8>, VDiskError<E>> {
        return BitMap::blocks(&self.super_block).load(self.handler);
    }

    fn write_super_block(&mut self) -> Result<(), VDiskError<E>> {
        let start = self.super_block.bm_inode_start as i64 - SuperBlock::size() as i64;

        return write_record(
            self.handler,
            &self.super_block,
            start,
            self.super_block.bm_inode_start as i64,
        );
    }

    pub fn read_inode(&self, index: i32) -> Result<Inode, VDiskError<E>> {
        if index < 0 || index >= self.super_block.inodes_count {
            return Err(VDiskError::InvalidPointer(index));
        }

        return read_record(self.handler, self.super_block.inode_offset(index));
    }

    fn write_inode(&mut self, index: i32, inode: &Inode) -> Result<(), VDiskError<E>> {
        if index < 0 || index >= self.super_block.inode_capacity() {
            return Err(VDiskError::InvalidPointer(index));
        }

        let offset = self.super_block.inode_offset(index);

        return write_record(
            self.handler,
            inode,
            offset,
            offset + self.super_block.inode_size as i64,
        );
    }

    fn read_block<T: ByteSerializable>(&self, index: i32) -> Result<T, VDiskError<E>> {
        if index < 0 || index >= self.super_block.blocks_count {
            return Err(VDiskError::InvalidPointer(index));
        }

        return read_record(self.handler, self.super_block.block_offset(index));
    }

    fn write_block<T: ByteSerializable>(
        &mut self,
        index: i32,
        block: &T,
    ) -> Result<(), VDiskError<E>> {
        if index < 0 || index >= self.super_block.block_capacity() {
            return Err(VDiskError::InvalidPointer(index));
        }

        let offset = self.super_block.block_offset(index);

        return write_record(self.handler, block, offset, offset + BLOCK_SIZE as i64);
    }

    /// Writes the inode at the next free index and marks it used.
    fn allocate_inode(&mut self, inode: &Inode) -> Result<i32, VDiskError<E>> {
        if self.super_block.free_inodes_count <= 0 {
            return Err(VDiskError::NoFreeInodes);
        }

        let index = self.super_block.inodes_count;
        self.write_inode(index, inode)?;
        self.mark_inode_used()?;

        debug!("[FS] allocated inode {}", index);

        return Ok(index);
    }

    /// Writes the block at the next free index and marks it used.
    fn allocate_block<T: ByteSerializable>(&mut self, block: &T) -> Result<i32, VDiskError<E>> {
        if self.super_block.free_blocks_count <= 0 {
            return Err(VDiskError::NoFreeBlocks);
        }

        let index = self.super_block.blocks_count;
        self.write_block(index, block)?;
        self.mark_block_used()?;

        debug!("[FS] allocated block {}", index);

        return Ok(index);
    }

    fn mark_inode_used(&mut self) -> Result<(), VDiskError<E>> {
        BitMap::inodes(&self.super_block).set_used(self.handler, self.super_block.inodes_count)?;

        self.super_block.inodes_count += 1;
        self.super_block.free_inodes_count -= 1;
        self.super_block.first_inode += self.super_block.inode_size;

        return self.write_super_block();
    }

    fn mark_block_used(&mut self) -> Result<(), VDiskError<E>> {
        BitMap::blocks(&self.super_block).set_used(self.handler, self.super_block.blocks_count)?;

        self.super_block.blocks_count += 1;
        self.super_block.free_blocks_count -= 1;
        self.super_block.first_block += self.super_block.block_size;

        return self.write_super_block();
    }
}
