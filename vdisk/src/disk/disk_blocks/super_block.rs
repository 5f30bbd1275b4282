use super::{FileBlock, Inode};
use crate::ByteSerializable;
use byteorder::{ByteOrder, LittleEndian};

pub const SUPER_BLOCK_SIZE: u64 = 68;
pub const EXT2_MAGIC: i32 = 0xEF53;
const FILESYSTEM_TYPE: i32 = 2;

/// Sits at the start of a formatted partition and describes the regions after it:
/// inode bitmap (n bytes), block bitmap (3n bytes), inode table (n inodes) and the block area (3n blocks).
#[derive(Debug, PartialEq, Clone)]
pub struct SuperBlock {
    pub filesystem_type: i32,
    /// Inodes handed out so far. Also the index of the next inode.
    pub inodes_count: i32,
    /// Blocks handed out so far. Also the index of the next block.
    pub blocks_count: i32,
    pub free_inodes_count: i32,
    pub free_blocks_count: i32,
    pub mount_time: f32,
    pub unmount_time: f32,
    pub mount_count: i32,
    pub magic: i32,
    pub inode_size: i32,
    pub block_size: i32,
    /// Offset of the next free inode.
    pub first_inode: i32,
    /// Offset of the next free block.
    pub first_block: i32,
    pub bm_block_start: i32,
    pub bm_inode_start: i32,
    pub inode_start: i32,
    pub block_start: i32,
}

impl SuperBlock {
    pub fn new(partition_start: i32, n: i32, now: f32) -> Self {
        let bm_inode_start = partition_start + SUPER_BLOCK_SIZE as i32;
        let bm_block_start = bm_inode_start + n;
        let inode_start = bm_block_start + 3 * n;
        let block_start = inode_start + Inode::size() as i32 * n;

        return Self {
            filesystem_type: FILESYSTEM_TYPE,
            inodes_count: 0,
            blocks_count: 0,
            free_inodes_count: n,
            free_blocks_count: 3 * n,
            mount_time: now,
            unmount_time: now,
            mount_count: 1,
            magic: EXT2_MAGIC,
            inode_size: Inode::size() as i32,
            block_size: FileBlock::size() as i32,
            first_inode: inode_start,
            first_block: block_start,
            bm_block_start,
            bm_inode_start,
            inode_start,
            block_start,
        };
    }

    pub fn inode_capacity(&self) -> i32 {
        return self.inodes_count + self.free_inodes_count;
    }

    pub fn block_capacity(&self) -> i32 {
        return self.blocks_count + self.free_blocks_count;
    }

    pub fn inode_offset(&self, index: i32) -> i64 {
        return self.inode_start as i64 + index as i64 * self.inode_size as i64;
    }

    pub fn block_offset(&self, index: i32) -> i64 {
        return self.block_start as i64 + index as i64 * self.block_size as i64;
    }

    /// First byte past the block area.
    pub fn end(&self) -> i64 {
        return self.block_offset(self.block_capacity());
    }
}

impl ByteSerializable for SuperBlock {
    type BytesArrayType = [u8; SUPER_BLOCK_SIZE as usize];

    fn to_bytes(&self) -> Self::BytesArrayType {
        let mut bytes = [0u8; SUPER_BLOCK_SIZE as usize];
        let mut offset = 0;

        LittleEndian::write_i32(&mut bytes[offset..], self.filesystem_type);
        offset += 4;
        LittleEndian::write_i32(&mut bytes[offset..], self.inodes_count);
        offset += 4;
        LittleEndian::write_i32(&mut bytes[offset..], self.blocks_count);
        offset += 4;
        LittleEndian::write_i32(&mut bytes[offset..], self.free_inodes_count);
        offset += 4;
        LittleEndian::write_i32(&mut bytes[offset..], self.free_blocks_count);
        offset += 4;

        LittleEndian::write_f32(&mut bytes[offset..], self.mount_time);
        offset += 4;
        LittleEndian::write_f32(&mut bytes[offset..], self.unmount_time);
        offset += 4;

        LittleEndian::write_i32(&mut bytes[offset..], self.mount_count);
        offset += 4;
        LittleEndian::write_i32(&mut bytes[offset..], self.magic);
        offset += 4;
        LittleEndian::write_i32(&mut bytes[offset..], self.inode_size);
        offset += 4;
        LittleEndian::write_i32(&mut bytes[offset..], self.block_size);
        offset += 4;
        LittleEndian::write_i32(&mut bytes[offset..], self.first_inode);
        offset += 4;
        LittleEndian::write_i32(&mut bytes[offset..], self.first_block);
        offset += 4;
        LittleEndian::write_i32(&mut bytes[offset..], self.bm_block_start);
        offset += 4;
        LittleEndian::write_i32(&mut bytes[offset..], self.bm_inode_start);
        offset += 4;
        LittleEndian::write_i32(&mut bytes[offset..], self.inode_start);
        offset += 4;
        LittleEndian::write_i32(&mut bytes[offset..], self.block_start);

        return bytes;
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self>
    where
        Self: core::marker::Sized,
    {
        if bytes.len() < SUPER_BLOCK_SIZE as usize {
            return None;
        }

        let mut fields = [0i32; 17];

        for (i, field) in fields.iter_mut().enumerate() {
            *field = LittleEndian::read_i32(&bytes[i * 4..]);
        }

        return Some(Self {
            filesystem_type: fields[0],
            inodes_count: fields[1],
            blocks_count: fields[2],
            free_inodes_count: fields[3],
            free_blocks_count: fields[4],
            mount_time: LittleEndian::read_f32(&bytes[20..]),
            unmount_time: LittleEndian::read_f32(&bytes[24..]),
            mount_count: fields[7],
            magic: fields[8],
            inode_size: fields[9],
            block_size: fields[10],
            first_inode: fields[11],
            first_block: fields[12],
            bm_block_start: fields[13],
            bm_inode_start: fields[14],
            inode_start: fields[15],
            block_start: fields[16],
        });
    }

    fn generic_bytes_rep(bytes: &Self::BytesArrayType) -> &[u8] {
        return bytes;
    }

    fn size() -> u64 {
        return SUPER_BLOCK_SIZE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let sb = SuperBlock::new(1000, 10, 0.0);

        assert_eq!(sb.bm_inode_start, 1068);
        assert_eq!(sb.bm_block_start, 1078);
        assert_eq!(sb.inode_start, 1108);
        assert_eq!(sb.block_start, 1108 + 880);
        assert_eq!(sb.free_inodes_count, 10);
        assert_eq!(sb.free_blocks_count, 30);
        assert_eq!(sb.magic, 0xEF53);
        assert_eq!(sb.end(), 1988 + 30 * 64);
    }

    #[test]
    fn test_field_order() {
        let sb = SuperBlock::new(0, 4, 12.0);
        let bytes = sb.to_bytes();

        assert_eq!(LittleEndian::read_i32(&bytes[0..]), 2);
        assert_eq!(LittleEndian::read_i32(&bytes[32..]), 0xEF53);
        assert_eq!(LittleEndian::read_i32(&bytes[52..]), sb.bm_block_start);
        assert_eq!(LittleEndian::read_i32(&bytes[56..]), sb.bm_inode_start);
        assert_eq!(SuperBlock::from_bytes(&bytes), Some(sb));
    }
}
