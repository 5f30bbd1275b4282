use super::{FileBlock, Inode, SuperBlock};
use crate::disk::space::{Fit, Span};
use crate::utils::{read_fixed_str, write_fixed_str};
use crate::ByteSerializable;
use byteorder::{ByteOrder, LittleEndian};

pub const PARTITION_SIZE: u64 = 35;
pub const PARTITION_NAME_LEN: usize = 16;
pub const PARTITION_ID_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionStatus {
    Unused,
    Active,
    Mounted,
}

impl PartitionStatus {
    pub fn from_u8(byte: u8) -> Option<Self> {
        return match byte {
            b'9' => Some(PartitionStatus::Unused),
            b'0' => Some(PartitionStatus::Active),
            b'1' => Some(PartitionStatus::Mounted),
            _ => None,
        };
    }

    pub fn to_u8(&self) -> u8 {
        return match self {
            PartitionStatus::Unused => b'9',
            PartitionStatus::Active => b'0',
            PartitionStatus::Mounted => b'1',
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionType {
    Primary,
    Extended,
    Logical,
}

impl PartitionType {
    pub fn from_u8(byte: u8) -> Option<Self> {
        return match byte {
            b'P' => Some(PartitionType::Primary),
            b'E' => Some(PartitionType::Extended),
            b'L' => Some(PartitionType::Logical),
            _ => None,
        };
    }

    pub fn to_u8(&self) -> u8 {
        return match self {
            PartitionType::Primary => b'P',
            PartitionType::Extended => b'E',
            PartitionType::Logical => b'L',
        };
    }

    pub fn parse(value: &str) -> Option<Self> {
        let upper = value.trim().to_ascii_uppercase();

        return match upper.as_str() {
            "P" => Some(PartitionType::Primary),
            "E" => Some(PartitionType::Extended),
            "L" => Some(PartitionType::Logical),
            _ => None,
        };
    }
}

/// One of the four slots of the MBR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub status: PartitionStatus,
    pub kind: PartitionType,
    pub fit: Fit,
    pub start: i32,
    pub size: i32,
    name: [u8; PARTITION_NAME_LEN],
    pub correlative: i32,
    id: [u8; PARTITION_ID_LEN],
}

impl Partition {
    /// An unused slot.
    pub fn empty() -> Self {
        let mut name = [0u8; PARTITION_NAME_LEN];
        write_fixed_str(&mut name, "$");

        return Self {
            status: PartitionStatus::Unused,
            kind: PartitionType::Primary,
            fit: Fit::Worst,
            start: -1,
            size: -1,
            name,
            correlative: -1,
            id: *b"$$$$",
        };
    }

    pub fn new(kind: PartitionType, fit: Fit, start: i32, size: i32, name: &str) -> Self {
        let mut partition = Self::empty();
        partition.status = PartitionStatus::Active;
        partition.kind = kind;
        partition.fit = fit;
        partition.start = start;
        partition.size = size;
        write_fixed_str(&mut partition.name, name);

        return partition;
    }

    pub fn is_empty(&self) -> bool {
        return self.start == -1;
    }

    pub fn name(&self) -> String {
        return read_fixed_str(&self.name);
    }

    pub fn id(&self) -> String {
        return read_fixed_str(&self.id);
    }

    pub fn is_mounted(&self) -> bool {
        return self.status == PartitionStatus::Mounted;
    }

    pub fn mount(&mut self, correlative: i32, id: &str) {
        self.status = PartitionStatus::Mounted;
        self.correlative = correlative;
        write_fixed_str(&mut self.id, id);
    }

    /// Number of inodes a filesystem on this partition holds.
    pub fn calculate_n(&self) -> i32 {
        return inode_capacity(self.size as i64);
    }
}

/// floor((size - superblock) / (inode bitmap byte + block bitmap bytes + inode + 3 blocks))
pub fn inode_capacity(partition_size: i64) -> i32 {
    let available = partition_size - SuperBlock::size() as i64;

    if available <= 0 {
        return 0;
    }

    let per_inode = 1 + 3 + Inode::size() as i64 + 3 * FileBlock::size() as i64;

    return (available / per_inode) as i32;
}

impl Span for Partition {
    fn span_start(&self) -> i64 {
        return self.start as i64;
    }

    fn span_size(&self) -> i64 {
        return self.size as i64;
    }
}

impl ByteSerializable for Partition {
    type BytesArrayType = [u8; PARTITION_SIZE as usize];

    fn to_bytes(&self) -> Self::BytesArrayType {
        let mut bytes = [0u8; PARTITION_SIZE as usize];
        let mut offset = 0;

        bytes[offset] = self.status.to_u8();
        offset += 1;
        bytes[offset] = self.kind.to_u8();
        offset += 1;
        bytes[offset] = self.fit.to_u8();
        offset += 1;

        LittleEndian::write_i32(&mut bytes[offset..], self.start);
        offset += 4;
        LittleEndian::write_i32(&mut bytes[offset..], self.size);
        offset += 4;

        bytes[offset..offset + PARTITION_NAME_LEN].copy_from_slice(&self.name);
        offset += PARTITION_NAME_LEN;

        LittleEndian::write_i32(&mut bytes[offset..], self.correlative);
        offset += 4;

        bytes[offset..offset + PARTITION_ID_LEN].copy_from_slice(&self.id);

        return bytes;
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self>
    where
        Self: core::marker::Sized,
    {
        if bytes.len() < PARTITION_SIZE as usize {
            return None;
        }

        let mut offset = 0;

        let status = PartitionStatus::from_u8(bytes[offset])?;
        offset += 1;
        let kind = PartitionType::from_u8(bytes[offset])?;
        offset += 1;
        let fit = Fit::from_u8(bytes[offset])?;
        offset += 1;

        let start = LittleEndian::read_i32(&bytes[offset..]);
        offset += 4;
        let size = LittleEndian::read_i32(&bytes[offset..]);
        offset += 4;

        let mut name = [0u8; PARTITION_NAME_LEN];
        name.copy_from_slice(&bytes[offset..offset + PARTITION_NAME_LEN]);
        offset += PARTITION_NAME_LEN;

        let correlative = LittleEndian::read_i32(&bytes[offset..]);
        offset += 4;

        let mut id = [0u8; PARTITION_ID_LEN];
        id.copy_from_slice(&bytes[offset..offset + PARTITION_ID_LEN]);

        return Some(Self {
            status,
            kind,
            fit,
            start,
            size,
            name,
            correlative,
            id,
        });
    }

    fn generic_bytes_rep(bytes: &Self::BytesArrayType) -> &[u8] {
        return bytes;
    }

    fn size() -> u64 {
        return PARTITION_SIZE;
    }
}
