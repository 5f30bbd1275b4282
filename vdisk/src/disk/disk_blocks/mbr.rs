use super::partition::{Partition, PartitionType, PARTITION_SIZE};
use crate::disk::space::Fit;
use crate::{ByteSerializable, OSManager};
use byteorder::{ByteOrder, LittleEndian};

pub const MBR_SIZE: u64 = 153;
pub const PARTITION_SLOTS: usize = 4;

/// The master boot record at offset 0 of every disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Mbr {
    pub size: i32,
    pub creation_time: f32,
    pub signature: i32,
    pub fit: Fit,
    pub partitions: [Partition; PARTITION_SLOTS],
}

impl Mbr {
    pub fn new(size: i32, fit: Fit, manager: &dyn OSManager) -> Self {
        return Self {
            size,
            creation_time: manager.timestamp(),
            signature: manager.disk_signature(),
            fit,
            partitions: [Partition::empty(); PARTITION_SLOTS],
        };
    }

    pub fn free_slot(&self) -> Option<usize> {
        return self.partitions.iter().position(|p| p.is_empty());
    }

    pub fn partition_by_name(&self, name: &str) -> Option<usize> {
        return self
            .partitions
            .iter()
            .position(|p| !p.is_empty() && p.name() == name);
    }

    pub fn partition_by_id(&self, id: &str) -> Option<usize> {
        return self
            .partitions
            .iter()
            .position(|p| p.is_mounted() && p.id() == id);
    }

    pub fn extended(&self) -> Option<&Partition> {
        return self
            .partitions
            .iter()
            .find(|p| !p.is_empty() && p.kind == PartitionType::Extended);
    }
}

impl ByteSerializable for Mbr {
    type BytesArrayType = [u8; MBR_SIZE as usize];

    fn to_bytes(&self) -> Self::BytesArrayType {
        let mut bytes = [0u8; MBR_SIZE as usize];
        let mut offset = 0;

        LittleEndian::write_i32(&mut bytes[offset..], self.size);
        offset += 4;
        LittleEndian::write_f32(&mut bytes[offset..], self.creation_time);
        offset += 4;
        LittleEndian::write_i32(&mut bytes[offset..], self.signature);
        offset += 4;

        bytes[offset] = self.fit.to_u8();
        offset += 1;

        for partition in self.partitions.iter() {
            bytes[offset..offset + PARTITION_SIZE as usize].copy_from_slice(&partition.to_bytes());
            offset += PARTITION_SIZE as usize;
        }

        return bytes;
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self>
    where
        Self: core::marker::Sized,
    {
        if bytes.len() < MBR_SIZE as usize {
            return None;
        }

        let mut offset = 0;

        let size = LittleEndian::read_i32(&bytes[offset..]);
        offset += 4;
        let creation_time = LittleEndian::read_f32(&bytes[offset..]);
        offset += 4;
        let signature = LittleEndian::read_i32(&bytes[offset..]);
        offset += 4;

        let fit = Fit::from_u8(bytes[offset])?;
        offset += 1;

        let mut partitions = [Partition::empty(); PARTITION_SLOTS];

        for partition in partitions.iter_mut() {
            *partition = Partition::from_bytes(&bytes[offset..offset + PARTITION_SIZE as usize])?;
            offset += PARTITION_SIZE as usize;
        }

        return Some(Self {
            size,
            creation_time,
            signature,
            fit,
            partitions,
        });
    }

    fn generic_bytes_rep(bytes: &Self::BytesArrayType) -> &[u8] {
        return bytes;
    }

    fn size() -> u64 {
        return MBR_SIZE;
    }
}
