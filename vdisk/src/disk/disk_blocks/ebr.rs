use super::partition::{PartitionStatus, PARTITION_NAME_LEN};
use crate::disk::space::{Fit, Span};
use crate::utils::{read_fixed_str, write_fixed_str};
use crate::ByteSerializable;
use byteorder::{ByteOrder, LittleEndian};

pub const EBR_SIZE: u64 = 30;

/// Header of a logical partition. The chain inside the extended partition ends with a sentinel whose start is -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ebr {
    pub mount: PartitionStatus,
    pub fit: Fit,
    /// First byte of the data region, just after this header.
    pub start: i32,
    pub size: i32,
    /// Offset of the next header.
    pub next: i32,
    name: [u8; PARTITION_NAME_LEN],
}

impl Ebr {
    pub fn sentinel() -> Self {
        let mut name = [0u8; PARTITION_NAME_LEN];
        write_fixed_str(&mut name, "EBR-LOGIC");

        return Self {
            mount: PartitionStatus::Unused,
            fit: Fit::Worst,
            start: -1,
            size: -1,
            next: -1,
            name,
        };
    }

    pub fn new(fit: Fit, start: i32, size: i32, next: i32, name: &str) -> Self {
        let mut ebr = Self::sentinel();
        ebr.mount = PartitionStatus::Active;
        ebr.fit = fit;
        ebr.start = start;
        ebr.size = size;
        ebr.next = next;
        write_fixed_str(&mut ebr.name, name);

        return ebr;
    }

    pub fn is_sentinel(&self) -> bool {
        return self.start == -1;
    }

    pub fn name(&self) -> String {
        return read_fixed_str(&self.name);
    }
}

/// A logical partition occupies its header plus its data region.
impl Span for Ebr {
    fn span_start(&self) -> i64 {
        return self.start as i64 - EBR_SIZE as i64;
    }

    fn span_size(&self) -> i64 {
        return self.size as i64 + EBR_SIZE as i64;
    }

    fn is_allocated(&self) -> bool {
        return !self.is_sentinel() && self.size > 0;
    }
}

impl ByteSerializable for Ebr {
    type BytesArrayType = [u8; EBR_SIZE as usize];

    fn to_bytes(&self) -> Self::BytesArrayType {
        let mut bytes = [0u8; EBR_SIZE as usize];
        let mut offset = 0;

        bytes[offset] = self.mount.to_u8();
        offset += 1;
        bytes[offset] = self.fit.to_u8();
        offset += 1;

        LittleEndian::write_i32(&mut bytes[offset..], self.start);
        offset += 4;
        LittleEndian::write_i32(&mut bytes[offset..], self.size);
        offset += 4;
        LittleEndian::write_i32(&mut bytes[offset..], self.next);
        offset += 4;

        bytes[offset..offset + PARTITION_NAME_LEN].copy_from_slice(&self.name);

        return bytes;
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self>
    where
        Self: core::marker::Sized,
    {
        if bytes.len() < EBR_SIZE as usize {
            return None;
        }

        let mut offset = 0;

        let mount = PartitionStatus::from_u8(bytes[offset])?;
        offset += 1;
        let fit = Fit::from_u8(bytes[offset])?;
        offset += 1;

        let start = LittleEndian::read_i32(&bytes[offset..]);
        offset += 4;
        let size = LittleEndian::read_i32(&bytes[offset..]);
        offset += 4;
        let next = LittleEndian::read_i32(&bytes[offset..]);
        offset += 4;

        let mut name = [0u8; PARTITION_NAME_LEN];
        name.copy_from_slice(&bytes[offset..offset + PARTITION_NAME_LEN]);

        return Some(Self {
            mount,
            fit,
            start,
            size,
            next,
            name,
        });
    }

    fn generic_bytes_rep(bytes: &Self::BytesArrayType) -> &[u8] {
        return bytes;
    }

    fn size() -> u64 {
        return EBR_SIZE;
    }
}
