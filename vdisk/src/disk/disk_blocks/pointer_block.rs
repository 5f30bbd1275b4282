use super::BLOCK_SIZE;
use crate::ByteSerializable;
use byteorder::{ByteOrder, LittleEndian};

pub const POINTERS_PER_BLOCK: usize = 16;

/// Sixteen block indices used by the indirect levels. -1 means unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerBlock {
    pub pointers: [i32; POINTERS_PER_BLOCK],
}

impl PointerBlock {
    pub fn new() -> Self {
        return Self {
            pointers: [-1; POINTERS_PER_BLOCK],
        };
    }
}

impl ByteSerializable for PointerBlock {
    type BytesArrayType = [u8; BLOCK_SIZE as usize];

    fn to_bytes(&self) -> Self::BytesArrayType {
        let mut bytes = [0u8; BLOCK_SIZE as usize];
        LittleEndian::write_i32_into(&self.pointers, &mut bytes);

        return bytes;
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self>
    where
        Self: core::marker::Sized,
    {
        if bytes.len() < BLOCK_SIZE as usize {
            return None;
        }

        let mut pointers = [0i32; POINTERS_PER_BLOCK];
        LittleEndian::read_i32_into(&bytes[..BLOCK_SIZE as usize], &mut pointers);

        return Some(Self { pointers });
    }

    fn generic_bytes_rep(bytes: &Self::BytesArrayType) -> &[u8] {
        return bytes;
    }

    fn size() -> u64 {
        return BLOCK_SIZE;
    }
}
