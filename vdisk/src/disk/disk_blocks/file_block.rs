use super::BLOCK_SIZE;
use crate::ByteSerializable;

/// 64 bytes of raw file content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileBlock {
    pub content: [u8; BLOCK_SIZE as usize],
}

impl FileBlock {
    /// Copies up to 64 bytes of `chunk`, zero padding the rest.
    pub fn from_chunk(chunk: &[u8]) -> Self {
        let mut content = [0u8; BLOCK_SIZE as usize];
        let len = core::cmp::min(chunk.len(), content.len());
        content[..len].copy_from_slice(&chunk[..len]);

        return Self { content };
    }
}

impl ByteSerializable for FileBlock {
    type BytesArrayType = [u8; BLOCK_SIZE as usize];

    fn to_bytes(&self) -> Self::BytesArrayType {
        return self.content;
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self>
    where
        Self: core::marker::Sized,
    {
        if bytes.len() < BLOCK_SIZE as usize {
            return None;
        }

        let mut content = [0u8; BLOCK_SIZE as usize];
        content.copy_from_slice(&bytes[..BLOCK_SIZE as usize]);

        return Some(Self { content });
    }

    fn generic_bytes_rep(bytes: &Self::BytesArrayType) -> &[u8] {
        return bytes;
    }

    fn size() -> u64 {
        return BLOCK_SIZE;
    }
}
