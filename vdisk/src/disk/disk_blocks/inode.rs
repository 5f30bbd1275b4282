use crate::ByteSerializable;
use byteorder::{ByteOrder, LittleEndian};

pub const INODE_SIZE: u64 = 88;
pub const DIRECT_POINTERS: usize = 12;
pub const POINTER_COUNT: usize = 15;

const DEFAULT_OWNER: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InodeType {
    Directory,
    File,
}

impl InodeType {
    pub fn from_u8(byte: u8) -> Option<Self> {
        return match byte {
            b'0' => Some(InodeType::Directory),
            b'1' => Some(InodeType::File),
            _ => None,
        };
    }

    pub fn to_u8(&self) -> u8 {
        return match self {
            InodeType::Directory => b'0',
            InodeType::File => b'1',
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inode {
    pub uid: i32,
    pub gid: i32,
    /// Content length in bytes.
    pub size: i32,
    pub access_time: f32,
    pub creation_time: f32,
    pub modified_time: f32,
    /// 12 direct pointers then single, double and triple indirect. -1 means unused.
    pub blocks: [i32; POINTER_COUNT],
    pub kind: InodeType,
    pub permissions: [u8; 3],
}

impl Inode {
    pub fn new(kind: InodeType, now: f32) -> Self {
        return Self {
            uid: DEFAULT_OWNER,
            gid: DEFAULT_OWNER,
            size: 0,
            access_time: now,
            creation_time: now,
            modified_time: now,
            blocks: [-1; POINTER_COUNT],
            kind,
            permissions: *b"664",
        };
    }

    /// The directory at inode 0.
    pub fn root(now: f32) -> Self {
        let mut inode = Self::new(InodeType::Directory, now);
        inode.permissions = *b"777";

        return inode;
    }

    pub fn is_directory(&self) -> bool {
        return self.kind == InodeType::Directory;
    }

    pub fn permissions(&self) -> String {
        return String::from_utf8_lossy(&self.permissions).into_owned();
    }

    /// Pointer levels below a slot: 0 for direct, then 1, 2 and 3.
    pub fn depth_of(slot: usize) -> u32 {
        return if slot < DIRECT_POINTERS {
            0
        } else {
            (slot - DIRECT_POINTERS + 1) as u32
        };
    }
}

impl ByteSerializable for Inode {
    type BytesArrayType = [u8; INODE_SIZE as usize];

    fn to_bytes(&self) -> Self::BytesArrayType {
        let mut bytes = [0u8; INODE_SIZE as usize];
        let mut offset = 0;

        LittleEndian::write_i32(&mut bytes[offset..], self.uid);
        offset += 4;
        LittleEndian::write_i32(&mut bytes[offset..], self.gid);
        offset += 4;
        LittleEndian::write_i32(&mut bytes[offset..], self.size);
        offset += 4;

        LittleEndian::write_f32(&mut bytes[offset..], self.access_time);
        offset += 4;
        LittleEndian::write_f32(&mut bytes[offset..], self.creation_time);
        offset += 4;
        LittleEndian::write_f32(&mut bytes[offset..], self.modified_time);
        offset += 4;

        for pointer in self.blocks.iter() {
            LittleEndian::write_i32(&mut bytes[offset..], *pointer);
            offset += 4;
        }

        bytes[offset] = self.kind.to_u8();
        offset += 1;

        bytes[offset..offset + 3].copy_from_slice(&self.permissions);

        return bytes;
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self>
    where
        Self: core::marker::Sized,
    {
        if bytes.len() < INODE_SIZE as usize {
            return None;
        }

        let mut offset = 0;

        let uid = LittleEndian::read_i32(&bytes[offset..]);
        offset += 4;
        let gid = LittleEndian::read_i32(&bytes[offset..]);
        offset += 4;
        let size = LittleEndian::read_i32(&bytes[offset..]);
        offset += 4;

        let access_time = LittleEndian::read_f32(&bytes[offset..]);
        offset += 4;
        let creation_time = LittleEndian::read_f32(&bytes[offset..]);
        offset += 4;
        let modified_time = LittleEndian::read_f32(&bytes[offset..]);
        offset += 4;

        let mut blocks = [-1i32; POINTER_COUNT];

        for pointer in blocks.iter_mut() {
            *pointer = LittleEndian::read_i32(&bytes[offset..]);
            offset += 4;
        }

        let kind = InodeType::from_u8(bytes[offset])?;
        offset += 1;

        let mut permissions = [0u8; 3];
        permissions.copy_from_slice(&bytes[offset..offset + 3]);

        return Some(Self {
            uid,
            gid,
            size,
            access_time,
            creation_time,
            modified_time,
            blocks,
            kind,
            permissions,
        });
    }

    fn generic_bytes_rep(bytes: &Self::BytesArrayType) -> &[u8] {
        return bytes;
    }

    fn size() -> u64 {
        return INODE_SIZE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let inode = Inode::new(InodeType::File, 100.0);

        assert_eq!(inode.blocks, [-1; POINTER_COUNT]);
        assert_eq!(inode.permissions(), "664");
        assert_eq!(Inode::root(0.0).permissions(), "777");
    }

    #[test]
    fn test_type_byte() {
        let bytes = Inode::new(InodeType::File, 0.0).to_bytes();
        assert_eq!(bytes[84], b'1');
        assert_eq!(&bytes[85..88], b"664");
    }

    #[test]
    fn test_depth_of() {
        assert_eq!(Inode::depth_of(0), 0);
        assert_eq!(Inode::depth_of(11), 0);
        assert_eq!(Inode::depth_of(12), 1);
        assert_eq!(Inode::depth_of(13), 2);
        assert_eq!(Inode::depth_of(14), 3);
    }
}
