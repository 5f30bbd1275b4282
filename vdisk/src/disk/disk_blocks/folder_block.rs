use super::BLOCK_SIZE;
use crate::utils::{read_fixed_str, write_fixed_str};
use crate::ByteSerializable;
use byteorder::{ByteOrder, LittleEndian};

pub const FOLDER_ENTRIES: usize = 4;
pub const FOLDER_NAME_LEN: usize = 12;
const ENTRY_SIZE: usize = FOLDER_NAME_LEN + 4;
const FREE_MARKER: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderEntry {
    name: [u8; FOLDER_NAME_LEN],
    pub inode: i32,
}

impl FolderEntry {
    pub fn free() -> Self {
        return Self::named(FREE_MARKER, -1);
    }

    pub fn named(name: &str, inode: i32) -> Self {
        let mut entry = Self {
            name: [0u8; FOLDER_NAME_LEN],
            inode,
        };
        write_fixed_str(&mut entry.name, name);

        return entry;
    }

    pub fn name(&self) -> String {
        return read_fixed_str(&self.name);
    }

    pub fn is_free(&self) -> bool {
        return self.inode == -1;
    }
}

/// Four directory entries. Slots 0 and 1 are always "." and "..".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderBlock {
    pub entries: [FolderEntry; FOLDER_ENTRIES],
}

impl FolderBlock {
    pub fn new(own: i32, parent: i32) -> Self {
        return Self {
            entries: [
                FolderEntry::named(".", own),
                FolderEntry::named("..", parent),
                FolderEntry::free(),
                FolderEntry::free(),
            ],
        };
    }

    /// Indices of "." and ".." as recorded in this block.
    pub fn links(&self) -> (i32, i32) {
        return (self.entries[0].inode, self.entries[1].inode);
    }

    /// Places the entry in the first free child slot. Returns false when the block is full.
    pub fn insert(&mut self, entry: FolderEntry) -> bool {
        return match self.entries[2..].iter_mut().find(|e| e.is_free()) {
            Some(slot) => {
                *slot = entry;
                true
            }
            None => false,
        };
    }

    pub fn find(&self, name: &str) -> Option<i32> {
        return self
            .children()
            .find(|e| e.name() == name)
            .map(|e| e.inode);
    }

    /// Occupied slots, skipping "." and "..".
    pub fn children(&self) -> impl Iterator<Item = &FolderEntry> + '_ {
        return self.entries[2..].iter().filter(|e| !e.is_free());
    }
}

impl ByteSerializable for FolderBlock {
    type BytesArrayType = [u8; BLOCK_SIZE as usize];

    fn to_bytes(&self) -> Self::BytesArrayType {
        let mut bytes = [0u8; BLOCK_SIZE as usize];
        let mut offset = 0;

        for entry in self.entries.iter() {
            bytes[offset..offset + FOLDER_NAME_LEN].copy_from_slice(&entry.name);
            offset += FOLDER_NAME_LEN;
            LittleEndian::write_i32(&mut bytes[offset..], entry.inode);
            offset += 4;
        }

        return bytes;
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self>
    where
        Self: core::marker::Sized,
    {
        if bytes.len() < BLOCK_SIZE as usize {
            return None;
        }

        let mut entries = [FolderEntry::free(); FOLDER_ENTRIES];

        for (i, entry) in entries.iter_mut().enumerate() {
            let offset = i * ENTRY_SIZE;
            entry.name.copy_from_slice(&bytes[offset..offset + FOLDER_NAME_LEN]);
            entry.inode = LittleEndian::read_i32(&bytes[offset + FOLDER_NAME_LEN..]);
        }

        return Some(Self { entries });
    }

    fn generic_bytes_rep(bytes: &Self::BytesArrayType) -> &[u8] {
        return bytes;
    }

    fn size() -> u64 {
        return BLOCK_SIZE;
    }
}
