use crate::disk::disk_blocks::{Partition, PartitionType};
use crate::disk::{ImageHandler, PartitionTable};
use crate::{ImageError, ImageResult, VDiskError};
use log::debug;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_MOUNT_PREFIX: &str = "39";
const MOUNT_LETTERS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const MAX_PREFIX_LEN: usize = 2;

/// Mounted partitions of this process, keyed by mount id.
///
/// An id is the prefix, the slot number (1-4) and a letter that identifies the disk, e.g. `391A`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountTable {
    prefix: String,
    mounted: BTreeMap<String, PathBuf>,
    /// Disk paths in the order they were first seen. The position picks the letter.
    disks: Vec<PathBuf>,
}

impl MountTable {
    pub fn new() -> Self {
        return Self {
            prefix: String::from(DEFAULT_MOUNT_PREFIX),
            mounted: BTreeMap::new(),
            disks: Vec::new(),
        };
    }

    /// The id field holds four bytes, so the prefix can be at most two.
    pub fn with_prefix(prefix: &str) -> ImageResult<Self> {
        if prefix.len() > MAX_PREFIX_LEN || !prefix.is_ascii() {
            return Err(VDiskError::InvalidName(String::from(prefix)));
        }

        let mut table = Self::new();
        table.prefix = String::from(prefix);

        return Ok(table);
    }

    /// Mounts a primary partition by name, records the id in the MBR and returns it.
    pub fn mount(&mut self, disk_path: &Path, name: &str) -> ImageResult<String> {
        let mut handler = ImageHandler::new(disk_path);
        let mut table = PartitionTable::<ImageError>::open(&mut handler)?;

        let index = match table.mbr().partition_by_name(name) {
            Some(index) => index,
            None if table.name_in_use(name)? => {
                return Err(VDiskError::NotPrimary(String::from(name)))
            }
            None => return Err(VDiskError::PartitionNotFound(String::from(name))),
        };

        if table.mbr().partitions[index].kind != PartitionType::Primary {
            return Err(VDiskError::NotPrimary(String::from(name)));
        }

        let letter = self.letter_for(disk_path)?;
        let id = format!("{}{}{}", self.prefix, index + 1, letter);

        if self.mounted.contains_key(&id) {
            return Err(VDiskError::AlreadyMounted(id));
        }

        table.mount_partition(index, &id)?;
        self.mounted.insert(id.clone(), disk_path.to_path_buf());

        return Ok(id);
    }

    fn letter_for(&mut self, disk_path: &Path) -> ImageResult<char> {
        let index = match self.disks.iter().position(|p| p == disk_path) {
            Some(index) => index,
            None => {
                if self.disks.len() >= MOUNT_LETTERS.len() {
                    return Err(VDiskError::NoMountLetters);
                }

                self.disks.push(disk_path.to_path_buf());
                debug!(
                    "[MOUNT] {} gets letter {}",
                    disk_path.display(),
                    MOUNT_LETTERS[self.disks.len() - 1] as char
                );
                self.disks.len() - 1
            }
        };

        return Ok(MOUNT_LETTERS[index] as char);
    }

    /// Re-reads the MBR and returns the mounted partition with its disk path.
    pub fn resolve(&self, id: &str) -> ImageResult<(Partition, PathBuf)> {
        let path = match self.mounted.get(id) {
            Some(path) => path.clone(),
            None => return Err(VDiskError::NotMounted(String::from(id))),
        };

        let mut handler = ImageHandler::new(&path);
        let table = PartitionTable::<ImageError>::open(&mut handler)?;

        return match table.mbr().partition_by_id(id) {
            Some(index) => Ok((table.mbr().partitions[index], path)),
            None => Err(VDiskError::PartitionNotFound(String::from(id))),
        };
    }

    pub fn mounted(&self) -> Vec<(String, PathBuf)> {
        return self
            .mounted
            .iter()
            .map(|(id, path)| (id.clone(), path.clone()))
            .collect();
    }
}

impl Default for MountTable {
    fn default() -> Self {
        return Self::new();
    }
}
