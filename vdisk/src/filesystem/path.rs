use super::{Filesystem, ROOT_INODE};
use crate::disk::disk_blocks::{FolderBlock, FolderEntry, Inode, InodeType, FOLDER_NAME_LEN};
use crate::utils::fits_field;
use crate::{VDiskError, VDiskErrorConvertible};
use log::{debug, info};

/// Splits an absolute or relative path on '/', dropping empty segments.
pub fn split_path(path: &str) -> Vec<&str> {
    return path.split('/').filter(|s| !s.is_empty()).collect();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub inode: i32,
    pub kind: InodeType,
    pub size: i32,
}

impl<'a, 'b, E: VDiskErrorConvertible> Filesystem<'a, 'b, E> {
    /// Walks `segments` from `start`. Missing directories are created when `create_parents` is set.
    pub fn resolve(
        &mut self,
        start: i32,
        segments: &[&str],
        create_parents: bool,
    ) -> Result<i32, VDiskError<E>> {
        let (first, rest) = match segments.split_first() {
            Some(split) => split,
            None => return Ok(start),
        };

        let inode = self.read_inode(start)?;

        if !inode.is_directory() {
            return Err(VDiskError::NotADirectory(String::from(*first)));
        }

        let child = match self.find_entry(&inode, first)? {
            Some(child) => child,
            None if create_parents => self.create_child(start, first, InodeType::Directory)?,
            None => return Err(VDiskError::PathNotFound(String::from(*first))),
        };

        return self.resolve(child, rest, create_parents);
    }

    /// Same walk as `resolve` without creating anything.
    pub fn lookup(&self, start: i32, segments: &[&str]) -> Result<i32, VDiskError<E>> {
        let (first, rest) = match segments.split_first() {
            Some(split) => split,
            None => return Ok(start),
        };

        let inode = self.read_inode(start)?;

        if !inode.is_directory() {
            return Err(VDiskError::NotADirectory(String::from(*first)));
        }

        return match self.find_entry(&inode, first)? {
            Some(child) => self.lookup(child, rest),
            None => Err(VDiskError::PathNotFound(String::from(*first))),
        };
    }

    /// Allocates a new inode named `name` under `parent`. A directory gets its first folder block straight away.
    pub(crate) fn create_child(
        &mut self,
        parent: i32,
        name: &str,
        kind: InodeType,
    ) -> Result<i32, VDiskError<E>> {
        if !fits_field(name, FOLDER_NAME_LEN) || name == "." || name == ".." {
            return Err(VDiskError::InvalidName(String::from(name)));
        }

        let now = self.manager.timestamp();
        let mut parent_inode = self.read_inode(parent)?;
        let parent_links = self.links_of(parent, &parent_inode)?;

        let index = self.allocate_inode(&Inode::new(kind, now))?;

        if kind == InodeType::Directory {
            let mut inode = self.read_inode(index)?;
            let block = FolderBlock::new(index, parent);
            inode.blocks[0] = self.allocate_block(&block)?;
            self.write_inode(index, &inode)?;
        }

        self.insert_entry(&mut parent_inode, parent_links, FolderEntry::named(name, index))?;
        parent_inode.modified_time = now;
        self.write_inode(parent, &parent_inode)?;

        debug!("[FS] '{}' -> inode {} ({:?})", name, index, kind);

        return Ok(index);
    }

    /// Creates the file or directory at `path` and returns its inode.
    ///
    /// An existing entry of the same kind is returned as is. Asking for a file where a directory
    /// already sits returns the directory, asking for a directory where a file sits fails.
    pub fn create_path(
        &mut self,
        path: &str,
        is_file: bool,
        create_parents: bool,
    ) -> Result<i32, VDiskError<E>> {
        let segments = split_path(path);

        let (name, parents) = match segments.split_last() {
            Some(split) => split,
            None => return Err(VDiskError::InvalidPath(String::from(path))),
        };

        let parent = self.resolve(ROOT_INODE, parents, create_parents)?;
        let parent_inode = self.read_inode(parent)?;

        if !parent_inode.is_directory() {
            return Err(VDiskError::NotADirectory(String::from(path)));
        }

        if let Some(existing) = self.find_entry(&parent_inode, name)? {
            let existing_inode = self.read_inode(existing)?;

            if !is_file && !existing_inode.is_directory() {
                return Err(VDiskError::AlreadyExists(String::from(path)));
            }

            return Ok(existing);
        }

        let kind = if is_file {
            InodeType::File
        } else {
            InodeType::Directory
        };
        let index = self.create_child(parent, name, kind)?;

        info!("[FS] created {} ({:?})", path, kind);

        return Ok(index);
    }

    /// Replaces the content of the file at `path`, creating the file if its directory exists.
    pub fn write_file(&mut self, path: &str, content: &[u8]) -> Result<(), VDiskError<E>> {
        let segments = split_path(path);

        if segments.is_empty() {
            return Err(VDiskError::NotAFile(String::from(path)));
        }

        let index = match self.lookup(ROOT_INODE, &segments) {
            Ok(index) => index,
            Err(VDiskError::PathNotFound(_)) => self.create_path(path, true, false)?,
            Err(e) => return Err(e),
        };

        let mut inode = self.read_inode(index)?;

        if inode.is_directory() {
            return Err(VDiskError::NotAFile(String::from(path)));
        }

        self.write_content(&mut inode, content)?;

        inode.size = content.len() as i32;
        inode.modified_time = self.manager.timestamp();
        self.write_inode(index, &inode)?;

        debug!("[FS] wrote {} bytes to {}", content.len(), path);

        return Ok(());
    }

    pub fn read_file(&self, path: &str) -> Result<Vec<u8>, VDiskError<E>> {
        let index = self.lookup(ROOT_INODE, &split_path(path))?;
        let inode = self.read_inode(index)?;

        if inode.is_directory() {
            return Err(VDiskError::NotAFile(String::from(path)));
        }

        let mut content = self.read_content(&inode)?;
        content.truncate(inode.size.max(0) as usize);

        return Ok(content);
    }

    pub fn list_directory(&self, path: &str) -> Result<Vec<DirectoryEntry>, VDiskError<E>> {
        let index = self.lookup(ROOT_INODE, &split_path(path))?;
        let inode = self.read_inode(index)?;

        if !inode.is_directory() {
            return Err(VDiskError::NotADirectory(String::from(path)));
        }

        let mut listing = Vec::new();

        for entry in self.entries(&inode)? {
            let child = self.read_inode(entry.inode)?;
            listing.push(DirectoryEntry {
                name: entry.name(),
                inode: entry.inode,
                kind: child.kind,
                size: child.size,
            });
        }

        return Ok(listing);
    }
}
