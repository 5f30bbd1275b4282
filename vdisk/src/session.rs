use crate::disk::disk_blocks::{Ebr, Mbr, Partition, MBR_SIZE};
use crate::disk::{
    create_image, remove_image, Fit, ImageHandler, PartitionRequest, PartitionTable,
};
use crate::filesystem::{DirectoryEntry, Filesystem};
use crate::mount::MountTable;
use crate::registry::{Registry, SUPERUSER, USERS_FILE};
use crate::{ImageError, ImageResult, OSManager, VDiskError, VDiskErrorConvertible};
use log::info;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedUser {
    pub username: String,
    pub partition_id: String,
}

/// Everything the command layer calls: disks, partitions, mounts, files and the users registry.
///
/// Holds the mount table, at most one logged in user and the registry loaded for that user.
#[derive(Debug)]
pub struct Session {
    manager: Box<dyn OSManager>,
    mounts: MountTable,
    user: Option<LoggedUser>,
    registry: Option<Registry>,
}

impl Session {
    pub fn new(manager: Box<dyn OSManager>) -> Self {
        return Self::with_mounts(manager, MountTable::new());
    }

    pub fn with_mounts(manager: Box<dyn OSManager>, mounts: MountTable) -> Self {
        return Self {
            manager,
            mounts,
            user: None,
            registry: None,
        };
    }

    pub fn create_disk(&self, path: &Path, size: u64, fit: Fit) -> ImageResult<()> {
        if size <= MBR_SIZE || size > i32::MAX as u64 {
            return Err(VDiskError::InvalidSize(size as i64));
        }

        let mut handler = create_image(path, size).map_err(|e| e.into_vdisk_error())?;
        PartitionTable::<ImageError>::create(&mut handler, self.manager.as_ref(), fit)?;

        return Ok(());
    }

    pub fn remove_disk(&self, path: &Path) -> ImageResult<()> {
        return remove_image(path).map_err(|e| e.into_vdisk_error());
    }

    /// Returns the start of the new partition's data region.
    pub fn create_partition(&self, path: &Path, request: &PartitionRequest) -> ImageResult<i64> {
        let mut handler = ImageHandler::new(path);
        let mut table = PartitionTable::<ImageError>::open(&mut handler)?;

        return table.create_partition(request);
    }

    /// The MBR and the logical partitions of a disk.
    pub fn partitions(&self, path: &Path) -> ImageResult<(Mbr, Vec<Ebr>)> {
        let mut handler = ImageHandler::new(path);
        let table = PartitionTable::<ImageError>::open(&mut handler)?;
        let logical = table.logical_partitions()?;

        return Ok((table.mbr().clone(), logical));
    }

    pub fn mount(&mut self, path: &Path, name: &str) -> ImageResult<String> {
        return self.mounts.mount(path, name);
    }

    pub fn resolve_mount(&self, id: &str) -> ImageResult<(Partition, PathBuf)> {
        return self.mounts.resolve(id);
    }

    pub fn mounted(&self) -> Vec<(String, PathBuf)> {
        return self.mounts.mounted();
    }

    pub fn create_filesystem(&self, id: &str) -> ImageResult<()> {
        let (partition, path) = self.mounts.resolve(id)?;
        let mut handler = ImageHandler::new(&path);
        Filesystem::<ImageError>::format(&mut handler, self.manager.as_ref(), &partition)?;

        return Ok(());
    }

    fn with_filesystem<T, F>(&self, id: &str, op: F) -> ImageResult<T>
    where
        F: FnOnce(&mut Filesystem<'_, '_, ImageError>) -> ImageResult<T>,
    {
        let (partition, path) = self.mounts.resolve(id)?;
        let mut handler = ImageHandler::new(&path);
        let mut fs = Filesystem::open(&mut handler, self.manager.as_ref(), &partition)?;

        return op(&mut fs);
    }

    pub fn create_path(
        &self,
        id: &str,
        path: &str,
        is_file: bool,
        create_parents: bool,
    ) -> ImageResult<i32> {
        return self.with_filesystem(id, |fs| fs.create_path(path, is_file, create_parents));
    }

    pub fn write_file(&self, id: &str, path: &str, content: &[u8]) -> ImageResult<()> {
        return self.with_filesystem(id, |fs| fs.write_file(path, content));
    }

    pub fn read_file(&self, id: &str, path: &str) -> ImageResult<Vec<u8>> {
        return self.with_filesystem(id, |fs| fs.read_file(path));
    }

    pub fn list_directory(&self, id: &str, path: &str) -> ImageResult<Vec<DirectoryEntry>> {
        return self.with_filesystem(id, |fs| fs.list_directory(path));
    }

    pub fn current_user(&self) -> Option<&LoggedUser> {
        return self.user.as_ref();
    }

    /// The registry as last loaded or stored by this session.
    pub fn registry(&self) -> Option<&Registry> {
        return self.registry.as_ref();
    }

    fn load_registry(&self, id: &str) -> ImageResult<Registry> {
        let text = self.read_file(id, USERS_FILE)?;

        return Ok(Registry::parse(&String::from_utf8_lossy(&text)));
    }

    pub fn login(&mut self, username: &str, password: &str, id: &str) -> ImageResult<()> {
        if self.user.is_some() {
            return Err(VDiskError::AlreadySessionActive);
        }

        let registry = self.load_registry(id)?;

        if !registry.authenticate(username, password) {
            return Err(VDiskError::InvalidCredentials);
        }

        self.user = Some(LoggedUser {
            username: String::from(username),
            partition_id: String::from(id),
        });
        self.registry = Some(registry);

        info!("[USERS] {} logged in on {}", username, id);

        return Ok(());
    }

    /// Ends the session and returns the name of the user that was logged in.
    pub fn logout(&mut self) -> ImageResult<String> {
        let user = match self.user.take() {
            Some(user) => user,
            None => return Err(VDiskError::NoSession),
        };

        self.registry = None;

        info!("[USERS] {} logged out", user.username);

        return Ok(user.username);
    }

    /// Loads `users.txt` from the session's partition, applies `mutate` and stores the result.
    fn mutate_registry<F>(&mut self, mutate: F) -> ImageResult<()>
    where
        F: FnOnce(&mut Registry) -> ImageResult<()>,
    {
        let user = match &self.user {
            Some(user) if user.username == SUPERUSER => user.clone(),
            _ => return Err(VDiskError::PermissionDenied),
        };

        let mut registry = self.load_registry(&user.partition_id)?;
        mutate(&mut registry)?;
        self.write_file(&user.partition_id, USERS_FILE, registry.to_text().as_bytes())?;

        info!(
            "[USERS] stored {} group rows and {} user rows on {}",
            registry.groups().len(),
            registry.users().len(),
            user.partition_id
        );

        self.registry = Some(registry);

        return Ok(());
    }

    pub fn add_group(&mut self, name: &str) -> ImageResult<()> {
        return self.mutate_registry(|r| r.add_group(name).map(|_| ()));
    }

    pub fn remove_group(&mut self, name: &str) -> ImageResult<()> {
        return self.mutate_registry(|r| r.remove_group(name));
    }

    pub fn add_user(&mut self, username: &str, password: &str, group: &str) -> ImageResult<()> {
        return self.mutate_registry(|r| r.add_user(username, password, group));
    }

    pub fn remove_user(&mut self, username: &str) -> ImageResult<()> {
        return self.mutate_registry(|r| r.remove_user(username));
    }

    pub fn change_user_group(&mut self, username: &str, group: &str) -> ImageResult<()> {
        return self.mutate_registry(|r| r.change_group(username, group));
    }
}
