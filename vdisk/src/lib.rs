#[macro_use]
mod vdisk_error;
mod bitmap;
mod byte_serializable;
pub mod disk;
pub mod filesystem;
mod manager;
mod mount;
pub mod registry;
mod session;
mod utils;

pub use bitmap::{BitMap, BLOCK_FREE, BLOCK_USED, INODE_FREE, INODE_USED};
pub use byte_serializable::ByteSerializable;
pub use disk::disk_blocks;
pub use disk::{
    create_image, remove_image, DiskHandler, Fit, ImageError, ImageHandler, PartitionRequest,
    PartitionTable,
};
pub use filesystem::{DirectoryEntry, Filesystem, ROOT_INODE};
pub use manager::OSManager;
pub use mount::{MountTable, DEFAULT_MOUNT_PREFIX};
pub use registry::{Group, Registry, User};
pub use session::{LoggedUser, Session};
pub use vdisk_error::{ErrorKind, VDiskError, VDiskErrorConvertible};

/// Result type of everything that works on image files.
pub type ImageResult<T> = Result<T, VDiskError<ImageError>>;
