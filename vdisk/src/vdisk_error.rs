use core::fmt::Debug;
use thiserror::Error;

/// Converts a handler's own error into a `VDiskError`. Handlers only need an empty impl.
pub trait VDiskErrorConvertible: Debug {
    fn into_vdisk_error(self) -> VDiskError<Self>
    where
        Self: Sized,
    {
        return VDiskError::DiskError(self);
    }
}

/// Coarse classification callers can branch on without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Capacity,
    Validation,
    NotFound,
    PermissionDenied,
    StateConflict,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VDiskError<E> {
    #[error("disk error: {0:?}")]
    DiskError(E),
    #[error("record at {offset} ({size} bytes) would pass the boundary {max_offset}")]
    CapacityExceeded {
        offset: i64,
        size: i64,
        max_offset: i64,
    },
    #[error("cannot read {size} bytes at {offset}, the image is {disk_size} bytes")]
    OutOfRange {
        offset: i64,
        size: u64,
        disk_size: u64,
    },
    #[error("corrupted record at {offset}")]
    CorruptedRecord { offset: i64 },
    #[error("index {0} points outside of the filesystem")]
    InvalidPointer(i32),
    #[error("all four partition slots are in use")]
    NoFreeSlot,
    #[error("no free space of {0} bytes")]
    InsufficientSpace(i64),
    #[error("no free blocks left")]
    NoFreeBlocks,
    #[error("no free inodes left")]
    NoFreeInodes,
    #[error("no mount letters left")]
    NoMountLetters,
    #[error("invalid size {0}")]
    InvalidSize(i64),
    #[error("invalid fit '{0}'")]
    InvalidFit(String),
    #[error("invalid partition type '{0}'")]
    InvalidPartitionType(String),
    #[error("invalid name '{0}'")]
    InvalidName(String),
    #[error("invalid path '{0}'")]
    InvalidPath(String),
    #[error("'{0}' is not a directory")]
    NotADirectory(String),
    #[error("'{0}' is not a file")]
    NotAFile(String),
    #[error("partition '{0}' is not a primary partition")]
    NotPrimary(String),
    #[error("partition '{0}' not found")]
    PartitionNotFound(String),
    #[error("no partition mounted with id '{0}'")]
    NotMounted(String),
    #[error("path '{0}' not found")]
    PathNotFound(String),
    #[error("the disk has no extended partition")]
    NoExtendedPartition,
    #[error("group '{0}' not found")]
    GroupNotFound(String),
    #[error("user '{0}' not found")]
    UserNotFound(String),
    #[error("invalid user or password")]
    InvalidCredentials,
    #[error("no active session")]
    NoSession,
    #[error("partition '{0}' has no filesystem")]
    NoFilesystem(String),
    #[error("permission denied")]
    PermissionDenied,
    #[error("a partition named '{0}' already exists")]
    DuplicateName(String),
    #[error("the disk already has an extended partition")]
    ExtendedExists,
    #[error("'{0}' already exists")]
    AlreadyExists(String),
    #[error("'{0}' is already active")]
    AlreadyActive(String),
    #[error("a session is already active")]
    AlreadySessionActive,
    #[error("'{0}' is already mounted")]
    AlreadyMounted(String),
}

impl<E> VDiskError<E> {
    pub fn kind(&self) -> ErrorKind {
        use VDiskError::*;

        return match self {
            DiskError(_) | OutOfRange { .. } | CorruptedRecord { .. } | InvalidPointer(_) => {
                ErrorKind::Io
            }
            CapacityExceeded { .. } | NoFreeSlot | InsufficientSpace(_) | NoFreeBlocks
            | NoFreeInodes | NoMountLetters => ErrorKind::Capacity,
            InvalidSize(_) | InvalidFit(_) | InvalidPartitionType(_) | InvalidName(_)
            | InvalidPath(_) | NotADirectory(_) | NotAFile(_) | NotPrimary(_) => {
                ErrorKind::Validation
            }
            PartitionNotFound(_) | NotMounted(_) | PathNotFound(_) | NoExtendedPartition
            | GroupNotFound(_) | UserNotFound(_) | InvalidCredentials | NoSession
            | NoFilesystem(_) => ErrorKind::NotFound,
            PermissionDenied => ErrorKind::PermissionDenied,
            DuplicateName(_) | ExtendedExists | AlreadyExists(_) | AlreadyActive(_)
            | AlreadySessionActive | AlreadyMounted(_) => ErrorKind::StateConflict,
        };
    }
}

/// Unwraps a handler result, converting the handler's error on failure.
macro_rules! handler_try {
    ($v:expr) => {
        match $v {
            Ok(val) => val,
            Err(e) => return Err(e.into_vdisk_error()),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, VDiskError};

    #[derive(Debug)]
    struct DummyError;

    #[test]
    fn test_fmt_disk_error() {
        let err: VDiskError<DummyError> = VDiskError::DiskError(DummyError);
        assert_eq!("disk error: DummyError", format!("{}", err));
    }

    #[test]
    fn test_fmt_named() {
        let err: VDiskError<DummyError> = VDiskError::PathNotFound(String::from("/docs"));
        assert_eq!("path '/docs' not found", format!("{}", err));
    }

    #[test]
    fn test_kinds() {
        let err: VDiskError<DummyError> = VDiskError::NoFreeSlot;
        assert_eq!(err.kind(), ErrorKind::Capacity);

        let err: VDiskError<DummyError> = VDiskError::ExtendedExists;
        assert_eq!(err.kind(), ErrorKind::StateConflict);

        let err: VDiskError<DummyError> = VDiskError::PermissionDenied;
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);

        let err: VDiskError<DummyError> = VDiskError::InvalidFit(String::from("XF"));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
