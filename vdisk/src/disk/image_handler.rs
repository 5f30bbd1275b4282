use super::DiskHandler;
use crate::VDiskErrorConvertible;
use log::{debug, info};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

const ZERO_CHUNK: usize = 1024 * 1024;

#[derive(Debug, Error)]
#[error("{message}: {source}")]
pub struct ImageError {
    message: String,
    #[source]
    source: std::io::Error,
}

impl ImageError {
    pub fn new(message: &str, source: std::io::Error) -> Self {
        return Self {
            message: String::from(message),
            source,
        };
    }

    pub fn io_kind(&self) -> std::io::ErrorKind {
        return self.source.kind();
    }
}

impl VDiskErrorConvertible for ImageError {}

impl PartialEq for ImageError {
    fn eq(&self, other: &Self) -> bool {
        return self.message == other.message && self.source.kind() == other.source.kind();
    }
}

/// A disk image on the host filesystem. The file is opened for every call and closed again straight after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandler {
    path: PathBuf,
}

impl ImageHandler {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        return Self {
            path: path.as_ref().to_path_buf(),
        };
    }

    pub fn path(&self) -> &Path {
        return &self.path;
    }

    fn open_for_write(&self) -> Result<File, ImageError> {
        return OpenOptions::new().write(true).open(&self.path).map_err(|e| {
            ImageError::new(&format!("Failed to open {}", self.path.display()), e)
        });
    }
}

impl DiskHandler<ImageError> for ImageHandler {
    fn write_bytes(&mut self, bytes: &[u8], location: u64) -> Result<(), ImageError> {
        let mut file = self.open_for_write()?;

        file.seek(SeekFrom::Start(location)).map_err(|e| {
            ImageError::new(&format!("Failed to seek to location: {}", location), e)
        })?;
        file.write_all(bytes)
            .map_err(|e| ImageError::new("Failed to write bytes", e))?;

        return Ok(());
    }

    fn read_bytes(&self, location: u64, amount: u64) -> Result<Vec<u8>, ImageError> {
        let mut file = File::open(&self.path).map_err(|e| {
            ImageError::new(&format!("Failed to open {}", self.path.display()), e)
        })?;

        file.seek(SeekFrom::Start(location)).map_err(|e| {
            ImageError::new(&format!("Failed to seek to location: {}", location), e)
        })?;

        let mut result = vec![0u8; amount as usize];
        file.read_exact(&mut result)
            .map_err(|e| ImageError::new("Failed to read bytes", e))?;

        return Ok(result);
    }

    fn zero_range(&mut self, start: u64, end: u64) -> Result<(), ImageError> {
        let mut file = self.open_for_write()?;

        file.seek(SeekFrom::Start(start)).map_err(|e| {
            ImageError::new(&format!("Failed to seek to location: {}", start), e)
        })?;

        return write_zeros(&mut file, end.saturating_sub(start));
    }

    fn disk_size(&self) -> Result<u64, ImageError> {
        let metadata = fs::metadata(&self.path).map_err(|e| {
            ImageError::new(
                &format!("Could not determine size of {}", self.path.display()),
                e,
            )
        })?;

        return Ok(metadata.len());
    }
}

fn write_zeros(file: &mut File, amount: u64) -> Result<(), ImageError> {
    let chunk = vec![0u8; ZERO_CHUNK];
    let mut remaining = amount;

    while remaining > 0 {
        let len = core::cmp::min(remaining, ZERO_CHUNK as u64) as usize;
        file.write_all(&chunk[..len])
            .map_err(|e| ImageError::new("Failed to write null bytes", e))?;
        remaining -= len as u64;
    }

    return Ok(());
}

/// Creates a zero filled image of `size` bytes, creating parent directories as needed.
pub fn create_image<P: AsRef<Path>>(path: P, size: u64) -> Result<ImageHandler, ImageError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                ImageError::new(&format!("Failed to create {}", parent.display()), e)
            })?;
        }
    }

    let mut file = File::create(path)
        .map_err(|e| ImageError::new(&format!("Failed to create {}", path.display()), e))?;
    write_zeros(&mut file, size)?;

    info!("[DISK] created {} ({} bytes)", path.display(), size);

    return Ok(ImageHandler::new(path));
}

pub fn remove_image<P: AsRef<Path>>(path: P) -> Result<(), ImageError> {
    let path = path.as_ref();

    fs::remove_file(path)
        .map_err(|e| ImageError::new(&format!("Failed to remove {}", path.display()), e))?;

    debug!("[DISK] removed {}", path.display());

    return Ok(());
}
