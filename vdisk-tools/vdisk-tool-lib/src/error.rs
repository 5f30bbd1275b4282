use thiserror::Error;
use vdisk::{ImageError, VDiskError};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    Disk(VDiskError<ImageError>),
    #[error("invalid size '{0}'")]
    InvalidSize(String),
    #[error("invalid unit '{0}', expected B, K or M")]
    InvalidUnit(String),
    #[error("invalid fit '{0}', expected BF, FF or WF")]
    InvalidFit(String),
    #[error("invalid partition type '{0}', expected P, E or L")]
    InvalidType(String),
    #[error("{message}: {source}")]
    Io {
        message: String,
        source: std::io::Error,
    },
}

impl From<VDiskError<ImageError>> for ToolError {
    fn from(e: VDiskError<ImageError>) -> Self {
        return ToolError::Disk(e);
    }
}

impl ToolError {
    pub fn io(message: &str, source: std::io::Error) -> Self {
        return ToolError::Io {
            message: String::from(message),
            source,
        };
    }
}
