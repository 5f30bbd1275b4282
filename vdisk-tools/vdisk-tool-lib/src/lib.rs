mod error;
mod logger;
mod manager;

pub use error::ToolError;
pub use logger::{init_logging, log_level, LOG_ENV};
pub use manager::Manager;

use byte_unit::Byte;
use log::warn;
use std::io::Write;
use std::path::Path;
use std::process::exit;
use vdisk::disk_blocks::PartitionType;
use vdisk::{Fit, Session};

const MKFILE_PATTERN: &[u8] = b"0123456789";

pub fn sized_string_to_u64(string: &str) -> Option<u64> {
    return match Byte::from_str(string) {
        Ok(b) => Some(b.get_bytes() as u64),
        Err(_) => None,
    };
}

pub fn u64_to_sized_string(n: u64) -> String {
    return Byte::from(n).get_appropriate_unit(true).to_string();
}

/// Reads a size either as a plain count with a B/K/M unit, or as a sized string such as "5MiB".
pub fn parse_size(size: &str, unit: Option<&str>) -> Result<u64, ToolError> {
    let bytes = match unit {
        Some(unit) => {
            let multiplier: u64 = match unit.trim().to_ascii_uppercase().as_str() {
                "B" => 1,
                "K" => 1024,
                "M" => 1024 * 1024,
                _ => return Err(ToolError::InvalidUnit(String::from(unit))),
            };

            match size.trim().parse::<u64>() {
                Ok(n) => n.checked_mul(multiplier),
                Err(_) => None,
            }
        }
        None => sized_string_to_u64(size.trim()),
    };

    return match bytes {
        Some(b) if b > 0 => Ok(b),
        _ => Err(ToolError::InvalidSize(String::from(size))),
    };
}

pub fn parse_fit(value: &str) -> Result<Fit, ToolError> {
    return match Fit::parse(value) {
        Some(fit) => Ok(fit),
        None => Err(ToolError::InvalidFit(String::from(value))),
    };
}

pub fn parse_partition_type(value: &str) -> Result<PartitionType, ToolError> {
    return match PartitionType::parse(value) {
        Some(kind) => Ok(kind),
        None => Err(ToolError::InvalidType(String::from(value))),
    };
}

/// File content for `mkfile -s`: the digits 0-9 repeated up to `size` bytes.
pub fn digit_pattern(size: usize) -> Vec<u8> {
    return MKFILE_PATTERN.iter().cycle().take(size).copied().collect();
}

/// Starts a session with the named partition of `image` mounted, returning the mount id.
pub fn session_with_mount(image: &str, partition: &str) -> Result<(Session, String), ToolError> {
    let mut session = Session::new(Box::new(Manager::new()));
    let id = session.mount(Path::new(image), partition)?;

    return Ok((session, id));
}

/// Writes every readable, non-empty file followed by a newline and returns how many were written.
/// Paths that cannot be read are skipped.
pub fn concatenate<W: Write>(
    session: &Session,
    id: &str,
    paths: &[&str],
    out: &mut W,
) -> Result<usize, ToolError> {
    let mut written = 0;

    for path in paths {
        let content = match session.read_file(id, path) {
            Ok(content) => content,
            Err(e) => {
                warn!("[CAT] skipping {}: {}", path, e);
                continue;
            }
        };

        if content.is_empty() {
            continue;
        }

        out.write_all(&content)
            .and_then(|_| out.write_all(b"\n"))
            .map_err(|e| ToolError::io("Failed to write to stdout", e))?;
        written += 1;
    }

    return Ok(written);
}

/// Prints the error and exits with status 1.
pub fn or_exit<T>(result: Result<T, ToolError>) -> T {
    return match result {
        Ok(value) => value,
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    };
}
