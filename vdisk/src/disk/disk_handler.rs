use crate::{ByteSerializable, VDiskError, VDiskErrorConvertible};

/// Implementors can define an error struct if they wish but they must implement methods to read and write from an image file or memory.
/// Locations and addresses should all be in bytes
pub trait DiskHandler<E: VDiskErrorConvertible> {
    /// Write a slice of bytes to a location
    fn write_bytes(&mut self, bytes: &[u8], location: u64) -> Result<(), E>;

    /// Read an amount of bytes from a location. Callers check the range against `disk_size` first.
    fn read_bytes(&self, location: u64, amount: u64) -> Result<Vec<u8>, E>;

    /// This method should zero a range between two locations. Start should be inclusive whilst end should be exclusive.
    fn zero_range(&mut self, start: u64, end: u64) -> Result<(), E>;

    /// This should return the raw disk size.
    fn disk_size(&self) -> Result<u64, E>;
}

/// Writes raw bytes at `offset`, refusing to pass `max_offset`.
pub fn write_raw<E: VDiskErrorConvertible>(
    handler: &mut dyn DiskHandler<E>,
    bytes: &[u8],
    offset: i64,
    max_offset: i64,
) -> Result<(), VDiskError<E>> {
    let size = bytes.len() as i64;

    if offset < 0 || offset + size > max_offset {
        return Err(VDiskError::CapacityExceeded {
            offset,
            size,
            max_offset,
        });
    }

    handler_try!(handler.write_bytes(bytes, offset as u64));

    return Ok(());
}

/// Reads `size` raw bytes at `offset`.
pub fn read_raw<E: VDiskErrorConvertible>(
    handler: &dyn DiskHandler<E>,
    offset: i64,
    size: u64,
) -> Result<Vec<u8>, VDiskError<E>> {
    let disk_size = handler_try!(handler.disk_size());

    if offset < 0 || offset as u64 >= disk_size || disk_size - (offset as u64) < size {
        return Err(VDiskError::OutOfRange {
            offset,
            size,
            disk_size,
        });
    }

    let bytes = handler_try!(handler.read_bytes(offset as u64, size));

    if bytes.len() as u64 != size {
        return Err(VDiskError::OutOfRange {
            offset,
            size,
            disk_size,
        });
    }

    return Ok(bytes);
}

pub fn write_record<T: ByteSerializable, E: VDiskErrorConvertible>(
    handler: &mut dyn DiskHandler<E>,
    record: &T,
    offset: i64,
    max_offset: i64,
) -> Result<(), VDiskError<E>> {
    let bytes = record.to_bytes();

    return write_raw(handler, T::generic_bytes_rep(&bytes), offset, max_offset);
}

pub fn read_record<T: ByteSerializable, E: VDiskErrorConvertible>(
    handler: &dyn DiskHandler<E>,
    offset: i64,
) -> Result<T, VDiskError<E>> {
    let bytes = read_raw(handler, offset, T::size())?;

    return match T::from_bytes(&bytes) {
        Some(record) => Ok(record),
        None => Err(VDiskError::CorruptedRecord { offset }),
    };
}
