#![allow(dead_code)]

extern crate vdisk;
use chrono::{DateTime, TimeZone, Utc};
use std::path::PathBuf;
use vdisk::disk_blocks::{Partition, PartitionType};
use vdisk::{DiskHandler, Fit, OSManager, PartitionRequest, PartitionTable, VDiskErrorConvertible};

#[derive(Debug, PartialEq)]
pub struct Error {}

impl VDiskErrorConvertible for Error {}

pub struct Handler {
    pub disk: Vec<u8>,
}

impl Handler {
    pub fn new(disk_size: usize) -> Self {
        return Self {
            disk: vec![0u8; disk_size],
        };
    }

    pub fn dump_disk(&self) -> Vec<u8> {
        return self.disk.clone();
    }
}

impl DiskHandler<Error> for Handler {
    fn write_bytes(&mut self, bytes: &[u8], location: u64) -> Result<(), Error> {
        let location = location as usize;

        if location + bytes.len() > self.disk.len() {
            return Err(Error {});
        }

        self.disk[location..location + bytes.len()].copy_from_slice(bytes);

        return Ok(());
    }

    fn read_bytes(&self, location: u64, amount: u64) -> Result<Vec<u8>, Error> {
        let location = location as usize;
        let amount = amount as usize;
        return Ok(self.disk[location..location + amount].to_vec());
    }

    fn zero_range(&mut self, start: u64, end: u64) -> Result<(), Error> {
        for i in start..end {
            self.disk[i as usize] = 0;
        }

        return Ok(());
    }

    fn disk_size(&self) -> Result<u64, Error> {
        return Ok(self.disk.len() as u64);
    }
}

/// A clock stopped at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct Manager {}

impl Manager {
    pub fn new() -> Self {
        return Self {};
    }
}

impl OSManager for Manager {
    fn current_time(&self) -> DateTime<Utc> {
        return Utc.timestamp_opt(1_600_000_000, 0).unwrap();
    }
}

pub const FIXED_TIME: f32 = 1_600_000_000.0;

/// A disk of `disk_size` bytes with one primary partition of `partition_size` bytes named "Part1".
pub fn disk_with_partition(disk_size: usize, partition_size: i64) -> (Handler, Partition) {
    let mut handler = Handler::new(disk_size);
    let manager = Manager::new();

    let partition = {
        let mut table = PartitionTable::create(&mut handler, &manager, Fit::First).unwrap();
        table
            .create_partition(&PartitionRequest::new(
                "Part1",
                partition_size,
                PartitionType::Primary,
            ))
            .unwrap();
        table.mbr().partitions[0]
    };

    return (handler, partition);
}

/// A fresh path in the system temp directory. Any file left from an earlier run is removed.
pub fn temp_image(name: &str) -> PathBuf {
    let path = std::env::temp_dir()
        .join(format!("vdisk-tests-{}", std::process::id()))
        .join(format!("{}.dsk", name));

    let _ = std::fs::remove_file(&path);

    return path;
}
