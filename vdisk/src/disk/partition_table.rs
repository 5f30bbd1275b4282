use super::disk_blocks::{
    Ebr, Mbr, Partition, PartitionType, EBR_SIZE, MBR_SIZE, PARTITION_NAME_LEN,
};
use super::disk_handler::{read_record, write_record};
use super::space::{free_spaces, Fit, Space, Span};
use super::DiskHandler;
use crate::utils::fits_field;
use crate::{OSManager, VDiskError, VDiskErrorConvertible};
use log::{debug, info};

/// What to create and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionRequest {
    pub name: String,
    pub size: i64,
    pub kind: PartitionType,
    /// Placement strategy. Falls back to the disk's strategy.
    pub fit: Option<Fit>,
    /// Inclusive window to place a primary or extended partition in. Defaults to everything after the MBR.
    pub window: Option<(i64, i64)>,
}

impl PartitionRequest {
    pub fn new(name: &str, size: i64, kind: PartitionType) -> Self {
        return Self {
            name: String::from(name),
            size,
            kind,
            fit: None,
            window: None,
        };
    }

    pub fn with_fit(mut self, fit: Fit) -> Self {
        self.fit = Some(fit);
        return self;
    }

    pub fn within(mut self, start: i64, end: i64) -> Self {
        self.window = Some((start, end));
        return self;
    }
}

/// The MBR of one disk plus the EBR chain of its extended partition.
pub struct PartitionTable<'a, E: VDiskErrorConvertible> {
    handler: &'a mut dyn DiskHandler<E>,
    mbr: Mbr,
}

impl<'a, E: VDiskErrorConvertible> PartitionTable<'a, E> {
    /// Writes a fresh MBR covering the whole disk.
    pub fn create(
        handler: &'a mut dyn DiskHandler<E>,
        manager: &dyn OSManager,
        fit: Fit,
    ) -> Result<Self, VDiskError<E>> {
        let disk_size = handler_try!(handler.disk_size());

        if disk_size <= MBR_SIZE || disk_size > i32::MAX as u64 {
            return Err(VDiskError::InvalidSize(disk_size as i64));
        }

        let mbr = Mbr::new(disk_size as i32, fit, manager);
        write_record(handler, &mbr, 0, MBR_SIZE as i64)?;

        info!(
            "[MBR] new partition table, {} bytes, signature {}",
            disk_size, mbr.signature
        );

        return Ok(Self { handler, mbr });
    }

    pub fn open(handler: &'a mut dyn DiskHandler<E>) -> Result<Self, VDiskError<E>> {
        let mbr = read_record::<Mbr, E>(handler, 0)?;

        return Ok(Self { handler, mbr });
    }

    pub fn mbr(&self) -> &Mbr {
        return &self.mbr;
    }

    fn write_mbr(&mut self) -> Result<(), VDiskError<E>> {
        return write_record(self.handler, &self.mbr, 0, MBR_SIZE as i64);
    }

    /// Creates a primary, extended or logical partition and returns the start of its data region.
    pub fn create_partition(&mut self, request: &PartitionRequest) -> Result<i64, VDiskError<E>> {
        if request.size <= 0 || request.size > i32::MAX as i64 {
            return Err(VDiskError::InvalidSize(request.size));
        }

        if !fits_field(&request.name, PARTITION_NAME_LEN) {
            return Err(VDiskError::InvalidName(request.name.clone()));
        }

        return match request.kind {
            PartitionType::Logical => self.create_logical(request),
            _ => self.create_in_mbr(request),
        };
    }

    fn create_in_mbr(&mut self, request: &PartitionRequest) -> Result<i64, VDiskError<E>> {
        let extended = request.kind == PartitionType::Extended;

        if extended && self.mbr.extended().is_some() {
            return Err(VDiskError::ExtendedExists);
        }

        if extended && request.size < EBR_SIZE as i64 {
            return Err(VDiskError::InvalidSize(request.size));
        }

        let slot = match self.mbr.free_slot() {
            Some(slot) => slot,
            None => return Err(VDiskError::NoFreeSlot),
        };

        if self.name_in_use(&request.name)? {
            return Err(VDiskError::DuplicateName(request.name.clone()));
        }

        let fit = request.fit.unwrap_or(self.mbr.fit);
        let (start, end) = self.window(request.window);
        let spaces = self.free_spaces(start, end)?;

        let offset = match fit.place(&spaces, request.size) {
            Some(offset) => offset,
            None => return Err(VDiskError::InsufficientSpace(request.size)),
        };

        self.mbr.partitions[slot] = Partition::new(
            request.kind,
            fit,
            offset as i32,
            request.size as i32,
            &request.name,
        );
        self.write_mbr()?;

        if extended {
            write_record(
                self.handler,
                &Ebr::sentinel(),
                offset,
                offset + request.size,
            )?;
        }

        info!(
            "[MBR] created {:?} partition '{}' in slot {} at {} ({} bytes)",
            request.kind, request.name, slot, offset, request.size
        );

        return Ok(offset);
    }

    fn create_logical(&mut self, request: &PartitionRequest) -> Result<i64, VDiskError<E>> {
        let extended = match self.mbr.extended() {
            Some(p) => *p,
            None => return Err(VDiskError::NoExtendedPartition),
        };

        if self.name_in_use(&request.name)? {
            return Err(VDiskError::DuplicateName(request.name.clone()));
        }

        let chain = self.ebr_chain()?;
        // The chain always ends with a sentinel, new headers go where it sits.
        let header = match chain.last() {
            Some((offset, _)) => *offset,
            None => extended.start as i64,
        };

        let data_start = header + EBR_SIZE as i64;
        let next = data_start + request.size;
        let extended_end = extended.start as i64 + extended.size as i64;

        if next + EBR_SIZE as i64 > extended_end {
            return Err(VDiskError::InsufficientSpace(request.size));
        }

        let fit = request.fit.unwrap_or(extended.fit);
        let ebr = Ebr::new(
            fit,
            data_start as i32,
            request.size as i32,
            next as i32,
            &request.name,
        );

        write_record(self.handler, &ebr, header, extended_end)?;
        write_record(self.handler, &Ebr::sentinel(), next, extended_end)?;

        info!(
            "[MBR] created logical partition '{}' at {} ({} bytes)",
            request.name, data_start, request.size
        );

        return Ok(data_start);
    }

    /// Every header of the chain with its offset, sentinel included.
    fn ebr_chain(&self) -> Result<Vec<(i64, Ebr)>, VDiskError<E>> {
        let extended = match self.mbr.extended() {
            Some(p) => *p,
            None => return Ok(Vec::new()),
        };

        let extended_end = extended.start as i64 + extended.size as i64;
        let mut chain = Vec::new();
        let mut offset = extended.start as i64;

        loop {
            let ebr = read_record::<Ebr, E>(self.handler, offset)?;
            debug!("[MBR] EBR at {}: next {}", offset, ebr.next);
            chain.push((offset, ebr));

            if ebr.next == -1 {
                break;
            }

            // Headers only ever move forward, anything else is a broken chain.
            if (ebr.next as i64) <= offset || ebr.next as i64 >= extended_end {
                return Err(VDiskError::CorruptedRecord { offset });
            }

            offset = ebr.next as i64;
        }

        return Ok(chain);
    }

    /// The logical partitions in chain order.
    pub fn logical_partitions(&self) -> Result<Vec<Ebr>, VDiskError<E>> {
        return Ok(self
            .ebr_chain()?
            .into_iter()
            .map(|(_, ebr)| ebr)
            .filter(|ebr| !ebr.is_sentinel())
            .collect());
    }

    /// Names are unique across the MBR slots and the EBR chain.
    pub fn name_in_use(&self, name: &str) -> Result<bool, VDiskError<E>> {
        if self.mbr.partition_by_name(name).is_some() {
            return Ok(true);
        }

        return Ok(self
            .logical_partitions()?
            .iter()
            .any(|ebr| ebr.name() == name));
    }

    fn window(&self, requested: Option<(i64, i64)>) -> (i64, i64) {
        let disk_end = self.mbr.size as i64 - 1;

        return match requested {
            Some((start, end)) => (
                core::cmp::max(start, MBR_SIZE as i64),
                core::cmp::min(end, disk_end),
            ),
            None => (MBR_SIZE as i64, disk_end),
        };
    }

    /// Free extents of `[start, end]` around every partition and logical partition.
    pub fn free_spaces(&self, start: i64, end: i64) -> Result<Vec<Space>, VDiskError<E>> {
        let logical = self.logical_partitions()?;
        let mut occupied: Vec<&dyn Span> = Vec::new();

        for partition in self.mbr.partitions.iter() {
            occupied.push(partition);
        }

        for ebr in logical.iter() {
            occupied.push(ebr);
        }

        return Ok(free_spaces(&occupied, start, end));
    }

    /// Marks slot `index` as mounted with the given id and persists the MBR.
    pub fn mount_partition(
        &mut self,
        index: usize,
        id: &str,
    ) -> Result<Partition, VDiskError<E>> {
        let partition = &mut self.mbr.partitions[index];
        partition.mount(index as i32 + 1, id);
        let mounted = *partition;

        self.write_mbr()?;

        info!("[MBR] mounted '{}' as {}", mounted.name(), id);

        return Ok(mounted);
    }
}
