// Disk layout:
// MBR (153 bytes) at offset 0, then up to four partitions. An extended partition starts with
// a chain of EBR headers, each followed by the data of its logical partition.

pub mod disk_blocks;
pub mod disk_handler;
mod image_handler;
mod partition_table;
pub mod space;

pub use disk_handler::{read_record, write_record, DiskHandler};
pub use image_handler::{create_image, remove_image, ImageError, ImageHandler};
pub use partition_table::{PartitionRequest, PartitionTable};
pub use space::{free_spaces, Fit, Space, Span};
