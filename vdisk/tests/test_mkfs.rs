extern crate vdisk;
use vdisk::disk::read_record;
use vdisk::disk_blocks::{FolderBlock, Inode, InodeType, SuperBlock};
use vdisk::registry::DEFAULT_USERS;
use vdisk::{ErrorKind, Filesystem, VDiskError, ROOT_INODE};

mod common;
use common::*;

#[test]
fn test_format_layout() {
    let (mut handler, partition) = disk_with_partition(64 * 1024, 32 * 1024);
    let manager = Manager::new();
    let n = partition.calculate_n();
    assert_eq!(n, (32 * 1024 - 68) / 284);

    let (inode_bitmap, block_bitmap) = {
        let fs = Filesystem::format(&mut handler, &manager, &partition).unwrap();
        let sb = fs.super_block();

        assert_eq!(sb.bm_inode_start, partition.start + 68);
        assert_eq!(sb.bm_block_start, sb.bm_inode_start + n);
        assert_eq!(sb.inode_start, sb.bm_block_start + 3 * n);
        assert_eq!(sb.block_start, sb.inode_start + 88 * n);
        assert!(sb.end() <= partition.start as i64 + partition.size as i64);

        assert_eq!(sb.inodes_count, 2);
        assert_eq!(sb.blocks_count, 2);
        assert_eq!(sb.free_inodes_count, n - 2);
        assert_eq!(sb.free_blocks_count, 3 * n - 2);
        assert_eq!(sb.first_inode, sb.inode_start + 2 * 88);
        assert_eq!(sb.first_block, sb.block_start + 2 * 64);

        (fs.inode_bitmap().unwrap(), fs.block_bitmap().unwrap())
    };

    let mut expected_inodes = vec![b'0'; n as usize];
    expected_inodes[0] = b'1';
    expected_inodes[1] = b'1';
    assert_eq!(inode_bitmap, expected_inodes);

    let mut expected_blocks = vec![b'O'; 3 * n as usize];
    expected_blocks[0] = b'X';
    expected_blocks[1] = b'X';
    assert_eq!(block_bitmap, expected_blocks);

    let sb: SuperBlock = read_record(&handler, partition.start as i64).unwrap();
    assert_eq!(sb.magic, 0xEF53);
    assert_eq!(sb.filesystem_type, 2);
    assert_eq!(sb.mount_count, 1);
    assert_eq!(sb.mount_time, FIXED_TIME);
}

#[test]
fn test_root_and_users_file() {
    let (mut handler, partition) = disk_with_partition(64 * 1024, 32 * 1024);
    let manager = Manager::new();
    let fs = Filesystem::format(&mut handler, &manager, &partition).unwrap();

    let root = fs.read_inode(ROOT_INODE).unwrap();
    assert_eq!(root.kind, InodeType::Directory);
    assert_eq!(root.permissions(), "777");
    assert_eq!(root.blocks[0], 0);
    assert_eq!(root.blocks[1], -1);

    let users = fs.read_inode(1).unwrap();
    assert_eq!(users.kind, InodeType::File);
    assert_eq!(users.size as usize, DEFAULT_USERS.len());
    assert_eq!(users.blocks[0], 1);

    assert_eq!(fs.read_file("/users.txt").unwrap(), DEFAULT_USERS.as_bytes());

    let listing = fs.list_directory("/").unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].name, "users.txt");
    assert_eq!(listing[0].inode, 1);
}

#[test]
fn test_root_folder_block_bytes() {
    let (mut handler, partition) = disk_with_partition(64 * 1024, 32 * 1024);
    let manager = Manager::new();

    let block_start = {
        let fs = Filesystem::format(&mut handler, &manager, &partition).unwrap();
        fs.super_block().block_start as i64
    };

    let root_block: FolderBlock = read_record(&handler, block_start).unwrap();
    assert_eq!(root_block.entries[0].name(), ".");
    assert_eq!(root_block.entries[0].inode, 0);
    assert_eq!(root_block.entries[1].name(), "..");
    assert_eq!(root_block.entries[1].inode, 0);
    assert_eq!(root_block.entries[2].name(), "users.txt");
    assert_eq!(root_block.entries[2].inode, 1);
    assert!(root_block.entries[3].is_free());
}

#[test]
fn test_open_existing() {
    let (mut handler, partition) = disk_with_partition(64 * 1024, 32 * 1024);
    let manager = Manager::new();

    {
        let mut fs = Filesystem::format(&mut handler, &manager, &partition).unwrap();
        fs.create_path("/home", false, false).unwrap();
    }

    let fs = Filesystem::open(&mut handler, &manager, &partition).unwrap();
    assert_eq!(fs.super_block().inodes_count, 3);
    assert_eq!(fs.list_directory("/").unwrap().len(), 2);
}

#[test]
fn test_open_unformatted() {
    let (mut handler, partition) = disk_with_partition(64 * 1024, 32 * 1024);
    let manager = Manager::new();

    let result = Filesystem::open(&mut handler, &manager, &partition);

    match result {
        Err(e) => {
            assert_eq!(e, VDiskError::NoFilesystem(String::from("Part1")));
            assert_eq!(e.kind(), ErrorKind::NotFound);
        }
        Ok(_) => panic!("an unformatted partition opened"),
    }
}

#[test]
fn test_partition_too_small() {
    let (mut handler, partition) = disk_with_partition(1024, 300);
    let manager = Manager::new();

    let result = Filesystem::format(&mut handler, &manager, &partition);
    assert!(matches!(result, Err(VDiskError::InsufficientSpace(300))));
}

#[test]
fn test_inode_defaults_on_new_file() {
    let (mut handler, partition) = disk_with_partition(64 * 1024, 32 * 1024);
    let manager = Manager::new();
    let mut fs = Filesystem::format(&mut handler, &manager, &partition).unwrap();

    let index = fs.create_path("/a.txt", true, false).unwrap();
    let inode: Inode = fs.read_inode(index).unwrap();

    assert_eq!(inode.uid, 1);
    assert_eq!(inode.gid, 1);
    assert_eq!(inode.size, 0);
    assert_eq!(inode.permissions(), "664");
    assert_eq!(inode.creation_time, FIXED_TIME);
    assert_eq!(inode.blocks, [-1; 15]);
}
