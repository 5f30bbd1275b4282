extern crate vdisk;
use vdisk::disk_blocks::InodeType;
use vdisk::{ErrorKind, Filesystem, VDiskError};

mod common;
use common::*;

fn pattern(len: usize) -> Vec<u8> {
    return (0..len).map(|i| b'a' + (i % 26) as u8).collect();
}

#[test]
fn test_small_file() {
    let (mut handler, partition) = disk_with_partition(64 * 1024, 32 * 1024);
    let manager = Manager::new();
    let mut fs = Filesystem::format(&mut handler, &manager, &partition).unwrap();

    fs.create_path("/docs", false, false).unwrap();
    fs.write_file("/docs/a.txt", b"hello").unwrap();

    assert_eq!(fs.read_file("/docs/a.txt").unwrap(), b"hello".to_vec());
    assert_eq!(fs.read_file("docs/a.txt").unwrap(), b"hello".to_vec());

    let listing = fs.list_directory("/docs").unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].name, "a.txt");
    assert_eq!(listing[0].kind, InodeType::File);
    assert_eq!(listing[0].size, 5);
}

#[test]
fn test_blocks_consumed_direct_first() {
    let (mut handler, partition) = disk_with_partition(64 * 1024, 32 * 1024);
    let manager = Manager::new();
    let mut fs = Filesystem::format(&mut handler, &manager, &partition).unwrap();

    let index = fs.create_path("/ten.bin", true, false).unwrap();
    let before = fs.super_block().blocks_count;
    fs.write_file("/ten.bin", &pattern(640)).unwrap();

    assert_eq!(fs.super_block().blocks_count, before + 10);

    let inode = fs.read_inode(index).unwrap();
    for slot in 0..10 {
        assert_eq!(inode.blocks[slot], before + slot as i32);
    }
    for slot in 10..15 {
        assert_eq!(inode.blocks[slot], -1);
    }
}

#[test]
fn test_direct_boundary() {
    let (mut handler, partition) = disk_with_partition(64 * 1024, 32 * 1024);
    let manager = Manager::new();
    let mut fs = Filesystem::format(&mut handler, &manager, &partition).unwrap();

    let full = fs.create_path("/full.bin", true, false).unwrap();
    let before = fs.super_block().blocks_count;
    fs.write_file("/full.bin", &pattern(12 * 64)).unwrap();

    assert_eq!(fs.super_block().blocks_count, before + 12);
    assert_eq!(fs.read_inode(full).unwrap().blocks[12], -1);

    let over = fs.create_path("/over.bin", true, false).unwrap();
    let before = fs.super_block().blocks_count;
    fs.write_file("/over.bin", &pattern(12 * 64 + 1)).unwrap();

    // 13 file blocks plus the single indirect pointer block.
    assert_eq!(fs.super_block().blocks_count, before + 14);
    assert_ne!(fs.read_inode(over).unwrap().blocks[12], -1);
    assert_eq!(fs.read_file("/over.bin").unwrap(), pattern(12 * 64 + 1));
}

#[test]
fn test_triple_indirect_file() {
    let (mut handler, partition) = disk_with_partition(1024 * 1024, 1_000_000);
    let manager = Manager::new();
    let mut fs = Filesystem::format(&mut handler, &manager, &partition).unwrap();

    // 12 direct + 16 single + 256 double leaves 16 blocks for the triple level.
    let content = pattern(300 * 64);
    let index = fs.create_path("/big.bin", true, false).unwrap();
    let before = fs.super_block().blocks_count;

    fs.write_file("/big.bin", &content).unwrap();

    // 300 file blocks, 1 single, 1 + 16 double and 3 triple pointer blocks.
    assert_eq!(fs.super_block().blocks_count, before + 321);

    let inode = fs.read_inode(index).unwrap();
    assert_ne!(inode.blocks[14], -1);
    assert_eq!(inode.size as usize, content.len());
    assert_eq!(fs.read_file("/big.bin").unwrap(), content);
}

#[test]
fn test_rewrite_reuses_blocks() {
    let (mut handler, partition) = disk_with_partition(64 * 1024, 32 * 1024);
    let manager = Manager::new();
    let mut fs = Filesystem::format(&mut handler, &manager, &partition).unwrap();

    fs.write_file("/notes.txt", &pattern(200)).unwrap();
    let after_first = fs.super_block().blocks_count;

    fs.write_file("/notes.txt", b"short").unwrap();
    assert_eq!(fs.read_file("/notes.txt").unwrap(), b"short".to_vec());
    assert_eq!(fs.super_block().blocks_count, after_first);

    fs.write_file("/notes.txt", &pattern(300)).unwrap();
    assert_eq!(fs.read_file("/notes.txt").unwrap(), pattern(300));
    assert_eq!(fs.super_block().blocks_count, after_first + 1);
}

#[test]
fn test_empty_file() {
    let (mut handler, partition) = disk_with_partition(64 * 1024, 32 * 1024);
    let manager = Manager::new();
    let mut fs = Filesystem::format(&mut handler, &manager, &partition).unwrap();

    fs.create_path("/empty", true, false).unwrap();
    assert_eq!(fs.read_file("/empty").unwrap(), Vec::<u8>::new());
}

#[test]
fn test_directory_spans_folder_blocks() {
    let (mut handler, partition) = disk_with_partition(128 * 1024, 100 * 1024);
    let manager = Manager::new();
    let mut fs = Filesystem::format(&mut handler, &manager, &partition).unwrap();

    let dir = fs.create_path("/dir", false, false).unwrap();
    let names: Vec<String> = (0..30).map(|i| format!("f{}", i)).collect();

    for name in names.iter() {
        fs.create_path(&format!("/dir/{}", name), true, false).unwrap();
    }

    let listing = fs.list_directory("/dir").unwrap();
    let listed: Vec<String> = listing.iter().map(|e| e.name.clone()).collect();
    assert_eq!(listed, names);

    // Two children per folder block: 12 direct blocks hold 24, the rest go through the single indirect.
    let inode = fs.read_inode(dir).unwrap();
    assert_ne!(inode.blocks[12], -1);
    assert_eq!(inode.blocks[13], -1);

    fs.write_file("/dir/f29", b"last").unwrap();
    assert_eq!(fs.read_file("/dir/f29").unwrap(), b"last".to_vec());
}

#[test]
fn test_later_folder_blocks_keep_links() {
    let (mut handler, partition) = disk_with_partition(64 * 1024, 32 * 1024);
    let manager = Manager::new();
    let mut fs = Filesystem::format(&mut handler, &manager, &partition).unwrap();

    let parent = fs.create_path("/p", false, false).unwrap();
    let child = fs.create_path("/p/c", false, false).unwrap();

    for name in ["x1", "x2", "x3"].iter() {
        fs.create_path(&format!("/p/c/{}", name), true, false).unwrap();
    }

    let inode = fs.read_inode(child).unwrap();
    assert_ne!(inode.blocks[1], -1);
    assert_eq!(fs.list_directory("/p/c").unwrap().len(), 3);
    assert_eq!(fs.list_directory("/p").unwrap()[0].inode, child);
    assert_ne!(parent, child);
}

#[test]
fn test_create_parents() {
    let (mut handler, partition) = disk_with_partition(64 * 1024, 32 * 1024);
    let manager = Manager::new();
    let mut fs = Filesystem::format(&mut handler, &manager, &partition).unwrap();

    let result = fs.create_path("/a/b/c", false, false);
    assert_eq!(result, Err(VDiskError::PathNotFound(String::from("a"))));
    assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);

    let c = fs.create_path("/a/b/c", false, true).unwrap();
    assert_eq!(fs.lookup(0, &["a", "b", "c"]).unwrap(), c);
    assert_eq!(fs.list_directory("/a/b").unwrap()[0].kind, InodeType::Directory);
}

#[test]
fn test_existing_paths() {
    let (mut handler, partition) = disk_with_partition(64 * 1024, 32 * 1024);
    let manager = Manager::new();
    let mut fs = Filesystem::format(&mut handler, &manager, &partition).unwrap();

    let dir = fs.create_path("/d", false, false).unwrap();
    let file = fs.create_path("/f.txt", true, false).unwrap();

    assert_eq!(fs.create_path("/d", false, false).unwrap(), dir);
    assert_eq!(fs.create_path("/f.txt", true, false).unwrap(), file);
    assert_eq!(fs.create_path("/d", true, false).unwrap(), dir);

    let result = fs.create_path("/f.txt", false, false);
    assert_eq!(result, Err(VDiskError::AlreadyExists(String::from("/f.txt"))));
    assert_eq!(result.unwrap_err().kind(), ErrorKind::StateConflict);

    let result = fs.write_file("/d", b"x");
    assert_eq!(result, Err(VDiskError::NotAFile(String::from("/d"))));
}

#[test]
fn test_path_errors() {
    let (mut handler, partition) = disk_with_partition(64 * 1024, 32 * 1024);
    let manager = Manager::new();
    let mut fs = Filesystem::format(&mut handler, &manager, &partition).unwrap();

    fs.write_file("/f.txt", b"data").unwrap();

    assert_eq!(
        fs.read_file("/missing"),
        Err(VDiskError::PathNotFound(String::from("missing")))
    );
    assert_eq!(fs.read_file("/"), Err(VDiskError::NotAFile(String::from("/"))));
    assert_eq!(
        fs.list_directory("/f.txt"),
        Err(VDiskError::NotADirectory(String::from("/f.txt")))
    );
    assert_eq!(
        fs.create_path("/f.txt/inner", true, false),
        Err(VDiskError::NotADirectory(String::from("/f.txt/inner")))
    );
    assert_eq!(
        fs.write_file("/nodir/a.txt", b"x"),
        Err(VDiskError::PathNotFound(String::from("nodir")))
    );
    assert_eq!(
        fs.create_path("", false, false),
        Err(VDiskError::InvalidPath(String::from("")))
    );
    assert_eq!(
        fs.create_path("/thirteen_char", true, false),
        Err(VDiskError::InvalidName(String::from("thirteen_char")))
    );
}

#[test]
fn test_inodes_run_out() {
    // Room for exactly three inodes and nine blocks.
    let (mut handler, partition) = disk_with_partition(2048, 68 + 3 * 284);
    let manager = Manager::new();
    let mut fs = Filesystem::format(&mut handler, &manager, &partition).unwrap();

    fs.create_path("/one", true, false).unwrap();

    let result = fs.create_path("/two", true, false);
    assert_eq!(result, Err(VDiskError::NoFreeInodes));
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Capacity);

    let result = fs.write_file("/one", &pattern(8 * 64));
    assert_eq!(result, Err(VDiskError::NoFreeBlocks));
    assert_eq!(fs.super_block().free_blocks_count, 0);
}

#[test]
fn test_file_fills_every_pointer_level() {
    // 1700 inodes give 5100 blocks, more than one inode can address.
    let (mut handler, partition) = disk_with_partition(600 * 1024, 68 + 1700 * 284);
    let manager = Manager::new();
    let mut fs = Filesystem::format(&mut handler, &manager, &partition).unwrap();

    let leaves = 12 + 16 + 16 * 16 + 16 * 16 * 16;
    let result = fs.write_file("/big.bin", &pattern(leaves * 64 + 1));

    assert_eq!(result, Err(VDiskError::NoFreeBlocks));
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Capacity);

    // Root and users.txt, every leaf, and 1 + 17 + 273 pointer blocks.
    let pointer_blocks = 1 + (1 + 16) + (1 + 16 + 256);
    assert_eq!(fs.super_block().blocks_count, 2 + leaves as i32 + pointer_blocks);
    assert_eq!(fs.super_block().free_blocks_count, 427);
}
