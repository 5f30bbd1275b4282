extern crate vdisk;
use vdisk::disk_blocks::{PartitionStatus, PartitionType};
use vdisk::{ErrorKind, Fit, MountTable, PartitionRequest, Session, VDiskError};

mod common;
use common::*;

fn disk_with_layout(session: &Session, name: &str) -> std::path::PathBuf {
    let path = temp_image(name);

    session.create_disk(&path, 64 * 1024, Fit::First).unwrap();
    session
        .create_partition(&path, &PartitionRequest::new("P1", 16 * 1024, PartitionType::Primary))
        .unwrap();
    session
        .create_partition(&path, &PartitionRequest::new("P2", 16 * 1024, PartitionType::Primary))
        .unwrap();
    session
        .create_partition(&path, &PartitionRequest::new("Ext", 16 * 1024, PartitionType::Extended))
        .unwrap();
    session
        .create_partition(&path, &PartitionRequest::new("L1", 4 * 1024, PartitionType::Logical))
        .unwrap();

    return path;
}

#[test]
fn test_mount_ids() {
    let mut session = Session::new(Box::new(Manager::new()));
    let first = disk_with_layout(&session, "mount-first");
    let second = disk_with_layout(&session, "mount-second");

    assert_eq!(session.mount(&first, "P2").unwrap(), "392A");
    assert_eq!(session.mount(&second, "P1").unwrap(), "391B");
    assert_eq!(session.mount(&first, "P1").unwrap(), "391A");

    let (partition, path) = session.resolve_mount("392A").unwrap();
    assert_eq!(partition.name(), "P2");
    assert_eq!(partition.status, PartitionStatus::Mounted);
    assert_eq!(partition.correlative, 2);
    assert_eq!(partition.id(), "392A");
    assert_eq!(path, first);

    assert_eq!(session.mounted().len(), 3);

    let (mbr, logical) = session.partitions(&first).unwrap();
    assert!(mbr.partitions[0].is_mounted());
    assert!(mbr.partitions[1].is_mounted());
    assert!(!mbr.partitions[2].is_mounted());
    assert_eq!(logical.len(), 1);

    session.remove_disk(&first).unwrap();
    session.remove_disk(&second).unwrap();
}

#[test]
fn test_mount_errors() {
    let mut session = Session::new(Box::new(Manager::new()));
    let path = disk_with_layout(&session, "mount-errors");

    session.mount(&path, "P1").unwrap();

    let twice = session.mount(&path, "P1");
    assert_eq!(twice, Err(VDiskError::AlreadyMounted(String::from("391A"))));
    assert_eq!(twice.unwrap_err().kind(), ErrorKind::StateConflict);

    assert_eq!(
        session.mount(&path, "Ext"),
        Err(VDiskError::NotPrimary(String::from("Ext")))
    );
    assert_eq!(
        session.mount(&path, "L1"),
        Err(VDiskError::NotPrimary(String::from("L1")))
    );
    assert_eq!(
        session.mount(&path, "Nope"),
        Err(VDiskError::PartitionNotFound(String::from("Nope")))
    );

    let unknown = session.resolve_mount("999Z");
    assert_eq!(unknown, Err(VDiskError::NotMounted(String::from("999Z"))));
    assert_eq!(unknown.unwrap_err().kind(), ErrorKind::NotFound);

    assert_eq!(
        session.read_file("391A", "/users.txt"),
        Err(VDiskError::NoFilesystem(String::from("P1")))
    );

    session.remove_disk(&path).unwrap();
}

#[test]
fn test_custom_prefix() {
    let mounts = MountTable::with_prefix("12").unwrap();
    let mut session = Session::with_mounts(Box::new(Manager::new()), mounts);
    let path = disk_with_layout(&session, "mount-prefix");

    assert_eq!(session.mount(&path, "P1").unwrap(), "121A");
    assert!(MountTable::with_prefix("123").is_err());

    session.remove_disk(&path).unwrap();
}

#[test]
fn test_disk_size_validation() {
    let session = Session::new(Box::new(Manager::new()));
    let path = temp_image("too-small");

    let result = session.create_disk(&path, 100, Fit::First);
    assert_eq!(result, Err(VDiskError::InvalidSize(100)));
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Validation);
    assert!(!path.exists());
}

#[test]
fn test_registry_lifecycle() {
    let mut session = Session::new(Box::new(Manager::new()));
    let path = disk_with_layout(&session, "registry");
    let id = session.mount(&path, "P1").unwrap();
    session.create_filesystem(&id).unwrap();

    session.login("root", "root", &id).unwrap();
    session.add_group("devs").unwrap();
    session.add_group("ops").unwrap();
    session.add_user("alice", "pw1", "devs").unwrap();
    session.add_user("bob", "pw2", "devs").unwrap();
    session.change_user_group("bob", "ops").unwrap();
    session.remove_user("alice").unwrap();

    assert_eq!(
        session.add_group("ops"),
        Err(VDiskError::AlreadyActive(String::from("ops")))
    );
    assert_eq!(
        session.remove_user("alice"),
        Err(VDiskError::UserNotFound(String::from("alice")))
    );

    let text = String::from_utf8(session.read_file(&id, "/users.txt").unwrap()).unwrap();
    assert_eq!(
        text,
        "1,G,root\n1,U,root,root,root\n2,G,devs\n3,G,ops\n3,U,ops,bob,pw2\n0,U,devs,alice,pw1\n"
    );

    session.remove_group("ops").unwrap();
    session.add_group("ops").unwrap();

    let registry = session.registry().unwrap();
    assert_eq!(registry.active_group("ops").unwrap().id, 4);
    assert!(registry.active_user("bob").is_none());

    session.logout().unwrap();
    assert_eq!(
        session.login("bob", "pw2", &id),
        Err(VDiskError::InvalidCredentials)
    );

    session.remove_disk(&path).unwrap();
}
