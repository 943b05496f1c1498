mod common;

use std::sync::Arc;

use common::FlakyDisk;
use tinyfat::*;

fn formatted(disk: &Arc<FlakyDisk>) -> FileSystem<FlakyDisk> {
    let mut fs = FileSystem::new(Arc::clone(disk));
    fs.format().unwrap();
    fs
}

#[test]
fn test_format_write_failure() {
    let disk = Arc::new(FlakyDisk::new(64));
    let mut fs = FileSystem::new(Arc::clone(&disk));
    disk.fail_writes_after(0);
    assert_eq!(fs.format(), Err(Error::IoError));
    assert!(!fs.is_mounted());

    disk.heal();
    fs.format().unwrap();
}

#[test]
fn test_mount_read_failure() {
    let disk = Arc::new(FlakyDisk::new(64));
    Volume::format(Arc::clone(&disk)).unwrap();

    let mut fs = FileSystem::new(Arc::clone(&disk));
    disk.fail_reads(true);
    assert_eq!(fs.mount(), Err(Error::IoError));
    assert!(!fs.is_mounted());

    disk.heal();
    fs.mount().unwrap();
}

#[test]
fn test_create_failure_rolls_back() {
    let disk = Arc::new(FlakyDisk::new(64));
    let mut fs = formatted(&disk);

    disk.fail_writes_after(0);
    assert_eq!(fs.create("a"), Err(Error::IoError));
    disk.heal();
    assert_eq!(fs.get_size("a"), Err(Error::FileNotFound));

    disk.fail_flush(true);
    assert_eq!(fs.create("b"), Err(Error::IoError));
    disk.heal();
    assert_eq!(fs.get_size("b"), Err(Error::FileNotFound));

    fs.create("a").unwrap();
    assert_eq!(fs.list().unwrap().len(), 1);
}

#[test]
fn test_delete_failure_written_back_later() {
    let disk = Arc::new(FlakyDisk::new(64));
    let mut fs = formatted(&disk);
    fs.create("a").unwrap();
    fs.write("a", &[1u8; 3000], 0).unwrap();

    disk.fail_writes_after(0);
    assert_eq!(fs.delete("a"), Err(Error::IoError));
    assert_eq!(fs.get_size("a"), Err(Error::FileNotFound));
    assert_eq!(fs.free_blocks().unwrap(), 61);

    disk.heal();
    fs.create("x").unwrap();
    drop(fs);

    let mut fs = FileSystem::new(disk);
    fs.mount().unwrap();
    assert_eq!(fs.get_size("a"), Err(Error::FileNotFound));
    assert_eq!(fs.free_blocks().unwrap(), 61);
}

#[test]
fn test_read_and_sync_failures() {
    let disk = Arc::new(FlakyDisk::new(64));
    let mut fs = formatted(&disk);
    fs.create("a").unwrap();
    fs.write("a", b"payload", 0).unwrap();

    let mut buf = [0u8; 7];
    disk.fail_reads(true);
    assert_eq!(fs.read("a", &mut buf, 0), Err(Error::IoError));
    disk.fail_flush(true);
    assert_eq!(fs.sync(), Err(Error::IoError));

    disk.heal();
    assert_eq!(fs.read("a", &mut buf, 0).unwrap(), 7);
    assert_eq!(&buf, b"payload");
    fs.sync().unwrap();
}
