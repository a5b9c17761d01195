//! Integration tests for the RAMFS store
//!
//! These tests exercise the store through its public API only:
//! - Tree invariants after mixed workloads
//! - Path resolution against the cursor
//! - Slot reuse after deletes
//! - Allocator accounting

use hal::{HeapAllocator, MemoryHal};
use ramfs::{EntryId, FsError, RamFs, RamFsConfig, SharedRamFs};

#[test]
fn test_shell_style_session() {
    let mut fs = RamFs::new();

    let docs = fs.create_directory("docs").unwrap();
    assert_eq!(docs, EntryId::new(1));

    fs.change_directory(docs).unwrap();
    assert_eq!(fs.current_dir(), docs);

    let file = fs.create_file("a.txt").unwrap();
    assert_eq!(file, EntryId::new(2));
    assert_eq!(fs.entry(file).unwrap().parent(), docs);

    fs.write(file, b"hello").unwrap();
    let resolved = fs.resolve("a.txt").unwrap();
    assert_eq!(resolved, file);
    assert_eq!(fs.read_to_vec(resolved).unwrap(), b"hello");

    let parent = fs.entry(fs.current_dir()).unwrap().parent();
    fs.change_directory(parent).unwrap();
    assert_eq!(fs.current_dir(), EntryId::ROOT);

    let target = fs.resolve("docs").unwrap();
    assert_eq!(fs.delete(target).unwrap(), 2);
    assert!(matches!(fs.find_path("docs/a.txt"), Err(FsError::NotFound(_))));
    fs.verify_integrity().unwrap();
}

#[test]
fn test_resolve_from_another_cursor() {
    let mut fs = RamFs::new();
    let notes = fs.create_file("notes").unwrap();
    let dir = fs.create_directory("elsewhere").unwrap();
    fs.change_directory(dir).unwrap();

    assert!(fs.resolve("notes").is_err());
    assert_eq!(fs.resolve("/notes").unwrap(), notes);
}

#[test]
fn test_deleted_slots_are_reused() {
    let mut fs = RamFs::new();
    let dir = fs.create_directory("tmp").unwrap();
    fs.change_directory(dir).unwrap();
    let a = fs.create_file("a").unwrap();
    let b = fs.create_file("b").unwrap();
    fs.change_directory(EntryId::ROOT).unwrap();

    fs.delete(dir).unwrap();
    assert!(!fs.table().is_used(a));
    assert!(!fs.table().is_used(b));

    let reused = fs.create_file("fresh").unwrap();
    assert_eq!(reused, dir);
    fs.verify_integrity().unwrap();
}

#[test]
fn test_fill_table_then_recover() {
    let config = RamFsConfig {
        max_entries: 10,
        max_children: 16,
        ..RamFsConfig::default()
    };
    let mut fs = RamFs::with_config(config).unwrap();

    let mut created = Vec::new();
    for i in 0..9 {
        created.push(fs.create_file(&format!("f{}", i)).unwrap());
    }
    assert!(matches!(
        fs.create_file("overflow"),
        Err(FsError::TableFull { capacity: 10 })
    ));
    fs.verify_integrity().unwrap();

    fs.delete(created[4]).unwrap();
    assert_eq!(fs.create_file("overflow").unwrap(), created[4]);
}

#[test]
fn test_deep_tree_delete() {
    let mut fs = RamFs::new();
    let top = fs.create_directory("d0").unwrap();
    fs.change_directory(top).unwrap();
    for depth in 1..40 {
        let dir = fs.create_directory(&format!("d{}", depth)).unwrap();
        let file = fs.create_file("payload").unwrap();
        fs.write(file, format!("level {}", depth).as_bytes()).unwrap();
        fs.change_directory(dir).unwrap();
    }

    assert_eq!(fs.delete(top).unwrap(), 40 + 39);
    assert_eq!(fs.entry_count(), 1);
    assert_eq!(fs.current_dir(), EntryId::ROOT);
    assert_eq!(fs.memory_stats().live_buffers, 0);
    fs.verify_integrity().unwrap();
}

#[test]
fn test_write_read_prefixes() {
    let mut fs = RamFs::new();
    let file = fs.create_file("data.bin").unwrap();
    let bytes: Vec<u8> = (0..=255).collect();
    fs.write(file, &bytes).unwrap();

    for k in [0usize, 1, 17, 255, 256, 1000] {
        let mut buf = vec![0u8; k];
        let n = fs.read(file, &mut buf).unwrap();
        assert_eq!(n, k.min(bytes.len()));
        assert_eq!(&buf[..n], &bytes[..n]);
    }
}

#[test]
fn test_custom_allocator_sees_every_release() {
    let allocator = HeapAllocator::new();
    let mut fs = RamFs::with_allocator(RamFsConfig::default(), allocator).unwrap();
    let a = fs.create_file("a").unwrap();
    let b = fs.create_file("b").unwrap();
    fs.write(a, b"1").unwrap();
    fs.write(b, b"2").unwrap();
    fs.write(a, b"3").unwrap();

    fs.delete(a).unwrap();
    fs.delete(b).unwrap();

    let stats = fs.allocator().stats();
    assert_eq!(stats.total_allocations, 3);
    assert_eq!(stats.total_releases, 3);
    assert_eq!(stats.bytes_in_use, 0);
}

#[test]
fn test_failed_operations_leave_tree_intact() {
    let config = RamFsConfig {
        max_children: 2,
        ..RamFsConfig::default()
    };
    let mut fs = RamFs::with_config(config).unwrap();
    let a = fs.create_file("a").unwrap();
    fs.create_directory("b").unwrap();

    let _ = fs.create_file("c");
    let _ = fs.rename(a, "b");
    let _ = fs.rename(a, "");
    let _ = fs.delete(EntryId::ROOT);
    let _ = fs.change_directory(a);
    let _ = fs.write(EntryId::new(200), b"x");

    fs.verify_integrity().unwrap();
    assert_eq!(fs.entry_count(), 3);
    assert_eq!(fs.entry(a).unwrap().name(), "a");
}

#[test]
fn test_shared_store_across_handles() {
    let shared = SharedRamFs::default();
    let writer = shared.clone();

    let id = writer
        .with(|fs| {
            let id = fs.create_file("log")?;
            fs.write(id, b"entry")?;
            Ok::<_, FsError>(id)
        })
        .unwrap();

    let fs = shared.lock();
    assert_eq!(fs.read_to_vec(id).unwrap(), b"entry");
}
