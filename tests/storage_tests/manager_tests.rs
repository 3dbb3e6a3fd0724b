//! Tests for SnapshotManager
//!
//! These tests verify:
//! - Path layout inside the data directory
//! - Persist/load round trips
//! - Atomic replacement (no temp file left, previous snapshot kept on failure)

use std::fs;

use ordkv::memtable::OrderedMap;
use ordkv::storage::SnapshotManager;
use ordkv::OrdError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_manager() -> (TempDir, SnapshotManager) {
    let temp_dir = TempDir::new().unwrap();
    let manager = SnapshotManager::new(&temp_dir.path().join("db"), true);
    manager.create_dir().unwrap();
    (temp_dir, manager)
}

fn numbered_map(count: usize) -> OrderedMap {
    (0..count)
        .map(|i| {
            (
                format!("key{:04}", i).into_bytes(),
                format!("value{}", i).into_bytes(),
            )
        })
        .collect()
}

// =============================================================================
// Layout Tests
// =============================================================================

#[test]
fn test_paths_derived_from_data_dir() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("db");

    let manager = SnapshotManager::new(&dir, false);

    assert_eq!(manager.data_dir(), dir.as_path());
    assert_eq!(manager.data_path(), dir.join("data.okv").as_path());
    assert_eq!(manager.temp_path(), dir.join("data.okv.tmp").as_path());
    assert!(!manager.exists());
}

#[test]
fn test_create_dir_is_idempotent() {
    let (_temp, manager) = setup_manager();

    manager.create_dir().unwrap();

    assert!(manager.data_dir().is_dir());
    assert!(!manager.exists());
}

// =============================================================================
// Persist / Load Tests
// =============================================================================

#[test]
fn test_persist_then_load() {
    let (_temp, manager) = setup_manager();
    let map = numbered_map(100);

    let meta = manager.persist(&map).unwrap();

    assert!(manager.exists());
    assert_eq!(meta.entry_count(), 100);
    assert_eq!(meta.path, manager.data_path());
    assert_eq!(manager.load().unwrap(), map);
}

#[test]
fn test_persist_replaces_previous_snapshot() {
    let (_temp, manager) = setup_manager();
    manager.persist(&numbered_map(100)).unwrap();

    let smaller = numbered_map(3);
    manager.persist(&smaller).unwrap();

    assert_eq!(manager.load().unwrap(), smaller);
    assert!(!manager.temp_path().exists());
}

#[test]
fn test_persist_empty_map() {
    let (_temp, manager) = setup_manager();

    manager.persist(&OrderedMap::new()).unwrap();

    assert!(manager.exists());
    assert!(manager.load().unwrap().is_empty());
}

#[test]
fn test_load_missing_snapshot_is_io_error() {
    let (_temp, manager) = setup_manager();

    assert!(matches!(manager.load(), Err(OrdError::Io(_))));
}

#[test]
fn test_load_garbage_is_corrupt() {
    let (_temp, manager) = setup_manager();
    fs::write(manager.data_path(), b"garbage garbage garbage").unwrap();

    assert!(matches!(manager.load(), Err(OrdError::Corrupt(_))));
}

#[test]
fn test_failed_persist_keeps_previous_snapshot() {
    let (_temp, manager) = setup_manager();
    let original = numbered_map(5);
    manager.persist(&original).unwrap();

    fs::create_dir(manager.temp_path()).unwrap();

    let result = manager.persist(&numbered_map(50));
    assert!(matches!(result, Err(OrdError::Io(_))));
    assert_eq!(manager.load().unwrap(), original);
}

#[test]
fn test_persist_into_missing_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    let manager = SnapshotManager::new(&temp_dir.path().join("never_created"), true);

    assert!(matches!(manager.persist(&numbered_map(1)), Err(OrdError::Io(_))));
    assert!(!manager.exists());
}
