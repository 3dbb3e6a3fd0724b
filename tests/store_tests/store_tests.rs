//! Tests for Store
//!
//! These tests verify:
//! - Open/create semantics (NotFound, AlreadyExists)
//! - Basic get/put/delete operations
//! - Round-trip persistence across reopen
//! - Corruption policy on open
//! - Rollback when a persist fails
//! - Closed-store errors
//! - Concurrent writers

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use ordkv::{CorruptionPolicy, OrdError, Options, Store};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_store() -> (TempDir, Store) {
    let temp_dir = TempDir::new().unwrap();
    let store = ordkv::open(temp_dir.path().join("db"), true).unwrap();
    (temp_dir, store)
}

fn snapshot_path(dir: &Path) -> PathBuf {
    dir.join("data.okv")
}

/// Write a store with a couple of keys, then return its directory
fn populated_store_dir(temp_dir: &TempDir) -> PathBuf {
    let data_dir = temp_dir.path().join("db");
    let store = ordkv::open(&data_dir, true).unwrap();
    store.put(b"a", b"1").unwrap();
    store.put(b"b", b"2").unwrap();
    store.close();
    data_dir
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_missing_without_create_fails() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("missing");

    let result = ordkv::open(&data_dir, false);

    assert!(matches!(result, Err(OrdError::NotFound(path)) if path == data_dir));
    assert!(!data_dir.exists());
}

#[test]
fn test_open_with_create_makes_directory_and_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("nested").join("db");

    let store = ordkv::open(&data_dir, true).unwrap();

    assert!(data_dir.is_dir());
    assert!(snapshot_path(&data_dir).is_file());
    assert_eq!(store.len().unwrap(), 0);
    assert_eq!(store.snapshot_path(), snapshot_path(&data_dir).as_path());
}

#[test]
fn test_created_store_can_be_reopened_without_create() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("db");

    ordkv::open(&data_dir, true).unwrap().close();

    let store = ordkv::open(&data_dir, false).unwrap();
    assert!(store.is_empty().unwrap());
}

#[test]
fn test_error_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = populated_store_dir(&temp_dir);

    let options = Options::builder()
        .data_dir(&data_dir)
        .create_if_missing(true)
        .error_if_exists(true)
        .build();

    assert!(matches!(Store::open(options), Err(OrdError::AlreadyExists(_))));
}

#[test]
fn test_default_options() {
    let options = Options::default();

    assert!(!options.create_if_missing);
    assert!(!options.error_if_exists);
    assert!(options.sync_writes);
    assert_eq!(options.corruption_policy, CorruptionPolicy::Recover);
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_put_get() {
    let (_temp, store) = setup_temp_store();

    store.put(b"hello", b"world").unwrap();

    assert_eq!(store.get(b"hello").unwrap(), Some(b"world".to_vec()));
}

#[test]
fn test_get_nonexistent_key() {
    let (_temp, store) = setup_temp_store();

    assert_eq!(store.get(b"nonexistent").unwrap(), None);
    assert!(!store.contains_key(b"nonexistent").unwrap());
}

#[test]
fn test_put_overwrite_does_not_duplicate() {
    let (_temp, store) = setup_temp_store();

    store.put(b"key", b"value1").unwrap();
    store.put(b"key", b"value2").unwrap();

    assert_eq!(store.get(b"key").unwrap(), Some(b"value2".to_vec()));
    assert_eq!(store.len().unwrap(), 1);
}

#[test]
fn test_delete() {
    let (_temp, store) = setup_temp_store();

    store.put(b"key", b"value").unwrap();
    assert!(store.contains_key(b"key").unwrap());

    store.delete(b"key").unwrap();

    assert_eq!(store.get(b"key").unwrap(), None);
    assert!(store.is_empty().unwrap());
}

#[test]
fn test_delete_absent_key_is_noop() {
    let (_temp, store) = setup_temp_store();
    store.put(b"a", b"1").unwrap();

    store.delete(b"nonexistent").unwrap();

    assert_eq!(store.len().unwrap(), 1);
    assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));
}

#[test]
fn test_delete_absent_key_does_not_persist() {
    let (_temp, store) = setup_temp_store();
    store.put(b"a", b"1").unwrap();

    // Any persist attempt would now fail
    let blocker = store.path().join("data.okv.tmp");
    fs::create_dir(&blocker).unwrap();

    store.delete(b"nonexistent").unwrap();

    assert!(matches!(store.delete(b"a"), Err(OrdError::Io(_))));
}

#[test]
fn test_empty_key_and_empty_value() {
    let (_temp, store) = setup_temp_store();

    store.put(b"", b"empty key").unwrap();
    store.put(b"empty value", b"").unwrap();

    assert_eq!(store.get(b"").unwrap(), Some(b"empty key".to_vec()));
    assert_eq!(store.get(b"empty value").unwrap(), Some(Vec::new()));
}

#[test]
fn test_approximate_size_tracks_contents() {
    let (_temp, store) = setup_temp_store();
    assert_eq!(store.approximate_size(), 0);

    store.put(b"key", b"value").unwrap();
    assert_eq!(store.approximate_size(), 8);

    store.put(b"key", b"v").unwrap();
    assert_eq!(store.approximate_size(), 4);

    store.delete(b"key").unwrap();
    assert_eq!(store.approximate_size(), 0);
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_round_trip_after_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("db");

    {
        let store = ordkv::open(&data_dir, true).unwrap();
        for i in 0..50 {
            let key = format!("key{:03}", i);
            let value = format!("value{}", i);
            store.put(key.as_bytes(), value.as_bytes()).unwrap();
        }
        for i in (0..50).step_by(5) {
            let key = format!("key{:03}", i);
            store.delete(key.as_bytes()).unwrap();
        }
        store.put(b"", b"").unwrap();
        store.close();
    }

    let store = ordkv::open(&data_dir, false).unwrap();
    assert_eq!(store.len().unwrap(), 41);
    assert_eq!(store.get(b"").unwrap(), Some(Vec::new()));
    for i in 0..50 {
        let key = format!("key{:03}", i);
        let expected = if i % 5 == 0 {
            None
        } else {
            Some(format!("value{}", i).into_bytes())
        };
        assert_eq!(store.get(key.as_bytes()).unwrap(), expected, "key {}", key);
    }
}

#[test]
fn test_round_trip_after_drop() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("db");

    {
        let store = ordkv::open(&data_dir, true).unwrap();
        store.put(b"key", b"value").unwrap();
        // Dropped without an explicit close
    }

    let store = ordkv::open(&data_dir, false).unwrap();
    assert_eq!(store.get(b"key").unwrap(), Some(b"value".to_vec()));
}

#[test]
fn test_round_trip_without_sync() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("db");
    let options = Options::builder()
        .data_dir(&data_dir)
        .create_if_missing(true)
        .sync_writes(false)
        .build();

    {
        let store = Store::open(options).unwrap();
        store.put(b"key", b"value").unwrap();
    }

    let store = ordkv::open(&data_dir, false).unwrap();
    assert_eq!(store.get(b"key").unwrap(), Some(b"value".to_vec()));
}

#[test]
fn test_binary_keys_and_values_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("db");
    let key = vec![0u8, 255, 1, 254, 0];
    let value: Vec<u8> = (0..=255u8).collect();

    ordkv::open(&data_dir, true).unwrap().put(&key, &value).unwrap();

    let store = ordkv::open(&data_dir, false).unwrap();
    assert_eq!(store.get(&key).unwrap(), Some(value));
}

#[test]
fn test_no_temp_file_left_after_persist() {
    let (_temp, store) = setup_temp_store();

    store.put(b"key", b"value").unwrap();

    assert!(!store.path().join("data.okv.tmp").exists());
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_garbage_snapshot_recovers_empty() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = populated_store_dir(&temp_dir);
    fs::write(snapshot_path(&data_dir), b"this is not a snapshot").unwrap();

    let store = ordkv::open(&data_dir, false).unwrap();

    assert!(store.is_empty().unwrap());
    assert_eq!(store.get(b"a").unwrap(), None);
}

#[test]
fn test_recovered_store_is_writable() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = populated_store_dir(&temp_dir);
    fs::write(snapshot_path(&data_dir), b"").unwrap();

    {
        let store = ordkv::open(&data_dir, false).unwrap();
        store.put(b"fresh", b"start").unwrap();
    }

    let store = ordkv::open(&data_dir, false).unwrap();
    assert_eq!(store.len().unwrap(), 1);
    assert_eq!(store.get(b"fresh").unwrap(), Some(b"start".to_vec()));
}

#[test]
fn test_flipped_byte_fails_with_strict_policy() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = populated_store_dir(&temp_dir);

    let path = snapshot_path(&data_dir);
    let mut bytes = fs::read(&path).unwrap();
    bytes[HEADER_SIZE + 8] ^= 0xff; // First key byte
    fs::write(&path, &bytes).unwrap();

    let options = Options::builder()
        .data_dir(&data_dir)
        .corruption_policy(CorruptionPolicy::Fail)
        .build();

    assert!(matches!(Store::open(options), Err(OrdError::Corrupt(_))));
}

#[test]
fn test_truncated_snapshot_fails_with_strict_policy() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = populated_store_dir(&temp_dir);

    let path = snapshot_path(&data_dir);
    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

    let options = Options::builder()
        .data_dir(&data_dir)
        .corruption_policy(CorruptionPolicy::Fail)
        .build();

    assert!(matches!(Store::open(options), Err(OrdError::Corrupt(_))));
}

#[test]
fn test_header_count_mismatch_is_corruption() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = populated_store_dir(&temp_dir);

    let path = snapshot_path(&data_dir);
    let mut bytes = fs::read(&path).unwrap();
    bytes[6..14].copy_from_slice(&7u64.to_le_bytes());
    fs::write(&path, &bytes).unwrap();

    let options = Options::builder()
        .data_dir(&data_dir)
        .corruption_policy(CorruptionPolicy::Fail)
        .build();
    assert!(matches!(Store::open(options), Err(OrdError::Corrupt(_))));

    // Default policy recovers
    let store = ordkv::open(&data_dir, false).unwrap();
    assert!(store.is_empty().unwrap());
}

const HEADER_SIZE: usize = 14;

// =============================================================================
// Persist Failure Tests
// =============================================================================

#[test]
fn test_failed_put_rolls_back() {
    let (_temp, store) = setup_temp_store();
    store.put(b"key", b"v1").unwrap();

    let blocker = store.path().join("data.okv.tmp");
    fs::create_dir(&blocker).unwrap();

    let result = store.put(b"key", b"v2");
    assert!(matches!(result, Err(OrdError::Io(_))));
    assert!(matches!(store.put(b"other", b"x"), Err(OrdError::Io(_))));

    // In-memory state unchanged
    assert_eq!(store.get(b"key").unwrap(), Some(b"v1".to_vec()));
    assert_eq!(store.get(b"other").unwrap(), None);
    assert_eq!(store.len().unwrap(), 1);

    // Store recovers once the disk problem is gone
    fs::remove_dir(&blocker).unwrap();
    store.put(b"key", b"v3").unwrap();
    assert_eq!(store.get(b"key").unwrap(), Some(b"v3".to_vec()));
}

#[test]
fn test_failed_put_leaves_previous_snapshot_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("db");

    {
        let store = ordkv::open(&data_dir, true).unwrap();
        store.put(b"key", b"v1").unwrap();
        fs::create_dir(data_dir.join("data.okv.tmp")).unwrap();
        assert!(store.put(b"key", b"v2").is_err());
    }

    let store = ordkv::open(&data_dir, false).unwrap();
    assert_eq!(store.get(b"key").unwrap(), Some(b"v1".to_vec()));
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_operations_after_close_fail() {
    let (_temp, store) = setup_temp_store();
    store.put(b"key", b"value").unwrap();

    store.close();

    assert!(store.is_closed());
    assert!(matches!(store.get(b"key"), Err(OrdError::Closed)));
    assert!(matches!(store.put(b"key", b"value"), Err(OrdError::Closed)));
    assert!(matches!(store.delete(b"key"), Err(OrdError::Closed)));
    assert!(matches!(store.delete(b"absent"), Err(OrdError::Closed)));
    assert!(matches!(store.contains_key(b"key"), Err(OrdError::Closed)));
    assert!(matches!(store.len(), Err(OrdError::Closed)));
    assert!(matches!(
        store.apply_batch(ordkv::WriteBatch::new()),
        Err(OrdError::Closed)
    ));
    assert!(matches!(store.cursor(), Err(OrdError::Closed)));
    assert!(matches!(store.reverse_cursor(), Err(OrdError::Closed)));
}

#[test]
fn test_close_is_idempotent() {
    let (_temp, store) = setup_temp_store();

    store.close();
    store.close();

    assert!(store.is_closed());
}

#[test]
fn test_close_keeps_data_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("db");

    let store = ordkv::open(&data_dir, true).unwrap();
    store.put(b"key", b"value").unwrap();
    store.close();

    let reopened = ordkv::open(&data_dir, false).unwrap();
    assert_eq!(reopened.get(b"key").unwrap(), Some(b"value".to_vec()));
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_writers_do_not_lose_updates() {
    let (temp, store) = setup_temp_store();
    let store = Arc::new(store);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..25 {
                    let key = format!("t{}_key{:02}", t, i);
                    store.put(key.as_bytes(), b"value").unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len().unwrap(), 100);
    drop(store);

    let reopened = ordkv::open(temp.path().join("db"), false).unwrap();
    assert_eq!(reopened.len().unwrap(), 100);
}

#[test]
fn test_concurrent_readers_during_writes() {
    let (_temp, store) = setup_temp_store();
    store.put(b"stable", b"value").unwrap();
    let store = Arc::new(store);

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for i in 0..20 {
                let key = format!("key{:02}", i);
                store.put(key.as_bytes(), b"v").unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..50 {
                    assert_eq!(store.get(b"stable").unwrap(), Some(b"value".to_vec()));
                    let keys: Vec<_> = store.cursor().unwrap().keys().collect();
                    assert!(keys.windows(2).all(|w| w[0] < w[1]));
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(store.len().unwrap(), 21);
}
