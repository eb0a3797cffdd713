mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use common::{booking_json, bookings_file};
use predicates::prelude::*;
use std::process::Command;

#[cfg(not(feature = "storage-rocksdb"))]
#[test]
fn test_rocksdb_fallback_warning() {
    let file = bookings_file(&[booking_json("b-1", "pending", Some(1000), None)]);

    let mut cmd = Command::new(cargo_bin!("trippay"));
    cmd.arg("--bookings")
        .arg(file.path())
        .arg("--db-path")
        .arg("some_db")
        .arg("schedule");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage.",
        ));
}

#[cfg(feature = "storage-rocksdb")]
#[test]
fn test_rocksdb_no_fallback_warning() {
    let file = bookings_file(&[booking_json("b-1", "pending", Some(1000), None)]);
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    let mut cmd = Command::new(cargo_bin!("trippay"));
    cmd.arg("--bookings")
        .arg(file.path())
        .arg("--db-path")
        .arg(&db_path)
        .arg("schedule");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Falling back").not());
}
