#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

/// The binary, with HOME pointed at a scratch directory so no user
/// configuration leaks into the tests.
pub fn sl() -> Command {
    let mut cmd = cargo_bin_cmd!("shiftledger");
    cmd.env("HOME", env::temp_dir().join("shiftledger_test_home"));
    cmd.env_remove("SHIFTLEDGER_LOG");
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_shiftledger.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn init_db(db_path: &str) {
    sl().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Toggle `name`'s service at the given instant.
pub fn toggle_at(db_path: &str, name: &str, at: &str) {
    sl().args(["--db", db_path, "--at", at, "service", name])
        .assert()
        .success();
}

/// Two members with a few closed shifts in January 2024.
pub fn init_db_with_data(db_path: &str) {
    init_db(db_path);
    for at in [
        "2024-01-01T08:00",
        "2024-01-01T12:00",
        "2024-01-02T09:00",
        "2024-01-02T17:00",
    ] {
        toggle_at(db_path, "Alice", at);
    }
    for at in ["2024-01-02T22:00", "2024-01-02T23:30"] {
        toggle_at(db_path, "Bob", at);
    }
}
