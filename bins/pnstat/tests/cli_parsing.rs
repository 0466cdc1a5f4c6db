//! CLI tests for the pnstat command.
//!
//! A fake proc tree stands in for `/proc`, so the socket table and the
//! process links are fully controlled.

use std::os::unix::fs::symlink;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use assert_cmd::Command;
use predicates::prelude::*;

const TABLE: &str = "\
pt  loc  rem rs st tx_queue rx_queue  uid inode ref pointer drops
 2 0044:0000:00 0A 00000000:00000000     0 17752 2 0000000000000000 0
 1 0060:0034:E0 01 00000010:00000c80  1000 21036 2 0000000000000000 0
";

static COUNTER: AtomicU32 = AtomicU32::new(0);

fn pnstat_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pnstat"))
}

/// Build a proc tree where pid 812 (`csd`) holds socket 21036.
fn fake_proc() -> PathBuf {
    let root = std::env::temp_dir().join(format!(
        "pnstat-cli-{}-{}",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::SeqCst)
    ));
    let _ = std::fs::remove_dir_all(&root);

    std::fs::create_dir_all(root.join("net")).unwrap();
    std::fs::write(root.join("net/phonet"), TABLE).unwrap();

    let pid = root.join("812");
    std::fs::create_dir_all(pid.join("fd")).unwrap();
    symlink("socket:[21036]", pid.join("fd/3")).unwrap();
    symlink("/dev/null", pid.join("fd/0")).unwrap();
    symlink("/usr/sbin/csd", pid.join("exe")).unwrap();

    root
}

#[test]
fn test_help() {
    pnstat_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Active Phonet sockets"));
}

#[test]
fn test_unexpected_argument() {
    pnstat_cmd().arg("all").assert().code(2);
}

#[test]
fn test_table() {
    let root = fake_proc();

    pnstat_cmd()
        .arg("--proc-root")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Active Phonet connections\n\
             Proto Recv-Q Send-Q Local  Remote Res State       PID/Program\n",
        ))
        .stdout(predicate::str::contains(
            "   PN   3200     16   0060:  0034: E0 ESTABLISHED   812/csd\n",
        ))
        .stdout(predicate::str::contains("  PEP      0      0   0044:  0000:"));

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn test_json() {
    let root = fake_proc();

    pnstat_cmd()
        .arg("--proc-root")
        .arg(&root)
        .arg("-j")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("["))
        .stdout(predicate::str::contains("\"csd\""))
        .stdout(predicate::str::contains("Active Phonet connections").not());

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn test_missing_table() {
    let root = std::env::temp_dir().join(format!("pnstat-cli-missing-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(&root).unwrap();

    pnstat_cmd()
        .arg("--proc-root")
        .arg(&root)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));

    let _ = std::fs::remove_dir_all(root);
}
