//! Exit status of the `catalog` binary when it cannot get a usable database.

use std::process::Command;

fn catalog() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_catalog"));
    cmd.env("RUST_LOG", "off");
    cmd
}

#[test]
fn unreachable_server_exits_non_zero() {
    let output = catalog()
        .env("CATALOG__DATABASE__HOST", "127.0.0.1")
        .env("CATALOG__DATABASE__PORT", "1")
        .args(["count", "author"])
        .output()
        .expect("run catalog");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to connect to the catalog database"), "{stderr}");
}

#[test]
#[ignore = "requires a running PostgreSQL server"]
fn failed_bootstrap_exits_non_zero() {
    // The server accepts the connection but refuses every CREATE TABLE.
    let output = catalog()
        .env("PGOPTIONS", "-c default_transaction_read_only=on")
        .args(["count", "author"])
        .output()
        .expect("run catalog");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to create the catalog tables"), "{stderr}");
}
