//! End-to-end CLI pipeline over a temporary workspace.

use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;

fn sigil() -> assert_cmd::Command {
    cargo_bin_cmd!("sigil")
}

fn s(path: &Path) -> &str {
    path.to_str().expect("path is valid UTF-8")
}

fn stdout_of(assert: assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).expect("stdout is valid UTF-8")
}

#[test]
fn key_challenge_prints_the_signing_message() {
    let out = stdout_of(sigil().args(["key", "challenge"]).assert().success());
    assert_eq!(out.trim(), sigil_sdk::IDENTITY_CHALLENGE);
}

#[test]
fn pipeline_accepts_then_rejects_duplicate() {
    let dir = tempfile::tempdir().expect("tempdir creation failed");
    let signature = dir.path().join("sig.bin");
    let identity = dir.path().join("identity.json");
    let tree = dir.path().join("group.tree");
    let signal = dir.path().join("signal.json");
    let gate = dir.path().join("gate");
    fs::write(&signature, b"wallet signature bytes").expect("write signature");

    sigil()
        .args(["key", "derive", "--signature", s(&signature), "--output", s(&identity)])
        .assert()
        .success();

    sigil()
        .args([
            "group",
            "insert",
            "--tree",
            s(&tree),
            "--depth",
            "4",
            "--identity",
            s(&identity),
        ])
        .assert()
        .success();

    let root = stdout_of(sigil().args(["group", "root", "--tree", s(&tree)]).assert().success());
    assert_eq!(root.trim().len(), 64);

    sigil()
        .args([
            "signal",
            "prove",
            "--identity",
            s(&identity),
            "--tree",
            s(&tree),
            "--leaf",
            "0",
            "--scope",
            "epoch-1",
            "--payload",
            "hello",
            "--output",
            s(&signal),
        ])
        .assert()
        .success();

    sigil()
        .args(["gate", "track-root", "--gate-dir", s(&gate), "--tree", s(&tree)])
        .assert()
        .success();

    sigil()
        .args([
            "gate",
            "submit",
            "--gate-dir",
            s(&gate),
            "--signal",
            s(&signal),
            "--scope",
            "epoch-1",
        ])
        .assert()
        .success();

    // Second submission spends the same nullifier and must fail.
    sigil()
        .args([
            "gate",
            "submit",
            "--gate-dir",
            s(&gate),
            "--signal",
            s(&signal),
            "--scope",
            "epoch-1",
        ])
        .assert()
        .failure();

    let log = stdout_of(
        sigil()
            .args(["gate", "replay", "--gate-dir", s(&gate), "--from", "0"])
            .assert()
            .success(),
    );
    let records: Vec<serde_json::Value> = log
        .lines()
        .map(|line| serde_json::from_str(line).expect("log line is JSON"))
        .collect();
    assert_eq!(records.len(), 1);
    assert_eq!(records.first().and_then(|r| r.get("seq")), Some(&serde_json::json!(0)));
}

#[test]
fn submission_against_untracked_root_fails() {
    let dir = tempfile::tempdir().expect("tempdir creation failed");
    let signature = dir.path().join("sig.bin");
    let identity = dir.path().join("identity.json");
    let tree = dir.path().join("group.tree");
    let signal = dir.path().join("signal.json");
    let gate = dir.path().join("gate");
    fs::write(&signature, b"another signature").expect("write signature");

    sigil()
        .args(["key", "derive", "--signature", s(&signature), "--output", s(&identity)])
        .assert()
        .success();
    sigil()
        .args([
            "group",
            "insert",
            "--tree",
            s(&tree),
            "--depth",
            "4",
            "--identity",
            s(&identity),
        ])
        .assert()
        .success();
    sigil()
        .args([
            "signal",
            "prove",
            "--identity",
            s(&identity),
            "--tree",
            s(&tree),
            "--leaf",
            "0",
            "--scope",
            "epoch-1",
            "--payload",
            "hello",
            "--output",
            s(&signal),
        ])
        .assert()
        .success();

    // No track-root: the gate recognizes nothing.
    sigil()
        .args([
            "gate",
            "submit",
            "--gate-dir",
            s(&gate),
            "--signal",
            s(&signal),
            "--scope",
            "epoch-1",
        ])
        .assert()
        .failure();
}
