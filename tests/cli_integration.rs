//! CLI Integration Tests
//!
//! These tests verify that the CLI commands work correctly end-to-end.
//! They test the actual binary behavior, not just the library.
//!
//! Run with:
//! ```bash
//! cargo test --test cli_integration
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::tempdir;

/// Get the path to the built binary
fn shardstore_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_shardstore"))
}

fn base_command(root: &Path) -> Command {
    let mut cmd = Command::new(shardstore_binary());
    cmd.args(["--levels", "2", "--digest", "md5", "-f", "json", "-r"])
        .arg(root);
    cmd
}

/// Run shardstore command and return (stdout, stderr, success)
fn run_shardstore(args: &[&str], root: &Path) -> (String, String, bool) {
    let output = base_command(root)
        .args(args)
        .output()
        .expect("Failed to execute shardstore");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

/// Run `put` feeding `data` on stdin, returning the new blob id
fn put_stdin(data: &[u8], root: &Path) -> String {
    let mut child = base_command(root)
        .arg("put")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to spawn shardstore");
    child.stdin.take().unwrap().write_all(data).unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "put should succeed");

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    json["id"].as_str().unwrap().to_string()
}

fn put_file(path: &Path, root: &Path) -> String {
    let (stdout, _stderr, success) = run_shardstore(&["put", path.to_str().unwrap()], root);
    assert!(success, "put should succeed");
    let json: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    json["id"].as_str().unwrap().to_string()
}

// ============================================================================
// Put / Get Tests
// ============================================================================

#[test]
fn test_cli_put_file_reports_id_and_size() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("store");
    let input = dir.path().join("input.bin");
    std::fs::write(&input, b"Hello, world!").unwrap();

    let (stdout, _stderr, success) = run_shardstore(&["put", input.to_str().unwrap()], &root);

    assert!(success, "put should succeed");
    assert!(stdout.contains("\"status\":\"ok\""), "should return ok status");
    assert!(stdout.contains("\"bytes\":13"), "should report size");
    assert!(root.is_dir(), "store root should be created");
}

#[test]
fn test_cli_put_stdin_then_get_stdout() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("store");
    let data: Vec<u8> = (0..50_000u32).map(|i| (i % 256) as u8).collect();

    let id = put_stdin(&data, &root);
    let output = base_command(&root)
        .args(["get", &id])
        .output()
        .expect("Failed to execute shardstore");

    assert!(output.status.success(), "get should succeed");
    assert_eq!(output.stdout, data, "stdout should carry the blob bytes");
}

#[test]
fn test_cli_get_to_file() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("store");
    let input = dir.path().join("input.txt");
    let restored = dir.path().join("restored.txt");
    std::fs::write(&input, b"round trip through a file").unwrap();

    let id = put_file(&input, &root);
    let (stdout, _stderr, success) =
        run_shardstore(&["get", &id, "-o", restored.to_str().unwrap()], &root);

    assert!(success, "get -o should succeed");
    assert!(stdout.contains("\"bytes\":25"));
    assert_eq!(
        std::fs::read(&restored).unwrap(),
        b"round trip through a file"
    );
}

#[test]
fn test_cli_get_nonexistent_blob() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("store");
    let target = dir.path().join("out.bin");

    let (stdout, _stderr, success) =
        run_shardstore(&["get", "nonexistent", "-o", target.to_str().unwrap()], &root);

    assert!(!success, "get nonexistent should fail");
    assert!(stdout.contains("\"status\":\"error\""));
    assert!(!target.exists(), "no output file for a missing blob");
}

#[test]
fn test_cli_rejects_path_like_id() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("store");

    let (_stdout, _stderr, success) = run_shardstore(&["get", "../escape"], &root);
    assert!(!success, "ids with separators should be rejected");
}

// ============================================================================
// Path / Stat / Rm Tests
// ============================================================================

#[test]
fn test_cli_path_follows_md5_layout() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("store");

    let (stdout, _stderr, success) = run_shardstore(&["path", "abc"], &root);

    assert!(success, "path should succeed");
    let json: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    let expected = root.join("9").join("90").join("abc");
    assert_eq!(json["path"].as_str().unwrap(), expected.to_str().unwrap());
    assert_eq!(json["exists"], serde_json::json!(false));
}

#[test]
fn test_cli_stat() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("store");
    let id = put_stdin(b"12345", &root);

    let (stdout, _stderr, success) = run_shardstore(&["stat", &id], &root);

    assert!(success, "stat should succeed");
    assert!(stdout.contains("\"bytes\":5"));
}

#[test]
fn test_cli_rm_then_get_fails() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("store");
    let id = put_stdin(b"to be removed", &root);

    let (stdout, _stderr, success) = run_shardstore(&["rm", &id], &root);
    assert!(success, "rm should succeed");
    assert!(stdout.contains("\"status\":\"ok\""));

    let (_stdout, _stderr, success) = run_shardstore(&["stat", &id], &root);
    assert!(!success, "stat after rm should fail");

    let (_stdout, _stderr, success) = run_shardstore(&["rm", &id], &root);
    assert!(!success, "second rm should fail");
}

#[test]
fn test_cli_bad_digest_in_config_fails() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{"root": "relative-root-unused", "digest": "nope"}"#).unwrap();

    let output = Command::new(shardstore_binary())
        .args(["-c", config.to_str().unwrap(), "path", "abc"])
        .output()
        .expect("Failed to execute shardstore");

    assert!(!output.status.success(), "bad digest in config should fail");
}

#[test]
fn test_cli_config_file() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("configured");
    let config = dir.path().join("config.json");
    std::fs::write(
        &config,
        serde_json::json!({ "root": root, "shard_levels": 0 }).to_string(),
    )
    .unwrap();

    let output = Command::new(shardstore_binary())
        .args(["-c", config.to_str().unwrap(), "path", "abc"])
        .output()
        .expect("Failed to execute shardstore");

    assert!(output.status.success(), "path with config should succeed");
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        json["path"].as_str().unwrap(),
        root.join("abc").to_str().unwrap()
    );
}
