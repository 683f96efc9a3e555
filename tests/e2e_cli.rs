//! CLI end-to-end tests
//!
//! Tests for the hlsgate command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the hlsgate binary
#[allow(deprecated)]
fn hlsgate_cmd() -> Command {
    Command::cargo_bin("hlsgate").unwrap()
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = hlsgate_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = hlsgate_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hlsgate"));
}

#[test]
fn test_cli_encode_decode() {
    hlsgate_cmd()
        .args(["encode", "sample0.ts"])
        .assert()
        .success()
        .stdout("c2FtcGxlMC50cw%3D%3D\n");

    hlsgate_cmd()
        .args(["decode", "c2FtcGxlMC50cw%3D%3D"])
        .assert()
        .success()
        .stdout("sample0.ts\n");
}

#[test]
fn test_cli_decode_rejects_garbage() {
    hlsgate_cmd()
        .args(["decode", "not-a-valid-token!!"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid segment token"));
}

#[test]
fn test_cli_rewrite() {
    let dir = tempdir().unwrap();
    let playlist = dir.path().join("demo.m3u8");
    fs::write(&playlist, "#EXTM3U\n#EXTINF:10,\nsample0.ts\n").unwrap();

    hlsgate_cmd()
        .arg("rewrite")
        .arg(&playlist)
        .args(["--video", "demo", "--base-url", "https://host.example/"])
        .assert()
        .success()
        .stdout("#EXTM3U\n#EXTINF:10,\nhttps://host.example/api/seg/demo/c2FtcGxlMC50cw%3D%3D\n");
}

#[test]
fn test_cli_validate_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hlsgate.toml");
    fs::write(
        &path,
        r#"
[server]
port = 9000

[storage]
connection_string = "UseLocalFilesystem=true;Root=/srv/media"
container = "media"
"#,
    )
    .unwrap();

    hlsgate_cmd()
        .env_remove("HLSGATE_CONNECTION_STRING")
        .env_remove("BLOB_CONNECTION_STRING")
        .arg("validate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Container: media"))
        .stdout(predicate::str::contains("Storage backend: filesystem"));
}

#[test]
fn test_cli_validate_rejects_bad_container() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hlsgate.toml");
    fs::write(&path, "[storage]\ncontainer = \"Bad_Name\"\n").unwrap();

    hlsgate_cmd()
        .arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid storage container name"));
}
