//! Error scenario integration tests

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn signato_bin(config_home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_signato"));
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("SIGNATO_SERVER_URL");
    cmd
}

#[test]
fn config_get_unknown_key() {
    let home = TempDir::new().unwrap();
    let output = signato_bin(home.path())
        .args(["config", "get", "unknown_key"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unknown key") && stderr.contains("server_url"),
        "Expected error about unknown key, got: {}",
        stderr
    );
}

#[test]
fn config_set_unknown_key() {
    let home = TempDir::new().unwrap();
    let output = signato_bin(home.path())
        .args(["config", "set", "unknown_key", "value"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown key"), "got: {}", stderr);
}

#[test]
fn config_set_invalid_color() {
    let home = TempDir::new().unwrap();
    let output = signato_bin(home.path())
        .args(["config", "set", "color", "red"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid ink color") && stderr.contains("black, blue"),
        "got: {}",
        stderr
    );
}

#[test]
fn config_set_invalid_timeout() {
    let home = TempDir::new().unwrap();
    let output = signato_bin(home.path())
        .args(["config", "set", "timeout", "soon"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid timeout"), "got: {}", stderr);
}

#[test]
fn config_set_invalid_server_url() {
    let home = TempDir::new().unwrap();
    let output = signato_bin(home.path())
        .args(["config", "set", "server_url", "ftp://example.com"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("http://"), "got: {}", stderr);
}

#[test]
fn config_set_invalid_boolean() {
    let home = TempDir::new().unwrap();
    let output = signato_bin(home.path())
        .args(["config", "set", "camera.mirror", "maybe"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("true") && stderr.contains("false"),
        "Expected error about invalid boolean, got: {}",
        stderr
    );
}

#[test]
fn config_list_with_no_file() {
    let home = TempDir::new().unwrap();
    let output = signato_bin(home.path())
        .args(["config", "list"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("server_url"), "got: {}", stdout);
    assert!(stdout.contains("(not set)"), "got: {}", stdout);
}

#[test]
fn corrupt_config_file_reported() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("signato");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "server_url = [").unwrap();

    let output = signato_bin(home.path())
        .args(["config", "list"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to parse config file"), "got: {}", stderr);
}
