use std::fs;
use std::process::Command;

mod common;

fn run(args: &[&str], home: &std::path::Path) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_plexassist"))
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .args(args)
        .output()
        .expect("Failed to run plexassist")
}

#[test]
fn test_cli_prints_resolution() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let library_path = temp_dir.path().join("library.json");
    let json = serde_json::to_string(&common::household_snapshot()).expect("Failed to serialize library");
    fs::write(&library_path, json).expect("Failed to write library");

    let library = library_path.to_string_lossy().to_string();
    let output = run(
        &["--library", &library, "--device", "Kitchen", "--default-device", "Kitchen", "play", "alien"],
        temp_dir.path(),
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("Output should be JSON");
    assert_eq!(value["media"]["type"], "movie");
    assert_eq!(value["media"]["title"], "Alien");
    assert_eq!(value["device"]["name"], "Kitchen");
    assert_eq!(value["device"]["kind"], "cast");
}

#[test]
fn test_cli_client_flag() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let library_path = temp_dir.path().join("library.json");
    let json = serde_json::to_string(&common::household_snapshot()).expect("Failed to serialize library");
    fs::write(&library_path, json).expect("Failed to write library");

    let library = library_path.to_string_lossy().to_string();
    let output = run(
        &["--library", &library, "--client", "Office PC=pc-7", "play", "alien", "on", "office", "pc"],
        temp_dir.path(),
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("Output should be JSON");
    assert_eq!(value["device"]["kind"], "client");
    assert_eq!(value["device"]["id"], "pc-7");
}

#[test]
fn test_cli_missing_library_fails() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("missing.json");
    let output = run(&["--library", &missing.to_string_lossy(), "play", "alien"], temp_dir.path());
    assert!(!output.status.success());
}

#[test]
fn test_cli_save_keeps_default_device() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let library_path = temp_dir.path().join("library.json");
    let json = serde_json::to_string(&common::household_snapshot()).expect("Failed to serialize library");
    fs::write(&library_path, json).expect("Failed to write library");

    let library = library_path.to_string_lossy().to_string();
    let output = run(
        &["--library", &library, "--device", "Kitchen", "--default-device", "Kitchen", "--save", "play", "alien"],
        temp_dir.path(),
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let saved = fs::read_to_string(temp_dir.path().join("config/plexassist/config.json"))
        .expect("Config should be written");
    let value: serde_json::Value = serde_json::from_str(&saved).expect("Config should be JSON");
    assert_eq!(value["default_device"], "Kitchen");

    // The saved default is used without the flag
    let output = run(&["--library", &library, "--device", "Kitchen", "play", "alien"], temp_dir.path());
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
}
