//! CLI end-to-end tests

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the ripforge binary, run from an empty directory so
/// no stray config file is picked up.
#[allow(deprecated)]
fn ripforge_cmd(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("ripforge").unwrap();
    cmd.current_dir(dir);
    cmd
}

#[test]
fn test_cli_help_flag() {
    let dir = tempdir().unwrap();
    ripforge_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ripforge"))
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("check-tools"));
}

#[test]
fn test_cli_version_flag() {
    let dir = tempdir().unwrap();
    ripforge_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ripforge"));
}

#[test]
fn test_cli_version_command() {
    let dir = tempdir().unwrap();
    ripforge_cmd(dir.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ripforge "));
}

#[test]
fn test_cli_check_tools_command() {
    let dir = tempdir().unwrap();
    ripforge_cmd(dir.path())
        .arg("check-tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("makemkvcon"))
        .stdout(predicate::str::contains("HandBrakeCLI"));
}

#[test]
fn test_cli_titles_help() {
    let dir = tempdir().unwrap();
    ripforge_cmd(dir.path())
        .args(["titles", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_cli_validate_defaults() {
    let dir = tempdir().unwrap();
    ripforge_cmd(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("using defaults"))
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_cli_validate_config_file() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("ripforge.toml");
    fs::write(
        &config,
        r#"
[output]
dir = "/srv/rips"

[encode]
encoder = "x265"
encoder_preset = "medium"
quality = 20
preset = "Fast 1080p30"
"#,
    )
    .unwrap();

    ripforge_cmd(dir.path())
        .arg("validate")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("/srv/rips"))
        .stdout(predicate::str::contains("x265 (medium, q=20)"))
        .stdout(predicate::str::contains("Preset: Fast 1080p30"));
}

#[test]
fn test_cli_validate_rejects_out_of_range_quality() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[encode]\nquality = 60\n").unwrap();

    ripforge_cmd(dir.path())
        .args(["validate"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Quality must be between 0 and 51"));
}

#[test]
fn test_cli_validate_warns_on_unknown_speed_preset() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("warn.toml");
    fs::write(&config, "[encode]\nencoder_preset = \"ludicrous\"\n").unwrap();

    ripforge_cmd(dir.path())
        .arg("validate")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("! "))
        .stdout(predicate::str::contains("ludicrous"));
}

#[test]
fn test_cli_validate_missing_file_fails() {
    let dir = tempdir().unwrap();
    ripforge_cmd(dir.path())
        .args(["validate", "does-not-exist.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn test_cli_unknown_subcommand_fails() {
    let dir = tempdir().unwrap();
    ripforge_cmd(dir.path())
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
