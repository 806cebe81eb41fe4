use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn launcher(home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("launcher"));
    cmd.env("HOME", home.path())
        .env("LAUNCHER_LOG_DIR", home.path().join("logs"))
        .env("LAUNCHER_PROJECTS_DIR", home.path().join("projects"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_project_commands() {
    let home = TempDir::new().unwrap();
    let output = launcher(&home).arg("--help").output().unwrap();

    let stdout = std::str::from_utf8(&output.stdout).unwrap();
    assert!(output.status.success());
    assert!(stdout.contains("PROJECT COMMANDS"));
    for command in [
        "generate",
        "build",
        "start",
        "stop",
        "delete",
        "show",
        "remove-service",
        "rename-project",
        "rename-client",
    ] {
        assert!(stdout.contains(command), "missing {} in help", command);
    }
}

#[test]
fn test_start_help_includes_example() {
    let home = TempDir::new().unwrap();
    launcher(&home)
        .args(["start", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("launcher start acme shop --wait --timeout 90s"));
}

#[test]
fn test_stop_help_mentions_kept_volumes() {
    let home = TempDir::new().unwrap();
    launcher(&home)
        .args(["stop", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("volumes"));
}

#[test]
fn test_timeout_requires_wait() {
    let home = TempDir::new().unwrap();
    launcher(&home)
        .args(["start", "acme", "shop", "--timeout", "30s"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--wait"));
}

#[test]
fn test_delete_requires_confirmation() {
    let home = TempDir::new().unwrap();
    launcher(&home)
        .args(["delete", "acme", "shop"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("without --yes"));
}

#[test]
fn test_unknown_project_fails_with_code() {
    let home = TempDir::new().unwrap();
    launcher(&home)
        .args(["stop", "acme", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("LIFE-001"));
}
