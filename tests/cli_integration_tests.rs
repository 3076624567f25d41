use std::process::{Command, Stdio};
use tempfile::TempDir;

fn postmanctl(config_dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_postmanctl"));
    cmd.env("POSTMANCTL_CONFIG", config_dir.path().join("config.yaml"))
        .env_remove("POSTMANCTL_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help_command() {
    let dir = TempDir::new().unwrap();
    let output = postmanctl(&dir).arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("postmanctl"));
    assert!(stdout.contains("replace"));
}

#[test]
fn test_completions_for_bash() {
    let dir = TempDir::new().unwrap();
    let output = postmanctl(&dir).args(["completions", "bash"]).output().unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("postmanctl"));

    let output = postmanctl(&dir).args(["completions", "tcsh"]).output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_context_lifecycle() {
    let dir = TempDir::new().unwrap();

    let output = postmanctl(&dir)
        .args([
            "config",
            "set-context",
            "work",
            "--api-root",
            "http://localhost:1",
            "--api-key-env",
            "WORK_KEY",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let output = postmanctl(&dir).args(["config", "list-contexts"]).output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("* work → http://localhost:1"));

    let output = postmanctl(&dir).args(["config", "current-context"]).output().unwrap();
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "work");

    let output = postmanctl(&dir).args(["config", "use-context", "missing"]).output().unwrap();
    assert!(!output.status.success());

    let output = postmanctl(&dir).args(["config", "delete-context", "work"]).output().unwrap();
    assert!(output.status.success());
    let output = postmanctl(&dir).args(["config", "current-context"]).output().unwrap();
    assert!(String::from_utf8_lossy(&output.stdout).contains("no current context"));
}

#[test]
fn test_replace_rejects_invalid_document() {
    let dir = TempDir::new().unwrap();
    let doc = dir.path().join("doc.json");
    std::fs::write(&doc, "{not json").unwrap();

    let output = postmanctl(&dir)
        .args(["replace", "collection", "A", "-f"])
        .arg(&doc)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("parsing the replacement document"), "{stderr}");
}

#[test]
fn test_replace_rejects_unknown_mode() {
    let dir = TempDir::new().unwrap();
    let output = postmanctl(&dir)
        .args(["replace", "collection", "A", "--mode", "merge"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_compare_without_filename_fails_before_reading_stdin() {
    let dir = TempDir::new().unwrap();
    let output = postmanctl(&dir)
        .args(["replace", "collection", "A", "--mode", "compare"])
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("compare mode only works with --filename"), "{stderr}");
    assert!(!stderr.contains("parsing the replacement document"), "{stderr}");
}
