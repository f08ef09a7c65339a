//! CLI behaviour of the `booksearch` binary that needs no network.

use std::process::{Output, Stdio};
use std::time::Duration;

use tempfile::TempDir;
use tokio::time::timeout;

async fn run(args: &[&str], history_dir: &TempDir) -> Output {
    timeout(
        Duration::from_secs(10),
        tokio::process::Command::new(env!("CARGO_BIN_EXE_booksearch"))
            .args(args)
            .env_remove("BOOKSEARCH_CONFIG")
            .env("BOOKSEARCH_HISTORY__DIR", history_dir.path())
            .env("RUST_LOG", "error")
            .stdin(Stdio::null())
            .output(),
    )
    .await
    .expect("Command timed out")
    .expect("Failed to execute command")
}

#[tokio::test]
async fn test_no_command_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let output = run(&[], &dir).await;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[tokio::test]
async fn test_unknown_command_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let output = run(&["frobnicate"], &dir).await;
    assert!(!output.status.success());
}

#[tokio::test]
async fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    let output = run(&["--help"], &dir).await;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["search", "history", "serve"] {
        assert!(stdout.contains(command), "missing {} in {}", command, stdout);
    }
}

#[tokio::test]
async fn test_empty_history_message() {
    let dir = TempDir::new().unwrap();

    for kind in ["keywords", "selections"] {
        let output = run(&["history", kind], &dir).await;
        assert!(output.status.success());
        assert_eq!(
            String::from_utf8_lossy(&output.stdout),
            "No history available.\n"
        );
    }
    assert!(dir.path().join("search_history_keyword.json").exists());
    assert!(dir.path().join("search_history_selection.json").exists());
}

#[tokio::test]
async fn test_history_menu_without_input_fails() {
    let dir = TempDir::new().unwrap();
    let output = run(&["history"], &dir).await;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error: "));
}
