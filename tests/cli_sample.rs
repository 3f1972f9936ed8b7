use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::{NamedTempFile, TempDir};

const SAMPLE: &str = r#"{
    "climate": [
        {"id": 1, "text": "Great news for clean energy",
         "sentiment": {"neg": 0.0, "neu": 0.4, "pos": 0.6, "compound": 0.7},
         "category": "Positive"},
        {"id": 2, "text": "Floods destroyed everything, devastating and horrible",
         "sentiment": {"neg": 0.7, "neu": 0.3, "pos": 0.0, "compound": -0.9},
         "category": "Highly Negative"}
    ]
}"#;

fn write_fixture(dir: &TempDir) -> NamedTempFile {
    let sample_path = dir.path().join("sample.json");
    std::fs::write(&sample_path, SAMPLE).unwrap();

    let mut config = NamedTempFile::new_in(dir.path()).unwrap();
    writeln!(config, "sample_data_path = {:?}", sample_path.display().to_string()).unwrap();
    config
}

fn run(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sentiscope"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env("RUST_LOG", "off")
        .env_remove("BEARER_TOKEN")
        .output()
        .unwrap()
}

#[test]
fn test_sample_search_renders_dashboard() {
    let dir = TempDir::new().unwrap();
    let config = write_fixture(&dir);

    let output = run(config.path(), &["search", "Climate", "--sample"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Analyzed 2 posts for 'Climate'"));
    assert!(stdout.contains("🛑 [-0.900] Floods destroyed everything"));
    assert!(stdout.contains("id 2 | neg=0.700 neu=0.300 pos=0.000 compound=-0.9000"));
}

#[test]
fn test_sample_search_json() {
    let dir = TempDir::new().unwrap();
    let config = write_fixture(&dir);

    let output = run(config.path(), &["search", "climate", "--sample", "--json"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
    assert_eq!(value[1]["category"], "Highly Negative");
}

#[test]
fn test_unknown_sample_keyword_lists_available() {
    let dir = TempDir::new().unwrap();
    let config = write_fixture(&dir);

    let output = run(config.path(), &["search", "sports", "--sample"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Available keywords: climate"));
    assert!(stdout.contains("No posts found for 'sports'"));
}

#[test]
fn test_missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir.path().join("nope.toml"), &["search", "ai", "--sample"]);
    assert!(!output.status.success());
}

#[test]
fn test_interactive_session_reads_until_quit() {
    let dir = TempDir::new().unwrap();
    let config = write_fixture(&dir);

    let mut child = Command::new(env!("CARGO_BIN_EXE_sentiscope"))
        .arg("--config")
        .arg(config.path())
        .args(["interactive", "--sample"])
        .env("RUST_LOG", "off")
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"climate\n\nclimate\nquit\n")
        .unwrap();

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.matches("Analyzed 2 posts for 'climate'").count(), 2);
}
