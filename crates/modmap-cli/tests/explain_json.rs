//! Integration tests for `modmap explain`.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-q", "-p", "modmap-cli", "--bin", "modmap", "--"]);
    cmd
}

fn write_config(dir: &Path, contents: &str) -> String {
    let path = dir.join("loader.json");
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_explain_json_trace() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        r#"{
            "maps": { "liferay": "liferay@1.0.0" },
            "modules": ["liferay@1.0.0/html/js/ac.es"]
        }"#,
    );

    let output = cargo_bin()
        .args(["--json", "--config", &config, "explain", "liferay/html/js/ac.es"])
        .output()
        .expect("Failed to run explain command");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");

    assert_eq!(json["schema_version"].as_u64(), Some(1));
    assert_eq!(json["specifier"], "liferay/html/js/ac.es");
    assert_eq!(json["resolved"], "liferay@1.0.0/html/js/ac.es");
    assert_eq!(json["mapped"], true);
    assert_eq!(json["registered"], true);

    let steps = json["trace"]["steps"].as_array().unwrap();
    assert_eq!(steps[0]["step"], "context_map");
    assert_eq!(steps[0]["ok"], false);
    assert_eq!(steps[1]["step"], "partial_match");
    assert_eq!(steps[1]["table"], "global");
    assert_eq!(steps[1]["key"], "liferay");
}

#[test]
fn test_explain_human_unmapped() {
    let output = cargo_bin()
        .args(["explain", "jquery"])
        .output()
        .expect("Failed to run explain command");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Specifier: jquery"));
    assert!(stdout.contains("Resolved: jquery"));
    assert!(stdout.contains("Registered: no"));
    assert!(stdout.contains("[unmapped]"));
}
