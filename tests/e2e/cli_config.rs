//! CLI E2E tests for `fieldcheck config` and `fieldcheck info`.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| manifest_dir.to_path_buf())
}

fn fixture(relative: &str) -> String {
    workspace_root()
        .join("tests")
        .join("fixtures")
        .join(relative)
        .to_string_lossy()
        .to_string()
}

fn cli_command(args: &[&str]) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_fieldcheck"));
    command.args(args).arg("--no-progress");
    for (key, _) in std::env::vars() {
        if key.starts_with("FIELDCHECK_") {
            command.env_remove(key);
        }
    }
    command
}

fn run_cli(args: &[&str]) -> std::io::Result<Output> {
    cli_command(args).output()
}

#[test]
fn config_check_reports_field_count() -> Result<(), Box<dyn Error>> {
    let config = fixture("config/signup.valid.json");
    let output = run_cli(&["--output", "json", "config", "check", "--config", &config])?;

    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value.get("fields"), Some(&serde_json::json!(3)));
    assert_eq!(value.get("mode"), Some(&serde_json::json!("combined")));
    Ok(())
}

#[test]
fn config_check_rejects_inverted_bounds() -> Result<(), Box<dyn Error>> {
    let config = fixture("config/inverted-bounds.invalid.json");
    let output = run_cli(&["config", "check", "--config", &config])?;

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("code: config:invalid_descriptor"), "stdout: {stdout}");
    assert!(stdout.contains("  index: 1\n"));
    Ok(())
}

#[test]
fn config_show_prints_normalized_toml_with_env_overrides() -> Result<(), Box<dyn Error>> {
    let config = fixture("config/signup.valid.toml");
    let output = cli_command(&["config", "show", "--config", &config])
        .env("FIELDCHECK_LENGTH_UNIT", "utf16")
        .output()?;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("status: ok\nconfig:\n"));
    assert!(stdout.contains("lengthUnit = \"utf16\""), "stdout: {stdout}");
    assert!(stdout.contains("variable = \"email\""), "keys are trimmed");
    Ok(())
}

#[test]
fn config_show_is_deterministic() -> Result<(), Box<dyn Error>> {
    let config = fixture("config/signup.valid.json");
    let first = run_cli(&["--output", "json", "config", "show", "--config", &config])?;
    let second = run_cli(&["--output", "json", "config", "show", "--config", &config])?;

    assert_eq!(first.stdout, second.stdout);
    Ok(())
}

#[test]
fn config_schema_is_valid_json() -> Result<(), Box<dyn Error>> {
    let output = run_cli(&["config", "schema"])?;

    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert!(value.pointer("/properties/fields").is_some());
    Ok(())
}

#[test]
fn info_reports_name_and_version() -> Result<(), Box<dyn Error>> {
    let output = run_cli(&["--output", "ndjson", "info"])?;

    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value.pointer("/build/name"), Some(&serde_json::json!("fieldcheck")));
    assert_eq!(
        value.pointer("/build/version"),
        Some(&serde_json::json!(env!("CARGO_PKG_VERSION")))
    );
    Ok(())
}
