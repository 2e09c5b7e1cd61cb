//! CLI E2E tests for `fieldcheck validate`.

use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

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

fn stdout_json(output: &Output) -> Result<serde_json::Value, Box<dyn Error>> {
    Ok(serde_json::from_slice(&output.stdout)?)
}

#[test]
fn clean_request_exits_zero() -> Result<(), Box<dyn Error>> {
    let config = fixture("config/signup.valid.toml");
    let request = fixture("requests/signup.ok.json");
    let output = run_cli(&["validate", "--config", &config, "--request", &request])?;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("status: ok\n"), "stdout: {stdout}");
    assert!(stdout.contains("violations: 0\n"));
    Ok(())
}

#[test]
fn size_only_mode_reports_length_messages_in_field_order() -> Result<(), Box<dyn Error>> {
    let config = fixture("config/signup.valid.toml");
    let request = fixture("requests/signup.bad.json");
    let output = run_cli(&[
        "--output", "json", "validate", "--config", &config, "--request", &request,
    ])?;

    assert_eq!(output.status.code(), Some(4));
    let value = stdout_json(&output)?;
    assert_eq!(value.get("status"), Some(&serde_json::json!("invalid")));
    assert_eq!(
        value.get("errors"),
        Some(&serde_json::json!([
            "Name must be a minimum of 3 letters.",
            "Email must be a minimum of 5 letters.",
            "City must be a maximum of 20 letters."
        ]))
    );
    Ok(())
}

#[test]
fn combined_mode_from_flag_matches_combined_mode_from_file() -> Result<(), Box<dyn Error>> {
    let toml_config = fixture("config/signup.valid.toml");
    let json_config = fixture("config/signup.valid.json");
    let request = fixture("requests/signup.bad.json");

    let from_flag = run_cli(&[
        "--output",
        "json",
        "validate",
        "--config",
        &toml_config,
        "--request",
        &request,
        "--mode",
        "combined",
    ])?;
    let from_file = run_cli(&[
        "--output", "json", "validate", "--config", &json_config, "--request", &request,
    ])?;

    let expected = serde_json::json!([
        "please enter Email",
        "Name must be a minimum of 3 letters.",
        "City must be a maximum of 20 letters."
    ]);
    assert_eq!(stdout_json(&from_flag)?.get("errors"), Some(&expected));
    assert_eq!(stdout_json(&from_file)?.get("errors"), Some(&expected));
    Ok(())
}

#[test]
fn env_mode_override_applies() -> Result<(), Box<dyn Error>> {
    let config = fixture("config/signup.valid.toml");
    let request = fixture("requests/signup.bad.json");
    let output = cli_command(&[
        "--output", "json", "validate", "--config", &config, "--request", &request,
    ])
    .env("FIELDCHECK_MODE", "existenceFirst")
    .output()?;

    assert_eq!(output.status.code(), Some(4));
    assert_eq!(
        stdout_json(&output)?.get("errors"),
        Some(&serde_json::json!(["please enter Email"]))
    );
    Ok(())
}

#[test]
fn invalid_env_value_is_invalid_input() -> Result<(), Box<dyn Error>> {
    let config = fixture("config/signup.valid.toml");
    let request = fixture("requests/signup.ok.json");
    let output = cli_command(&[
        "--output", "json", "validate", "--config", &config, "--request", &request,
    ])
    .env("FIELDCHECK_MODE", "strict")
    .output()?;

    assert_eq!(output.status.code(), Some(2));
    let value = stdout_json(&output)?;
    assert_eq!(
        value.pointer("/error/code"),
        Some(&serde_json::json!("env:invalid_value"))
    );
    Ok(())
}

#[test]
fn stdin_request_is_supported() -> Result<(), Box<dyn Error>> {
    let config = fixture("config/signup.valid.toml");
    let mut child = cli_command(&["--output", "ndjson", "validate", "--config", &config, "--stdin"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    child
        .stdin
        .take()
        .ok_or("stdin not captured")?
        .write_all(br#"{"name":"Alice","email":"a@b.co","city":"X"}"#)?;
    let output = child.wait_with_output()?;

    assert_eq!(output.status.code(), Some(4));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "stdout: {stdout}");
    let violation: serde_json::Value =
        serde_json::from_str(lines.first().ok_or("missing violation")?)?;
    assert_eq!(
        violation.get("message"),
        Some(&serde_json::json!("City must be a minimum of 2 letters."))
    );
    Ok(())
}

#[test]
fn non_object_request_is_invalid_input() -> Result<(), Box<dyn Error>> {
    let config = fixture("config/signup.valid.toml");
    let request = fixture("requests/not-an-object.json");
    let output = run_cli(&["validate", "--config", &config, "--request", &request])?;

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stdout).contains("code: request:not_an_object"));
    Ok(())
}

#[test]
fn missing_request_file_is_io_error() -> Result<(), Box<dyn Error>> {
    let config = fixture("config/signup.valid.toml");
    let request = fixture("requests/does-not-exist.json");
    let output = run_cli(&["validate", "--config", &config, "--request", &request])?;

    assert_eq!(output.status.code(), Some(3));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("code: request:request_file_not_found"), "stdout: {stdout}");
    Ok(())
}

#[test]
fn missing_request_file_is_json_envelope_in_json_mode() -> Result<(), Box<dyn Error>> {
    let config = fixture("config/signup.valid.toml");
    let request = fixture("requests/does-not-exist.json");
    let output = run_cli(&[
        "--output", "json", "validate", "--config", &config, "--request", &request,
    ])?;

    assert_eq!(output.status.code(), Some(3));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        value.pointer("/error/code"),
        Some(&serde_json::json!("request:request_file_not_found"))
    );
    Ok(())
}

#[test]
fn missing_request_source_is_invalid_input() -> Result<(), Box<dyn Error>> {
    let config = fixture("config/signup.valid.toml");
    let output = run_cli(&["validate", "--config", &config])?;

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing --request or --stdin"));
    Ok(())
}
