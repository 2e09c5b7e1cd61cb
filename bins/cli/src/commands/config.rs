//! Config command handlers.

use crate::error::{CliError, ExitCode};
use crate::format::OutputMode;
use crate::{CliOutput, format_error_output, format_ndjson_summary, log_info};
use fieldcheck_config::{
    CheckerEnv, checker_config_schema, field_descriptor_schema, load_checker_config_from_path,
    to_pretty_toml,
};
use std::path::Path;

/// Run `config check`: load, merge env and validate.
pub fn run_config_check(
    mode: OutputMode,
    env: &CheckerEnv,
    path: &Path,
) -> Result<CliOutput, CliError> {
    let settings = match load_checker_config_from_path(path, env) {
        Ok(settings) => settings,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let mut stderr = String::new();
    log_info(&mut stderr, "config check completed", mode.no_progress);

    let fields = settings.fields.len();
    let stdout = if mode.is_ndjson() {
        format_ndjson_summary(
            "ok",
            "config",
            Some(serde_json::json!({ "fields": fields, "mode": settings.options.mode })),
        )
    } else if mode.is_json() {
        let payload = serde_json::json!({
            "status": "ok",
            "configPath": path.to_string_lossy(),
            "fields": fields,
            "mode": settings.options.mode,
        });
        let mut output = serde_json::to_string_pretty(&payload)?;
        output.push('\n');
        output
    } else {
        format!(
            "status: ok\nconfig: ok\npath: {}\nfields: {fields}\nmode: {}\n",
            path.to_string_lossy(),
            settings.options.mode
        )
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

/// Run `config show`: print the effective config after env overrides.
pub fn run_config_show(
    mode: OutputMode,
    env: &CheckerEnv,
    path: &Path,
) -> Result<CliOutput, CliError> {
    let settings = match load_checker_config_from_path(path, env) {
        Ok(settings) => settings,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };
    let config = settings.to_config();

    let mut stderr = String::new();
    log_info(&mut stderr, "config show completed", mode.no_progress);

    let stdout = if mode.is_ndjson() {
        format_ndjson_summary(
            "ok",
            "config",
            Some(serde_json::json!({ "effectiveConfig": serde_json::to_value(&config)? })),
        )
    } else if mode.is_json() {
        let payload = serde_json::json!({
            "status": "ok",
            "configPath": path.to_string_lossy(),
            "effectiveConfig": serde_json::to_value(&config)?,
        });
        let mut output = serde_json::to_string_pretty(&payload)?;
        output.push('\n');
        output
    } else {
        let rendered = match to_pretty_toml(&config) {
            Ok(rendered) => rendered,
            Err(error) => return Ok(format_error_output(mode, &error)),
        };
        let mut out = String::from("status: ok\nconfig:\n");
        out.push_str(&rendered);
        out
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code: ExitCode::Ok,
    })
}

/// Run `config schema`: print the JSON Schema for config files or descriptors.
pub fn run_config_schema(mode: OutputMode, descriptor: bool) -> Result<CliOutput, CliError> {
    let schema = if descriptor {
        field_descriptor_schema()
    } else {
        checker_config_schema()
    };
    let schema = serde_json::to_value(&schema)?;

    let stdout = if mode.is_ndjson() {
        format_ndjson_summary("ok", "schema", Some(serde_json::json!({ "schema": schema })))
    } else {
        let mut output = serde_json::to_string_pretty(&schema)?;
        output.push('\n');
        output
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}
