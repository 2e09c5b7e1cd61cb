//! Validate command handler.

use crate::error::{CliError, ExitCode};
use crate::format::OutputMode;
use crate::{CliOutput, format_error_output, format_ndjson_summary, log_info};
use fieldcheck_config::{CheckerEnv, CheckerSettings, load_checker_config_from_path};
use fieldcheck_domain::{
    FieldViolation, RequestBody, ValidationMode, into_messages, validate_violations,
};
use fieldcheck_shared::{ErrorCode, ErrorEnvelope};
use std::io::{self, Read};
use std::path::Path;

/// Where the request body comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSource<'a> {
    /// JSON file on disk.
    File(&'a Path),
    /// JSON read from stdin.
    Stdin,
}

/// Inputs for the validate command.
#[derive(Debug, Clone, Copy)]
pub struct ValidateInput<'a> {
    pub config: &'a Path,
    pub request: RequestSource<'a>,
    pub mode: Option<ValidationMode>,
}

/// Run the validate command.
pub fn run_validate(
    mode: OutputMode,
    env: &CheckerEnv,
    input: &ValidateInput<'_>,
) -> Result<CliOutput, CliError> {
    let settings = match load_checker_config_from_path(input.config, env) {
        Ok(settings) => settings,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    let request_text = match read_request(input.request) {
        Ok(text) => text,
        Err(error) => return Ok(format_error_output(mode, &error)),
    };

    validate_request_text(mode, &settings, &request_text, input.mode)
}

/// Validate `request_text` against already loaded settings.
pub fn validate_request_text(
    mode: OutputMode,
    settings: &CheckerSettings,
    request_text: &str,
    mode_override: Option<ValidationMode>,
) -> Result<CliOutput, CliError> {
    let request = match RequestBody::from_json_str(request_text) {
        Ok(request) => request,
        Err(error) => return Ok(format_error_output(mode, &ErrorEnvelope::from(error))),
    };

    let mut options = settings.options;
    if let Some(validation_mode) = mode_override {
        options.mode = validation_mode;
    }

    let violations = validate_violations(&request, &settings.fields, &options);
    tracing::info!(
        mode = %options.mode,
        fields = settings.fields.len(),
        violations = violations.len(),
        "validate command completed"
    );

    let mut stderr = String::new();
    log_info(&mut stderr, "validation completed", mode.no_progress);

    let summary = ValidateSummary {
        mode: options.mode,
        fields: settings.fields.len(),
    };
    let exit_code = if violations.is_empty() {
        ExitCode::Ok
    } else {
        ExitCode::Violations
    };

    let stdout = if mode.is_ndjson() {
        format_validate_ndjson(summary, &violations)?
    } else if mode.is_json() {
        format_validate_json(summary, violations)?
    } else {
        format_validate_text(summary, violations)
    };

    Ok(CliOutput {
        stdout,
        stderr,
        exit_code,
    })
}

#[derive(Debug, Clone, Copy)]
struct ValidateSummary {
    mode: ValidationMode,
    fields: usize,
}

const fn status_for(violations: &[FieldViolation]) -> &'static str {
    if violations.is_empty() { "ok" } else { "invalid" }
}

fn format_validate_text(summary: ValidateSummary, violations: Vec<FieldViolation>) -> String {
    let mut out = format!(
        "status: {}\nmode: {}\nfields: {}\nviolations: {}\n",
        status_for(&violations),
        summary.mode,
        summary.fields,
        violations.len()
    );
    for message in into_messages(violations) {
        out.push_str("- ");
        out.push_str(&message);
        out.push('\n');
    }
    out
}

fn format_validate_json(
    summary: ValidateSummary,
    violations: Vec<FieldViolation>,
) -> Result<String, CliError> {
    let status = status_for(&violations);
    let typed = serde_json::to_value(&violations)?;
    let payload = serde_json::json!({
        "status": status,
        "mode": summary.mode,
        "fields": summary.fields,
        "errors": into_messages(violations),
        "violations": typed,
    });
    let mut output = serde_json::to_string_pretty(&payload)?;
    output.push('\n');
    Ok(output)
}

fn format_validate_ndjson(
    summary: ValidateSummary,
    violations: &[FieldViolation],
) -> Result<String, CliError> {
    let mut out = String::new();
    for violation in violations {
        let mut line = serde_json::Map::new();
        line.insert("type".to_string(), serde_json::Value::from("violation"));
        line.insert(
            "message".to_string(),
            serde_json::Value::from(violation.to_string()),
        );
        if let serde_json::Value::Object(fields) = serde_json::to_value(violation)? {
            line.extend(fields);
        }
        out.push_str(&serde_json::to_string(&serde_json::Value::Object(line))?);
        out.push('\n');
    }
    out.push_str(&format_ndjson_summary(
        status_for(violations),
        "validate",
        Some(serde_json::json!({
            "mode": summary.mode,
            "fields": summary.fields,
            "violations": violations.len(),
        })),
    ));
    Ok(out)
}

fn read_request(source: RequestSource<'_>) -> Result<String, ErrorEnvelope> {
    match source {
        RequestSource::File(path) => read_request_file(path),
        RequestSource::Stdin => read_stdin_request(),
    }
}

fn read_request_file(path: &Path) -> Result<String, ErrorEnvelope> {
    std::fs::read_to_string(path).map_err(|error| {
        let code = match error.kind() {
            io::ErrorKind::NotFound => "request_file_not_found",
            io::ErrorKind::PermissionDenied => "request_file_permission_denied",
            _ => "request_file_io",
        };
        ErrorEnvelope::expected(
            ErrorCode::new("request", code),
            format!("failed to read request file: {error}"),
        )
        .with_metadata("path", path.to_string_lossy().to_string())
    })
}

fn read_stdin_request() -> Result<String, ErrorEnvelope> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    if buf.trim().is_empty() {
        return Err(ErrorEnvelope::expected(
            ErrorCode::new("request", "empty_body"),
            "stdin request body is empty",
        ));
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OutputFormat;
    use fieldcheck_config::parse_checker_config_json;
    use std::error::Error;

    const CONFIG: &str = r#"{
      "version": 1,
      "fields": [
        { "variable": "name", "variableText": "Name", "min": 3, "max": 10 },
        { "variable": "city", "variableText": "City", "min": 2, "max": 5 }
      ]
    }"#;

    const fn mode(format: OutputFormat) -> OutputMode {
        OutputMode {
            format,
            no_progress: true,
        }
    }

    #[test]
    fn text_output_lists_messages_and_sets_exit_code() -> Result<(), Box<dyn Error>> {
        let settings = parse_checker_config_json(CONFIG)?;
        let output = validate_request_text(
            mode(OutputFormat::Text),
            &settings,
            r#"{"name":"Al","city":"Amsterdam"}"#,
            None,
        )?;

        assert_eq!(output.exit_code, ExitCode::Violations);
        assert!(output.stdout.starts_with("status: invalid\n"));
        assert!(output.stdout.contains("- Name must be a minimum of 3 letters.\n"));
        assert!(output.stdout.contains("- City must be a maximum of 5 letters.\n"));
        assert!(output.stderr.is_empty());
        Ok(())
    }

    #[test]
    fn clean_request_exits_ok() -> Result<(), Box<dyn Error>> {
        let settings = parse_checker_config_json(CONFIG)?;
        let output = validate_request_text(
            mode(OutputFormat::Json),
            &settings,
            r#"{"name":"Alice","city":"Rome"}"#,
            None,
        )?;

        assert_eq!(output.exit_code, ExitCode::Ok);
        let value: serde_json::Value = serde_json::from_str(&output.stdout)?;
        assert_eq!(value.get("status"), Some(&serde_json::json!("ok")));
        assert_eq!(value.get("errors"), Some(&serde_json::json!([])));
        Ok(())
    }

    #[test]
    fn mode_override_beats_config() -> Result<(), Box<dyn Error>> {
        let settings = parse_checker_config_json(CONFIG)?;
        let output = validate_request_text(
            mode(OutputFormat::Json),
            &settings,
            r#"{"name":""}"#,
            Some(ValidationMode::Combined),
        )?;

        let value: serde_json::Value = serde_json::from_str(&output.stdout)?;
        assert_eq!(value.get("mode"), Some(&serde_json::json!("combined")));
        assert_eq!(
            value.get("errors"),
            Some(&serde_json::json!(["please enter Name", "please enter City"]))
        );
        Ok(())
    }

    #[test]
    fn ndjson_emits_one_line_per_violation_then_summary() -> Result<(), Box<dyn Error>> {
        let settings = parse_checker_config_json(CONFIG)?;
        let output = validate_request_text(
            mode(OutputFormat::Ndjson),
            &settings,
            r#"{"name":"Al","city":"Roma"}"#,
            None,
        )?;

        let lines: Vec<serde_json::Value> = output
            .stdout
            .lines()
            .map(serde_json::from_str)
            .collect::<Result<_, _>>()?;
        assert_eq!(lines.len(), 2);
        let first = lines.first().ok_or("missing violation line")?;
        assert_eq!(first.get("type"), Some(&serde_json::json!("violation")));
        assert_eq!(first.get("kind"), Some(&serde_json::json!("tooShort")));
        assert_eq!(first.get("variable"), Some(&serde_json::json!("name")));
        let summary = lines.get(1).ok_or("missing summary line")?;
        assert_eq!(summary.get("type"), Some(&serde_json::json!("summary")));
        assert_eq!(summary.get("violations"), Some(&serde_json::json!(1)));
        Ok(())
    }

    #[test]
    fn non_object_request_is_invalid_input() -> Result<(), Box<dyn Error>> {
        let settings = parse_checker_config_json(CONFIG)?;
        let output = validate_request_text(mode(OutputFormat::Text), &settings, "[1, 2]", None)?;

        assert_eq!(output.exit_code, ExitCode::InvalidInput);
        assert!(output.stdout.contains("code: request:not_an_object"));
        Ok(())
    }

    #[test]
    fn missing_request_file_renders_envelope() -> Result<(), Box<dyn Error>> {
        let config = std::env::temp_dir().join("fieldcheck-validate-missing-request.json");
        std::fs::write(&config, CONFIG)?;
        let request = Path::new("/definitely/not/here/body.json");
        let input = ValidateInput {
            config: &config,
            request: RequestSource::File(request),
            mode: None,
        };

        let output = run_validate(mode(OutputFormat::Json), &CheckerEnv::default(), &input)?;
        std::fs::remove_file(&config)?;

        assert_eq!(output.exit_code, ExitCode::Io);
        let value: serde_json::Value = serde_json::from_str(&output.stdout)?;
        assert_eq!(value.get("status"), Some(&serde_json::json!("error")));
        let error = value.get("error").ok_or("missing error payload")?;
        assert_eq!(
            error.get("code"),
            Some(&serde_json::json!("request:request_file_not_found"))
        );
        assert_eq!(
            error.pointer("/meta/path"),
            Some(&serde_json::json!("/definitely/not/here/body.json"))
        );
        Ok(())
    }
}
