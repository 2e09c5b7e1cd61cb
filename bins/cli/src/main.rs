//! CLI binary entrypoint.

mod commands;
mod error;
mod format;
mod observability;

use clap::{Parser, Subcommand};
use commands::{
    RequestSource, ValidateInput, run_config_check, run_config_schema, run_config_show, run_info,
    run_validate,
};
use error::{CliError, ExitCode};
use fieldcheck_config::CheckerEnv;
use fieldcheck_domain::ValidationMode;
use fieldcheck_shared::{ErrorCode, ErrorEnvelope, ErrorKind};
use format::{OutputArgs, OutputMode};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(
    name = "fieldcheck",
    version,
    about = "Check request payload fields for presence and length",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show build and version details.
    Info,
    /// Config-related commands.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Validate a request body against the descriptors in a config file.
    Validate {
        /// Config file path (JSON/TOML).
        #[arg(long)]
        config: PathBuf,
        /// Request body JSON file.
        #[arg(long, conflicts_with = "stdin")]
        request: Option<PathBuf>,
        /// Read the request body JSON from stdin.
        #[arg(long)]
        stdin: bool,
        /// Override the configured mode: sizeOnly, existenceFirst or combined.
        #[arg(long, value_parser = parse_mode)]
        mode: Option<ValidationMode>,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Validate config loading, env merging, and descriptor checks.
    Check {
        /// Config file path (JSON/TOML).
        #[arg(long)]
        config: PathBuf,
    },
    /// Show the effective config after env overrides.
    Show {
        /// Config file path (JSON/TOML).
        #[arg(long)]
        config: PathBuf,
    },
    /// Print the JSON Schema for config files.
    Schema {
        /// Print the schema of a single field descriptor instead.
        #[arg(long)]
        descriptor: bool,
    },
}

pub(crate) struct CliOutput {
    stdout: String,
    stderr: String,
    exit_code: ExitCode,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let mode = OutputMode::from_args(&cli.output);
    observability::init_tracing(mode);

    match run(&cli.command, mode) {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(&error),
        },
        Err(error) => exit_with_error(&error),
    }
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    tracing::debug!(%error, "command aborted");
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn run(command: &Commands, mode: OutputMode) -> Result<CliOutput, CliError> {
    match command {
        Commands::Info => run_info(mode),
        Commands::Config { command } => match command {
            ConfigCommands::Check { config } => {
                with_std_env(mode, |env| run_config_check(mode, env, config))
            },
            ConfigCommands::Show { config } => {
                with_std_env(mode, |env| run_config_show(mode, env, config))
            },
            ConfigCommands::Schema { descriptor } => run_config_schema(mode, *descriptor),
        },
        Commands::Validate {
            config,
            request,
            stdin,
            mode: validation_mode,
        } => {
            let input = ValidateInput {
                config,
                request: resolve_request_source(request.as_deref(), *stdin)?,
                mode: *validation_mode,
            };
            with_std_env(mode, |env| run_validate(mode, env, &input))
        },
    }
}

fn with_std_env(
    mode: OutputMode,
    command: impl FnOnce(&CheckerEnv) -> Result<CliOutput, CliError>,
) -> Result<CliOutput, CliError> {
    match CheckerEnv::from_std_env() {
        Ok(env) => command(&env),
        Err(error) => Ok(format_error_output(mode, &ErrorEnvelope::from(error))),
    }
}

fn resolve_request_source(
    request: Option<&Path>,
    from_stdin: bool,
) -> Result<RequestSource<'_>, CliError> {
    if from_stdin {
        return Ok(RequestSource::Stdin);
    }
    request
        .map(RequestSource::File)
        .ok_or_else(|| CliError::InvalidInput("missing --request or --stdin".to_string()))
}

fn parse_mode(input: &str) -> Result<ValidationMode, String> {
    ValidationMode::parse(input).ok_or_else(|| {
        format!("unsupported mode `{input}` (expected sizeOnly, existenceFirst or combined)")
    })
}

/// Exit code for a failure surfaced as an envelope.
pub(crate) fn envelope_exit_code(error: &ErrorEnvelope) -> ExitCode {
    let code = error.code.code();
    match error.kind {
        ErrorKind::Expected
            if code.starts_with("config_file_") || code.starts_with("request_file_") =>
        {
            ExitCode::Io
        },
        ErrorKind::Expected => ExitCode::InvalidInput,
        ErrorKind::Unexpected if error.code.namespace() == "core" => ExitCode::Io,
        ErrorKind::Unexpected | ErrorKind::Invariant => ExitCode::Internal,
    }
}

pub(crate) fn format_error_output(mode: OutputMode, error: &ErrorEnvelope) -> CliOutput {
    let exit_code = envelope_exit_code(error);
    tracing::debug!(code = %error.code, kind = %error.kind, "command failed");

    let mut stderr = String::new();
    log_info(&mut stderr, "command failed", mode.no_progress);

    let stdout = if mode.is_ndjson() {
        let payload = serde_json::json!({
            "type": "error",
            "status": "error",
            "error": error_payload(error),
        });
        let mut out =
            serde_json::to_string(&payload).unwrap_or_else(|_| render_fallback(true));
        out.push('\n');
        out
    } else if mode.is_json() {
        let payload = serde_json::json!({
            "status": "error",
            "error": error_payload(error),
        });

        // This is a CLI boundary, so JSON serialization errors are internal.
        let mut output =
            serde_json::to_string_pretty(&payload).unwrap_or_else(|_| render_fallback(false));
        output.push('\n');
        output
    } else {
        format_error_text(error)
    };

    CliOutput {
        stdout,
        stderr,
        exit_code,
    }
}

/// Hand-built error payload for when the real one cannot be serialized.
fn render_fallback(ndjson: bool) -> String {
    let error = ErrorEnvelope::invariant(ErrorCode::internal(), "failed to render error output");
    let body = format!(
        "\"status\":\"error\",\"error\":{{\"code\":\"{}\",\"message\":\"{}\",\"kind\":\"{}\"}}",
        error.code, error.message, error.kind
    );
    if ndjson {
        format!("{{\"type\":\"error\",{body}}}")
    } else {
        format!("{{{body}}}")
    }
}

fn error_payload(error: &ErrorEnvelope) -> serde_json::Value {
    serde_json::json!({
        "code": error.code.to_string(),
        "message": error.message,
        "kind": error.kind,
        "class": error.class,
        "meta": error.metadata,
    })
}

fn format_error_text(error: &ErrorEnvelope) -> String {
    let mut out = String::new();
    out.push_str("status: error\n");
    out.push_str("code: ");
    out.push_str(&error.code.to_string());
    out.push('\n');
    out.push_str("message: ");
    out.push_str(&error.message);
    out.push('\n');
    out.push_str("kind: ");
    out.push_str(&error.kind.to_string());
    out.push('\n');

    if !error.metadata.is_empty() {
        out.push_str("meta:\n");
        for (key, value) in &error.metadata {
            out.push_str("  ");
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
    }

    out
}

fn log_info(stderr: &mut String, message: &str, no_progress: bool) {
    if no_progress {
        return;
    }
    stderr.push_str("info: ");
    stderr.push_str(message);
    stderr.push('\n');
}

fn format_ndjson_summary(status: &str, kind: &str, extra: Option<serde_json::Value>) -> String {
    let mut payload = serde_json::Map::new();
    payload.insert(
        "type".to_string(),
        serde_json::Value::String("summary".to_string()),
    );
    payload.insert(
        "status".to_string(),
        serde_json::Value::String(status.to_string()),
    );
    payload.insert(
        "kind".to_string(),
        serde_json::Value::String(kind.to_string()),
    );
    if let Some(serde_json::Value::Object(map)) = extra {
        for (key, value) in map {
            payload.insert(key, value);
        }
    }
    let mut out = serde_json::to_string(&serde_json::Value::Object(payload)).unwrap_or_else(|_| {
        "{\"type\":\"summary\",\"status\":\"error\",\"kind\":\"internal\"}".to_string()
    });
    out.push('\n');
    out
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    stdout.write_all(output.stdout.as_bytes())?;
    stdout.flush()?;

    if !output.stderr.is_empty() {
        let mut stderr = io::stderr();
        stderr.write_all(output.stderr.as_bytes())?;
        stderr.flush()?;
    }

    Ok(())
}
