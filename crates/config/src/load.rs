//! Config loading helpers (file + env overrides).
//!
//! Merge order is fixed: file content, then env overrides, then validation.
//! Failures surface as typed `ErrorEnvelope`s.

use crate::{CheckerConfig, CheckerEnv, ValidatedCheckerConfig, apply_env_overrides};
use fieldcheck_shared::{ErrorClass, ErrorCode, ErrorEnvelope};
use std::path::Path;

/// On-disk config format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.json` (also used when the path has no extension).
    Json,
    /// `.toml`.
    Toml,
}

impl ConfigFormat {
    /// Detect the format from a path extension.
    pub fn from_path(path: &Path) -> Result<Self, ErrorEnvelope> {
        let ext = path
            .extension()
            .and_then(|value| value.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            None | Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            Some(other) => Err(ErrorEnvelope::expected(
                ErrorCode::new("config", "unsupported_format"),
                "unsupported config format; use .json or .toml",
            )
            .with_metadata("extension", other.to_string())),
        }
    }
}

/// Parse `config_text` as `format`, apply `env`, then validate.
pub fn load_checker_config_from_sources(
    config_text: &str,
    format: ConfigFormat,
    env: &CheckerEnv,
) -> Result<ValidatedCheckerConfig, ErrorEnvelope> {
    let config = parse_config_unvalidated(config_text, format)?;
    // env is applied last and also validates/normalizes the resulting config.
    apply_env_overrides(config, env)
}

/// Load the checker config from a file path.
pub fn load_checker_config_from_path(
    path: &Path,
    env: &CheckerEnv,
) -> Result<ValidatedCheckerConfig, ErrorEnvelope> {
    let format = ConfigFormat::from_path(path)?;
    let config_text = read_config_file(path)?;
    let settings = load_checker_config_from_sources(&config_text, format, env)
        .map_err(|error| error.with_metadata("path", path.to_string_lossy().to_string()))?;

    tracing::debug!(
        path = %path.display(),
        ?format,
        fields = settings.fields.len(),
        mode = %settings.options.mode,
        "checker config loaded"
    );
    Ok(settings)
}

/// Load the checker config from a file path and the process environment.
pub fn load_checker_config_std_env(path: &Path) -> Result<ValidatedCheckerConfig, ErrorEnvelope> {
    let env = CheckerEnv::from_std_env().map_err(ErrorEnvelope::from)?;
    if !env.is_empty() {
        tracing::debug!(?env, "applying env overrides");
    }
    load_checker_config_from_path(path, &env)
}

/// Serialize the config as deterministic pretty JSON (with trailing newline).
pub fn to_pretty_json(config: &CheckerConfig) -> Result<String, ErrorEnvelope> {
    let mut output = serde_json::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::new("config", "serialize_json"),
            format!("failed to serialize config: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    output.push('\n');
    Ok(output)
}

/// Serialize the config as deterministic pretty TOML (with trailing newline).
pub fn to_pretty_toml(config: &CheckerConfig) -> Result<String, ErrorEnvelope> {
    let mut output = toml::to_string_pretty(config).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::new("config", "serialize_toml"),
            format!("failed to serialize config TOML: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    if !output.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

fn parse_config_unvalidated(
    input: &str,
    format: ConfigFormat,
) -> Result<CheckerConfig, ErrorEnvelope> {
    match format {
        ConfigFormat::Json => serde_json::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_json"),
                format!("invalid config JSON: {error}"),
            )
        }),
        ConfigFormat::Toml => toml::from_str(input).map_err(|error| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", "invalid_toml"),
                format!("invalid config TOML: {error}"),
            )
        }),
    }
}

fn read_config_file(path: &Path) -> Result<String, ErrorEnvelope> {
    std::fs::read_to_string(path).map_err(|error| {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::new("config", "config_file_not_found"),
            std::io::ErrorKind::PermissionDenied => {
                ErrorCode::new("config", "config_file_permission_denied")
            },
            _ => ErrorCode::new("config", "config_file_io"),
        };

        ErrorEnvelope::expected(code, format!("failed to read config file: {error}"))
            .with_metadata("path", path.to_string_lossy().to_string())
    })
}
