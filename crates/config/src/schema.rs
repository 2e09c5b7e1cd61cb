//! Checker configuration schema: validation options plus the descriptor set.
//!
//! Parsing is strict (unknown keys are rejected) and validation converts the
//! wire descriptors into checked [`FieldDescriptor`]s exactly once.

use fieldcheck_domain::{
    AbsentValuePolicy, DescriptorError, FieldDescriptor, LengthUnit, MeasureOptions,
    RawFieldDescriptor, ValidationMode, ValidationOptions,
};
use fieldcheck_shared::{ErrorCode, ErrorEnvelope, Validated};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Current supported configuration schema version.
pub const CURRENT_CONFIG_VERSION: u32 = 1;

/// Upper bound on descriptors per config.
pub const MAX_FIELDS: usize = 256;

/// Top-level checker configuration (file shape).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct CheckerConfig {
    /// Schema version for forward-compatible migrations.
    pub version: u32,
    /// How results are combined and values measured.
    pub validation: ValidationConfig,
    /// Descriptors, checked in order.
    pub fields: Vec<RawFieldDescriptor>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            validation: ValidationConfig::default(),
            fields: Vec::new(),
        }
    }
}

/// `[validation]` section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ValidationConfig {
    /// Result combination mode.
    pub mode: ValidationMode,
    /// Handling of absent or `null` values in the size check.
    pub absent_values: AbsentValuePolicy,
    /// Unit used to measure strings.
    pub length_unit: LengthUnit,
}

impl ValidationConfig {
    /// Convert into domain options.
    #[must_use]
    pub const fn to_options(self) -> ValidationOptions {
        ValidationOptions {
            mode: self.mode,
            measure: MeasureOptions {
                length_unit: self.length_unit,
                absent_values: self.absent_values,
            },
        }
    }
}

/// Checked configuration ready for use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerSettings {
    /// Options passed to `validate_with`.
    pub options: ValidationOptions,
    /// Checked descriptors, in config order.
    pub fields: Vec<FieldDescriptor>,
}

impl CheckerSettings {
    /// Back to the file shape (used by `config show`).
    #[must_use]
    pub fn to_config(&self) -> CheckerConfig {
        CheckerConfig {
            version: CURRENT_CONFIG_VERSION,
            validation: ValidationConfig {
                mode: self.options.mode,
                absent_values: self.options.measure.absent_values,
                length_unit: self.options.measure.length_unit,
            },
            fields: self
                .fields
                .iter()
                .cloned()
                .map(RawFieldDescriptor::from)
                .collect(),
        }
    }
}

/// Validated checker settings proof.
pub type ValidatedCheckerConfig = Validated<CheckerSettings>;

impl CheckerConfig {
    /// Check version and descriptors, trimming descriptor keys.
    pub fn validate_and_normalize(self) -> Result<ValidatedCheckerConfig, ConfigSchemaError> {
        if self.version != CURRENT_CONFIG_VERSION {
            return Err(ConfigSchemaError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_CONFIG_VERSION,
            });
        }
        if self.fields.is_empty() {
            return Err(ConfigSchemaError::NoFields);
        }
        if self.fields.len() > MAX_FIELDS {
            return Err(ConfigSchemaError::TooManyFields {
                len: self.fields.len(),
                max: MAX_FIELDS,
            });
        }

        let mut seen = BTreeSet::new();
        let mut fields = Vec::with_capacity(self.fields.len());
        for (index, raw) in self.fields.into_iter().enumerate() {
            let variable = raw.variable.trim().to_string();
            let descriptor = FieldDescriptor::new(
                variable.as_str(),
                raw.variable_text,
                raw.min,
                raw.max,
            )
            .map_err(|source| ConfigSchemaError::InvalidDescriptor { index, source })?;
            if !seen.insert(variable.clone()) {
                return Err(ConfigSchemaError::DuplicateVariable { index, variable });
            }
            fields.push(descriptor);
        }

        Ok(Validated::new(CheckerSettings {
            options: self.validation.to_options(),
            fields,
        }))
    }
}

/// Parse a checker config from a JSON string, applying validation.
pub fn parse_checker_config_json(input: &str) -> Result<ValidatedCheckerConfig, ErrorEnvelope> {
    let config: CheckerConfig = serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid config JSON: {error}"),
        )
    })?;

    config.validate_and_normalize().map_err(Into::into)
}

/// Parse a checker config from a TOML string, applying validation.
pub fn parse_checker_config_toml(input: &str) -> Result<ValidatedCheckerConfig, ErrorEnvelope> {
    let config: CheckerConfig = toml::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_toml"),
            format!("invalid config TOML: {error}"),
        )
    })?;

    config.validate_and_normalize().map_err(Into::into)
}

/// Schema-level config failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSchemaError {
    /// The config version is not supported by this binary.
    UnsupportedVersion {
        /// Version found in the config.
        found: u32,
        /// Version supported by this crate.
        supported: u32,
    },
    /// The config declares no descriptors.
    NoFields,
    /// More descriptors than [`MAX_FIELDS`].
    TooManyFields {
        /// Number of descriptors found.
        len: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// A descriptor failed its own checks.
    InvalidDescriptor {
        /// Zero-based position in `fields`.
        index: usize,
        /// Underlying descriptor error.
        source: DescriptorError,
    },
    /// Two descriptors target the same request key.
    DuplicateVariable {
        /// Zero-based position of the second occurrence.
        index: usize,
        /// Repeated request key.
        variable: String,
    },
}

impl ConfigSchemaError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedVersion { .. } => ErrorCode::new("config", "unsupported_version"),
            Self::NoFields => ErrorCode::new("config", "no_fields"),
            Self::TooManyFields { .. } => ErrorCode::new("config", "too_many_fields"),
            Self::InvalidDescriptor { .. } => ErrorCode::new("config", "invalid_descriptor"),
            Self::DuplicateVariable { .. } => ErrorCode::new("config", "duplicate_variable"),
        }
    }
}

impl fmt::Display for ConfigSchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, supported } => write!(
                formatter,
                "unsupported config version {found} (supported: {supported})"
            ),
            Self::NoFields => formatter.write_str("config must declare at least one field"),
            Self::TooManyFields { len, max } => {
                write!(formatter, "config declares {len} fields (max {max})")
            },
            Self::InvalidDescriptor { index, source } => {
                write!(formatter, "fields[{index}] is invalid: {source}")
            },
            Self::DuplicateVariable { index, variable } => write!(
                formatter,
                "fields[{index}] repeats variable `{variable}`"
            ),
        }
    }
}

impl std::error::Error for ConfigSchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidDescriptor { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigSchemaError> for ErrorEnvelope {
    fn from(error: ConfigSchemaError) -> Self {
        let envelope = Self::expected(error.error_code(), error.to_string());
        match error {
            ConfigSchemaError::UnsupportedVersion { found, supported } => envelope
                .with_metadata("found", found.to_string())
                .with_metadata("supported", supported.to_string()),
            ConfigSchemaError::NoFields => envelope,
            ConfigSchemaError::TooManyFields { len, max } => envelope
                .with_metadata("len", len.to_string())
                .with_metadata("max", max.to_string()),
            ConfigSchemaError::InvalidDescriptor { index, source } => envelope
                .with_metadata("index", index.to_string())
                .with_metadata("reason", source.to_string()),
            ConfigSchemaError::DuplicateVariable { index, variable } => envelope
                .with_metadata("index", index.to_string())
                .with_metadata("variable", variable),
        }
    }
}
