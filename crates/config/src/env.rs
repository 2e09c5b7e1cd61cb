//! Environment variable parsing and env-to-config merging.
//!
//! Env parsing is strict: a variable that is set must hold a recognized value.
//! Empty values are rejected instead of being treated as unset.

use crate::schema::{CheckerConfig, ValidatedCheckerConfig, ValidationConfig};
use fieldcheck_domain::{AbsentValuePolicy, LengthUnit, ValidationMode};
use fieldcheck_shared::{ErrorCode, ErrorEnvelope};
use std::collections::BTreeMap;
use std::fmt;

/// Env var: validation mode (`sizeOnly`, `existenceFirst`, `combined`).
pub const ENV_MODE: &str = "FIELDCHECK_MODE";
/// Env var: absent value policy (`empty`, `skip`).
pub const ENV_ABSENT_VALUES: &str = "FIELDCHECK_ABSENT_VALUES";
/// Env var: string length unit (`chars`, `utf16`).
pub const ENV_LENGTH_UNIT: &str = "FIELDCHECK_LENGTH_UNIT";

/// Parsed env overrides. `None` means the variable was not set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckerEnv {
    /// `FIELDCHECK_MODE`.
    pub mode: Option<ValidationMode>,
    /// `FIELDCHECK_ABSENT_VALUES`.
    pub absent_values: Option<AbsentValuePolicy>,
    /// `FIELDCHECK_LENGTH_UNIT`.
    pub length_unit: Option<LengthUnit>,
}

impl CheckerEnv {
    /// Parse overrides from an explicit map (tests, library callers).
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            mode: parse_optional_enum(map, ENV_MODE, ValidationMode::parse)?,
            absent_values: parse_optional_enum(map, ENV_ABSENT_VALUES, AbsentValuePolicy::parse)?,
            length_unit: parse_optional_enum(map, ENV_LENGTH_UNIT, LengthUnit::parse)?,
        })
    }

    /// Parse overrides from the process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let map: BTreeMap<String, String> = [ENV_MODE, ENV_ABSENT_VALUES, ENV_LENGTH_UNIT]
            .into_iter()
            .filter_map(|var| std::env::var(var).ok().map(|value| (var.to_string(), value)))
            .collect();
        Self::from_map(&map)
    }

    /// Returns true when no override is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.mode.is_none() && self.absent_values.is_none() && self.length_unit.is_none()
    }

    /// Overwrite each field of `validation` that has an override set.
    pub const fn apply_to(&self, validation: &mut ValidationConfig) {
        if let Some(mode) = self.mode {
            validation.mode = mode;
        }
        if let Some(absent_values) = self.absent_values {
            validation.absent_values = absent_values;
        }
        if let Some(length_unit) = self.length_unit {
            validation.length_unit = length_unit;
        }
    }
}

/// Apply env overrides to `config`, then validate and normalize the result.
pub fn apply_env_overrides(
    mut config: CheckerConfig,
    env: &CheckerEnv,
) -> Result<ValidatedCheckerConfig, ErrorEnvelope> {
    env.apply_to(&mut config.validation);
    config.validate_and_normalize().map_err(ErrorEnvelope::from)
}

/// Env parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Enum env var had an invalid value.
    InvalidEnum {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("env", "empty_value"),
            Self::InvalidEnum { .. } => ErrorCode::new("env", "invalid_value"),
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidEnum { var, value } => {
                write!(formatter, "{var} has an unsupported value: {value}")
            },
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let envelope = Self::expected(error.error_code(), error.to_string());
        match error {
            EnvParseError::EmptyValue { var } => envelope.with_metadata("env_var", var),
            EnvParseError::InvalidEnum { var, value } => envelope
                .with_metadata("env_var", var)
                .with_metadata("value", value),
        }
    }
}

fn parse_optional_enum<T>(
    map: &BTreeMap<String, String>,
    var: &'static str,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }
    parse(trimmed)
        .map(Some)
        .ok_or_else(|| EnvParseError::InvalidEnum {
            var,
            value: trimmed.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn env_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn missing_vars_default_to_none() -> Result<(), Box<dyn Error>> {
        let env = CheckerEnv::from_map(&BTreeMap::new())?;
        assert!(env.is_empty());
        Ok(())
    }

    #[test]
    fn parses_all_overrides() -> Result<(), Box<dyn Error>> {
        let env = CheckerEnv::from_map(&env_map(&[
            (ENV_MODE, "existence-first"),
            (ENV_ABSENT_VALUES, " SKIP "),
            (ENV_LENGTH_UNIT, "utf16"),
        ]))?;
        assert_eq!(env.mode, Some(ValidationMode::ExistenceFirst));
        assert_eq!(env.absent_values, Some(AbsentValuePolicy::Skip));
        assert_eq!(env.length_unit, Some(LengthUnit::Utf16));
        Ok(())
    }

    #[test]
    fn apply_to_only_touches_set_overrides() {
        let mut validation = ValidationConfig {
            mode: ValidationMode::ExistenceFirst,
            absent_values: AbsentValuePolicy::Skip,
            length_unit: LengthUnit::Chars,
        };
        let env = CheckerEnv {
            length_unit: Some(LengthUnit::Utf16),
            ..CheckerEnv::default()
        };
        env.apply_to(&mut validation);

        assert_eq!(validation.mode, ValidationMode::ExistenceFirst);
        assert_eq!(validation.absent_values, AbsentValuePolicy::Skip);
        assert_eq!(validation.length_unit, LengthUnit::Utf16);

        CheckerEnv::default().apply_to(&mut validation);
        assert_eq!(validation.length_unit, LengthUnit::Utf16);
    }

    #[test]
    fn empty_value_is_rejected() {
        let error = CheckerEnv::from_map(&env_map(&[(ENV_MODE, "  ")])).err();
        assert_eq!(error, Some(EnvParseError::EmptyValue { var: ENV_MODE }));
    }

    #[test]
    fn unknown_value_is_reported_with_metadata() -> Result<(), Box<dyn Error>> {
        let error = CheckerEnv::from_map(&env_map(&[(ENV_LENGTH_UNIT, "bytes")]))
            .err()
            .ok_or("expected env error")?;
        let envelope = ErrorEnvelope::from(error);
        assert_eq!(envelope.code, ErrorCode::new("env", "invalid_value"));
        assert_eq!(
            envelope.metadata.get("env_var").map(String::as_str),
            Some(ENV_LENGTH_UNIT)
        );
        assert_eq!(
            envelope.metadata.get("value").map(String::as_str),
            Some("bytes")
        );
        Ok(())
    }
}
