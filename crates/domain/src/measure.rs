//! Length measurement for request values.
//!
//! Strings are measured in the configured [`LengthUnit`], arrays by element
//! count. Numbers, booleans and objects have no length and are never
//! size-checked. Absent keys and `null` are handled by [`AbsentValuePolicy`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Unit used to measure string length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum LengthUnit {
    /// UTF-16 code units, as counted by browser and Node.js runtimes.
    #[default]
    Utf16,
    /// Unicode scalar values (`str::chars`).
    Chars,
}

impl LengthUnit {
    /// Canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chars => "chars",
            Self::Utf16 => "utf16",
        }
    }

    /// Parse the canonical representation (case-insensitive).
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "chars" => Some(Self::Chars),
            "utf16" => Some(Self::Utf16),
            _ => None,
        }
    }

    fn count(self, text: &str) -> usize {
        match self {
            Self::Chars => text.chars().count(),
            Self::Utf16 => text.encode_utf16().count(),
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// What to do when the value under check is absent or `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum AbsentValuePolicy {
    /// Measure as length zero.
    #[default]
    Empty,
    /// Do not size-check the field.
    Skip,
}

impl AbsentValuePolicy {
    /// Canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Skip => "skip",
        }
    }

    /// Parse the canonical representation (case-insensitive).
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "empty" => Some(Self::Empty),
            "skip" => Some(Self::Skip),
            _ => None,
        }
    }
}

impl fmt::Display for AbsentValuePolicy {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Knobs for [`measure`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct MeasureOptions {
    /// String length unit.
    pub length_unit: LengthUnit,
    /// Absent/`null` handling.
    pub absent_values: AbsentValuePolicy,
}

/// Length of a value, or `None` when it must not be size-checked.
#[must_use]
pub fn measure(value: Option<&Value>, options: MeasureOptions) -> Option<usize> {
    match value {
        None | Some(Value::Null) => match options.absent_values {
            AbsentValuePolicy::Empty => Some(0),
            AbsentValuePolicy::Skip => None,
        },
        Some(Value::String(text)) => Some(options.length_unit.count(text)),
        Some(Value::Array(items)) => Some(items.len()),
        Some(Value::Bool(_) | Value::Number(_) | Value::Object(_)) => None,
    }
}
