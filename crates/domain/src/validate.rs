//! Validation entry points: existence check, enrichment, size check.
//!
//! The historical contract of [`validate`] returns size failures only and
//! discards existence failures. [`ValidationMode`] makes that choice explicit
//! and offers the two alternatives.

use crate::descriptor::FieldDescriptor;
use crate::existence::{existence_violations, is_missing};
use crate::measure::MeasureOptions;
use crate::request::RequestBody;
use crate::size::{enrich, size_violations};
use crate::violation::{FieldViolation, into_messages};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How existence and size failures are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ValidationMode {
    /// Size failures only; existence failures are computed and dropped.
    #[default]
    SizeOnly,
    /// Existence failures when there are any, otherwise size failures.
    ExistenceFirst,
    /// Existence failures followed by size failures of the present fields.
    Combined,
}

impl ValidationMode {
    /// Canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SizeOnly => "sizeOnly",
            Self::ExistenceFirst => "existenceFirst",
            Self::Combined => "combined",
        }
    }

    /// Parse the canonical representation. Accepts kebab and snake case too.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let normalized: String = input
            .trim()
            .chars()
            .filter(|ch| *ch != '-' && *ch != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "sizeonly" => Some(Self::SizeOnly),
            "existencefirst" => Some(Self::ExistenceFirst),
            "combined" => Some(Self::Combined),
            _ => None,
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Options for [`validate_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationOptions {
    /// Result combination mode.
    pub mode: ValidationMode,
    /// Measurement knobs for the size check.
    #[serde(flatten)]
    pub measure: MeasureOptions,
}

impl ValidationOptions {
    /// Options with the given mode and default measurement.
    #[must_use]
    pub fn with_mode(mode: ValidationMode) -> Self {
        Self {
            mode,
            measure: MeasureOptions::default(),
        }
    }
}

/// Typed failures for `request` under `options`.
#[must_use]
pub fn validate_violations(
    request: &RequestBody,
    fields: &[FieldDescriptor],
    options: &ValidationOptions,
) -> Vec<FieldViolation> {
    let existence = existence_violations(request, fields);
    let missing = existence.len();
    let enriched = enrich(request, fields);

    let violations = match options.mode {
        ValidationMode::SizeOnly => size_violations(&enriched, options.measure),
        ValidationMode::ExistenceFirst if missing > 0 => existence,
        ValidationMode::ExistenceFirst => size_violations(&enriched, options.measure),
        ValidationMode::Combined => {
            let present: Vec<_> = enriched
                .into_iter()
                .filter(|field| !is_missing(request, field.descriptor()))
                .collect();
            let mut combined = existence;
            combined.extend(size_violations(&present, options.measure));
            combined
        },
    };

    tracing::debug!(
        mode = %options.mode,
        fields = fields.len(),
        missing,
        reported = violations.len(),
        "request validated"
    );

    violations
}

/// Validate with explicit options; returns messages in check order.
#[must_use]
pub fn validate_with(
    request: &RequestBody,
    fields: &[FieldDescriptor],
    options: &ValidationOptions,
) -> Vec<String> {
    into_messages(validate_violations(request, fields, options))
}

/// Historical entry point: size failures only, absent values measured as empty.
#[must_use]
pub fn validate(request: &RequestBody, fields: &[FieldDescriptor]) -> Vec<String> {
    validate_with(request, fields, &ValidationOptions::default())
}

/// Existence failures only; no size checks.
#[must_use]
pub fn validate_existence_only(request: &RequestBody, fields: &[FieldDescriptor]) -> Vec<String> {
    into_messages(existence_violations(request, fields))
}

/// Existence failures followed by size failures of the present fields.
#[must_use]
pub fn validate_all(request: &RequestBody, fields: &[FieldDescriptor]) -> Vec<String> {
    validate_with(
        request,
        fields,
        &ValidationOptions::with_mode(ValidationMode::Combined),
    )
}
