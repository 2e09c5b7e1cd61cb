//! Field descriptors: which request key to check, how to label it, and the
//! inclusive length bounds it must satisfy.

use fieldcheck_shared::{ErrorCode, ErrorEnvelope};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive length bounds (`min <= max`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LengthBounds {
    min: usize,
    max: usize,
}

impl LengthBounds {
    /// Construct validated bounds.
    pub const fn new(min: usize, max: usize) -> Result<Self, BoundsError> {
        if min > max {
            return Err(BoundsError { min, max });
        }
        Ok(Self { min, max })
    }

    /// Inclusive lower bound.
    #[must_use]
    pub const fn min(self) -> usize {
        self.min
    }

    /// Inclusive upper bound.
    #[must_use]
    pub const fn max(self) -> usize {
        self.max
    }

    /// Returns true when `length` lies within `[min, max]`.
    #[must_use]
    pub const fn contains(self, length: usize) -> bool {
        length >= self.min && length <= self.max
    }
}

/// Bounds with `min > max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundsError {
    /// Requested minimum.
    pub min: usize,
    /// Requested maximum.
    pub max: usize,
}

impl fmt::Display for BoundsError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "min ({}) must not exceed max ({})",
            self.min, self.max
        )
    }
}

impl std::error::Error for BoundsError {}

/// Errors raised while constructing a [`FieldDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// The request key is empty after trimming.
    EmptyVariable,
    /// `min` is greater than `max`.
    InvertedBounds {
        /// Request key of the offending descriptor.
        variable: Box<str>,
        /// Requested minimum.
        min: usize,
        /// Requested maximum.
        max: usize,
    },
}

impl DescriptorError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyVariable => ErrorCode::new("descriptor", "empty_variable"),
            Self::InvertedBounds { .. } => ErrorCode::new("descriptor", "inverted_bounds"),
        }
    }
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyVariable => formatter.write_str("descriptor variable must be non-empty"),
            Self::InvertedBounds { variable, min, max } => write!(
                formatter,
                "descriptor `{variable}` has min ({min}) greater than max ({max})"
            ),
        }
    }
}

impl std::error::Error for DescriptorError {}

impl From<DescriptorError> for ErrorEnvelope {
    fn from(error: DescriptorError) -> Self {
        let envelope = Self::expected(error.error_code(), error.to_string());
        match error {
            DescriptorError::EmptyVariable => envelope,
            DescriptorError::InvertedBounds { variable, min, max } => envelope
                .with_metadata("variable", variable)
                .with_metadata("min", min.to_string())
                .with_metadata("max", max.to_string()),
        }
    }
}

/// One field to validate.
///
/// Descriptors are immutable once built; the value under check is paired with
/// the descriptor by [`crate::enrich`] instead of being written into it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFieldDescriptor", into = "RawFieldDescriptor")]
pub struct FieldDescriptor {
    variable: Box<str>,
    variable_text: Box<str>,
    bounds: LengthBounds,
}

impl FieldDescriptor {
    /// Build a descriptor, rejecting empty keys and inverted bounds.
    pub fn new(
        variable: impl Into<Box<str>>,
        variable_text: impl Into<Box<str>>,
        min: usize,
        max: usize,
    ) -> Result<Self, DescriptorError> {
        let variable = variable.into();
        if variable.trim().is_empty() {
            return Err(DescriptorError::EmptyVariable);
        }
        let bounds = LengthBounds::new(min, max)
            .map_err(|error| DescriptorError::InvertedBounds {
                variable: variable.clone(),
                min: error.min,
                max: error.max,
            })?;

        Ok(Self {
            variable,
            variable_text: variable_text.into(),
            bounds,
        })
    }

    /// Key of the value in the request body.
    #[must_use]
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Human-readable label used in messages.
    #[must_use]
    pub fn variable_text(&self) -> &str {
        &self.variable_text
    }

    /// Length bounds.
    #[must_use]
    pub const fn bounds(&self) -> LengthBounds {
        self.bounds
    }

    /// Inclusive minimum length.
    #[must_use]
    pub const fn min(&self) -> usize {
        self.bounds.min
    }

    /// Inclusive maximum length.
    #[must_use]
    pub const fn max(&self) -> usize {
        self.bounds.max
    }
}

/// Wire shape of a descriptor (`variable`, `variableText`, `min`, `max`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawFieldDescriptor {
    /// Key of the value in the request body.
    pub variable: String,
    /// Human-readable label used in messages.
    pub variable_text: String,
    /// Inclusive minimum length.
    pub min: usize,
    /// Inclusive maximum length.
    pub max: usize,
}

impl TryFrom<RawFieldDescriptor> for FieldDescriptor {
    type Error = DescriptorError;

    fn try_from(raw: RawFieldDescriptor) -> Result<Self, Self::Error> {
        Self::new(raw.variable, raw.variable_text, raw.min, raw.max)
    }
}

impl From<FieldDescriptor> for RawFieldDescriptor {
    fn from(descriptor: FieldDescriptor) -> Self {
        Self {
            variable: descriptor.variable.into_string(),
            variable_text: descriptor.variable_text.into_string(),
            min: descriptor.bounds.min,
            max: descriptor.bounds.max,
        }
    }
}
