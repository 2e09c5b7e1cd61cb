//! Typed validation failures.
//!
//! `Display` renders the exact user-facing message; the string-returning
//! checkers are `to_string()` over these values.

use serde::Serialize;
use std::fmt;

/// One violated rule for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldViolation {
    /// Key absent or holding an empty string.
    #[serde(rename_all = "camelCase")]
    Missing {
        /// Request key.
        variable: Box<str>,
        /// Display label.
        label: Box<str>,
    },
    /// Value shorter than the minimum.
    #[serde(rename_all = "camelCase")]
    TooShort {
        /// Request key.
        variable: Box<str>,
        /// Display label.
        label: Box<str>,
        /// Inclusive minimum.
        min: usize,
        /// Measured length.
        length: usize,
    },
    /// Value longer than the maximum.
    #[serde(rename_all = "camelCase")]
    TooLong {
        /// Request key.
        variable: Box<str>,
        /// Display label.
        label: Box<str>,
        /// Inclusive maximum.
        max: usize,
        /// Measured length.
        length: usize,
    },
}

impl FieldViolation {
    /// Request key the violation refers to.
    #[must_use]
    pub fn variable(&self) -> &str {
        match self {
            Self::Missing { variable, .. }
            | Self::TooShort { variable, .. }
            | Self::TooLong { variable, .. } => variable,
        }
    }

    /// Returns true for existence failures.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { label, .. } => write!(formatter, "please enter {label}"),
            Self::TooShort { label, min, .. } => {
                write!(formatter, "{label} must be a minimum of {min} letters.")
            },
            Self::TooLong { label, max, .. } => {
                write!(formatter, "{label} must be a maximum of {max} letters.")
            },
        }
    }
}

/// Render violations as messages, preserving order.
#[must_use]
pub fn into_messages(violations: Vec<FieldViolation>) -> Vec<String> {
    violations
        .into_iter()
        .map(|violation| violation.to_string())
        .collect()
}
