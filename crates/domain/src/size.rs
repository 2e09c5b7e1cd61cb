//! Length checks over descriptors paired with their request values.

use crate::descriptor::FieldDescriptor;
use crate::measure::{MeasureOptions, measure};
use crate::request::RequestBody;
use crate::violation::{FieldViolation, into_messages};
use serde_json::Value;

/// A descriptor paired with the value found in the request (if any).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnrichedField<'a> {
    descriptor: &'a FieldDescriptor,
    value: Option<&'a Value>,
}

impl<'a> EnrichedField<'a> {
    /// Pair a descriptor with a value.
    #[must_use]
    pub const fn new(descriptor: &'a FieldDescriptor, value: Option<&'a Value>) -> Self {
        Self { descriptor, value }
    }

    /// The descriptor.
    #[must_use]
    pub const fn descriptor(&self) -> &'a FieldDescriptor {
        self.descriptor
    }

    /// The value copied from the request; `None` when the key was absent.
    #[must_use]
    pub const fn value(&self) -> Option<&'a Value> {
        self.value
    }
}

/// Pair each descriptor with `request[variable]`. Inputs are left untouched.
#[must_use]
pub fn enrich<'a>(request: &'a RequestBody, fields: &'a [FieldDescriptor]) -> Vec<EnrichedField<'a>> {
    fields
        .iter()
        .map(|descriptor| EnrichedField::new(descriptor, request.get(descriptor.variable())))
        .collect()
}

/// Length violation for a single field; the minimum is checked first.
#[must_use]
pub fn size_violation(field: &EnrichedField<'_>, options: MeasureOptions) -> Option<FieldViolation> {
    let length = measure(field.value, options)?;
    let descriptor = field.descriptor;
    if length < descriptor.min() {
        Some(FieldViolation::TooShort {
            variable: descriptor.variable().into(),
            label: descriptor.variable_text().into(),
            min: descriptor.min(),
            length,
        })
    } else if length > descriptor.max() {
        Some(FieldViolation::TooLong {
            variable: descriptor.variable().into(),
            label: descriptor.variable_text().into(),
            max: descriptor.max(),
            length,
        })
    } else {
        None
    }
}

/// Typed length failures, in field order (at most one per field).
#[must_use]
pub fn size_violations(fields: &[EnrichedField<'_>], options: MeasureOptions) -> Vec<FieldViolation> {
    fields
        .iter()
        .filter_map(|field| size_violation(field, options))
        .collect()
}

/// Minimum/maximum messages for every out-of-range field, in order.
#[must_use]
pub fn check_size(fields: &[EnrichedField<'_>], options: MeasureOptions) -> Vec<String> {
    into_messages(size_violations(fields, options))
}
