//! Existence checks: a required key must be present and not `""`.

use crate::descriptor::FieldDescriptor;
use crate::request::RequestBody;
use crate::violation::{FieldViolation, into_messages};
use serde_json::Value;

/// Returns true when `descriptor`'s key is absent or maps to the empty string.
///
/// Only the exact empty string counts. `0`, `false`, `null`, `[]` and
/// whitespace-only strings are present.
#[must_use]
pub fn is_missing(request: &RequestBody, descriptor: &FieldDescriptor) -> bool {
    match request.get(descriptor.variable()) {
        None => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(_) => false,
    }
}

/// Typed existence failures, in descriptor order.
#[must_use]
pub fn existence_violations(
    request: &RequestBody,
    fields: &[FieldDescriptor],
) -> Vec<FieldViolation> {
    fields
        .iter()
        .filter(|descriptor| is_missing(request, descriptor))
        .map(|descriptor| FieldViolation::Missing {
            variable: descriptor.variable().into(),
            label: descriptor.variable_text().into(),
        })
        .collect()
}

/// `"please enter <label>"` for every missing or empty field, in order.
#[must_use]
pub fn check_existence(request: &RequestBody, fields: &[FieldDescriptor]) -> Vec<String> {
    into_messages(existence_violations(request, fields))
}
