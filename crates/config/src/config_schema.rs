//! JSON Schema exports for config and descriptor DTOs.

use crate::CheckerConfig;
use fieldcheck_domain::RawFieldDescriptor;
use schemars::{Schema, schema_for};

/// JSON Schema for the checker config file.
#[must_use]
pub fn checker_config_schema() -> Schema {
    schema_for!(CheckerConfig)
}

/// JSON Schema for a single field descriptor.
#[must_use]
pub fn field_descriptor_schema() -> Schema {
    schema_for!(RawFieldDescriptor)
}
