//! # fieldcheck-domain
//!
//! Existence and length validation for request payloads.
//!
//! A check runs in three steps: [`check_existence`] over the raw request,
//! [`enrich`] to pair each [`FieldDescriptor`] with its value, then
//! [`check_size`]. [`validate`] composes them with the historical
//! size-only result; [`validate_with`] takes a [`ValidationMode`].
//!
//! ```
//! use fieldcheck_domain::{DescriptorError, FieldDescriptor, RequestBody, validate};
//!
//! let fields = vec![FieldDescriptor::new("name", "Name", 3, 10)?];
//! let request = RequestBody::new().with("name", "Al");
//! assert_eq!(
//!     validate(&request, &fields),
//!     vec!["Name must be a minimum of 3 letters."]
//! );
//! # Ok::<(), DescriptorError>(())
//! ```

pub mod descriptor;
pub mod existence;
pub mod measure;
pub mod request;
pub mod rules;
pub mod size;
pub mod validate;
pub mod violation;

pub use descriptor::{
    BoundsError, DescriptorError, FieldDescriptor, LengthBounds, RawFieldDescriptor,
};
pub use existence::{check_existence, existence_violations, is_missing};
pub use measure::{AbsentValuePolicy, LengthUnit, MeasureOptions, measure};
pub use request::{RequestBody, RequestBodyError};
pub use rules::FieldRules;
pub use size::{EnrichedField, check_size, enrich, size_violation, size_violations};
pub use validate::{
    ValidationMode, ValidationOptions, validate, validate_all, validate_existence_only,
    validate_violations, validate_with,
};
pub use violation::{FieldViolation, into_messages};

/// Returns the domain crate version.
#[must_use]
pub const fn domain_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
