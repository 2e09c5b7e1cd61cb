//! Descriptor sets declared on typed form structs.

use crate::descriptor::{DescriptorError, FieldDescriptor};

/// Types that declare the descriptors for their request fields.
///
/// Usually derived with `#[derive(fieldcheck_derive::FieldRules)]`:
///
/// ```ignore
/// #[derive(fieldcheck_derive::FieldRules)]
/// struct SignupForm {
///     #[field(text = "Name", min = 3, max = 10)]
///     name: String,
///     #[field(variable = "emailAddress", text = "Email", min = 5, max = 64)]
///     email: String,
/// }
/// ```
pub trait FieldRules {
    /// Descriptors in declaration order.
    fn field_descriptors() -> Result<Vec<FieldDescriptor>, DescriptorError>;
}
