//! # fieldcheck-shared
//!
//! Foundational types used by every other fieldcheck crate:
//!
//! - [`ErrorEnvelope`] and [`ErrorCode`] for failures that prevent a check
//!   from running (bad descriptors, config, env, I/O)
//! - [`Validated`] proofs for values checked at a boundary
//!
//! This crate has no workspace dependencies.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod errors;
pub mod invariants;

pub use errors::{ErrorClass, ErrorCode, ErrorEnvelope, ErrorKind, ErrorMetadata};
pub use invariants::Validated;

/// Returns the shared crate version.
#[must_use]
pub const fn shared_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
