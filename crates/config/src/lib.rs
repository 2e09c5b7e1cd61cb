//! # fieldcheck-config
//!
//! Checker configuration: file schema, env overrides and loading.
//! This crate depends on `domain` and `shared` only.

/// JSON Schema exports.
pub mod config_schema;
/// Environment variable parsing and merging.
pub mod env;
/// Config loading helpers (file + env).
pub mod load;
/// Configuration schema types and helpers.
pub mod schema;

pub use config_schema::{checker_config_schema, field_descriptor_schema};
pub use env::{
    CheckerEnv, ENV_ABSENT_VALUES, ENV_LENGTH_UNIT, ENV_MODE, EnvParseError, apply_env_overrides,
};
pub use load::{
    ConfigFormat, load_checker_config_from_path, load_checker_config_from_sources,
    load_checker_config_std_env, to_pretty_json, to_pretty_toml,
};
pub use schema::{
    CURRENT_CONFIG_VERSION, CheckerConfig, CheckerSettings, ConfigSchemaError, MAX_FIELDS,
    ValidatedCheckerConfig, ValidationConfig, parse_checker_config_json,
    parse_checker_config_toml,
};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
