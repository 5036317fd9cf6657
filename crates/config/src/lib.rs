//! Layered configuration for the course platform.
//!
//! Values are resolved in this order, later sources winning:
//! built-in defaults, a TOML file, then `COURSE_PLATFORM__*` environment
//! variables (`__` separates nested keys, e.g. `COURSE_PLATFORM__API__BIND_ADDRESS`).

pub mod models;

pub use models::{
    ApiConfig, AppConfig, AuthConfig, CrossCheckConfig, DatabaseConfig, LogFormat,
    ObservabilityConfig,
};
