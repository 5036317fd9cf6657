pub mod api;
pub mod app_config;
pub mod cross_check;
pub mod database;
pub mod observability;

pub use api::{ApiConfig, AuthConfig};
pub use app_config::AppConfig;
pub use cross_check::CrossCheckConfig;
pub use database::DatabaseConfig;
pub use observability::{LogFormat, ObservabilityConfig};
