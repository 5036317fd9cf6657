use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{
    api::ApiConfig, cross_check::CrossCheckConfig, database::DatabaseConfig,
    observability::ObservabilityConfig,
};

pub const ENV_PREFIX: &str = "COURSE_PLATFORM";

const DEFAULT_CONFIG_PATHS: [&str; 3] = [
    "config/course-platform.toml",
    "course-platform.toml",
    "/etc/course-platform/config.toml",
];

/// System configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cross_check: CrossCheckConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load configuration from defaults, a TOML file and environment variables.
    ///
    /// An explicit `config_path` must exist. Without one, the first existing
    /// entry of the default search list is used, and a missing file is fine.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let defaults = ConfigBuilder::try_from(&AppConfig::default())
            .context("failed to build default configuration")?;
        let mut builder = ConfigBuilder::builder().add_source(defaults);

        if let Some(path) = config_path {
            if !Path::new(path).exists() {
                return Err(anyhow::anyhow!("config file does not exist: {path}"));
            }
            builder = builder.add_source(File::new(path, FileFormat::Toml));
        } else if let Some(path) = DEFAULT_CONFIG_PATHS
            .iter()
            .find(|path| Path::new(path).exists())
        {
            builder = builder.add_source(File::new(path, FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("api.cors_origins"),
        );

        let config: AppConfig = builder
            .build()
            .context("failed to build configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(toml_str).context("failed to parse TOML config")?;

        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config as TOML")
    }

    pub fn validate(&self) -> Result<()> {
        self.database
            .validate()
            .context("database config is invalid")?;
        self.api.validate().context("api config is invalid")?;
        self.cross_check
            .validate()
            .context("cross_check config is invalid")?;
        self.observability
            .validate()
            .context("observability config is invalid")?;

        Ok(())
    }
}
