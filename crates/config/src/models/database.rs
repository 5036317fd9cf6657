use serde::{Deserialize, Serialize};

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://course-platform.db".to_string(),
            max_connections: 10,
            min_connections: 1,
            connection_timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Validate database configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.url.is_empty() {
            return Err(anyhow::anyhow!("database url must not be empty"));
        }

        if !self.url.starts_with("sqlite:") {
            return Err(anyhow::anyhow!("database url must be a sqlite url"));
        }

        if self.max_connections == 0 {
            return Err(anyhow::anyhow!("max_connections must be greater than 0"));
        }

        if self.min_connections > self.max_connections {
            return Err(anyhow::anyhow!(
                "min_connections must not exceed max_connections"
            ));
        }

        if self.connection_timeout_seconds == 0 {
            return Err(anyhow::anyhow!(
                "connection_timeout_seconds must be greater than 0"
            ));
        }

        Ok(())
    }
}
