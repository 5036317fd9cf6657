use serde::{Deserialize, Serialize};

/// One year.
pub const MAX_JWT_EXPIRATION_HOURS: i64 = 24 * 365;

fn default_jwt_secret() -> String {
    "change-this-secret-before-deploying-anywhere".to_string()
}

fn default_jwt_expiration_hours() -> i64 {
    24
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    pub bind_address: String,
    pub cors_enabled: bool,
    pub cors_origins: Vec<String>,
    pub request_timeout_seconds: u64,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            cors_enabled: true,
            cors_origins: vec!["*".to_string()],
            request_timeout_seconds: 30,
            auth: AuthConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthConfig {
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_jwt_expiration_hours")]
    pub jwt_expiration_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_expiration_hours: default_jwt_expiration_hours(),
        }
    }
}

impl ApiConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bind_address.is_empty() {
            return Err(anyhow::anyhow!("bind address must not be empty"));
        }
        if !self.bind_address.contains(':') {
            return Err(anyhow::anyhow!("bind address must be host:port"));
        }

        if self.request_timeout_seconds == 0 {
            return Err(anyhow::anyhow!(
                "request_timeout_seconds must be greater than 0"
            ));
        }

        if self.cors_enabled && self.cors_origins.is_empty() {
            return Err(anyhow::anyhow!(
                "cors_origins must list at least one origin when cors is enabled"
            ));
        }
        self.auth.validate()?;

        Ok(())
    }
}

impl AuthConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.jwt_secret.is_empty() {
            return Err(anyhow::anyhow!("jwt secret must not be empty"));
        }

        if self.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!("jwt secret must be at least 32 characters"));
        }

        if self.jwt_expiration_hours <= 0 {
            return Err(anyhow::anyhow!("jwt expiration must be greater than 0"));
        }

        if self.jwt_expiration_hours > MAX_JWT_EXPIRATION_HOURS {
            return Err(anyhow::anyhow!(
                "jwt expiration must not exceed {MAX_JWT_EXPIRATION_HOURS} hours"
            ));
        }

        Ok(())
    }
}
