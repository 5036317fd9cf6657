use serde::{Deserialize, Serialize};

/// Periodic cross-check lifecycle scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrossCheckConfig {
    pub enabled: bool,
    pub scan_interval_seconds: u64,
}

impl Default for CrossCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scan_interval_seconds: 60,
        }
    }
}

impl CrossCheckConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.enabled && self.scan_interval_seconds == 0 {
            return Err(anyhow::anyhow!(
                "scan_interval_seconds must be greater than 0"
            ));
        }
        Ok(())
    }
}
