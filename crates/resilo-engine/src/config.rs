use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Runner configuration. Everything has a default aimed at the local
/// storefront, so a bare invocation works against a dev server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub base_url: String,
    pub webdriver_url: String,
    pub artifact_dir: PathBuf,
    pub strategy_timeout_ms: u64,
    pub poll_interval_ms: u64,
    pub customer: Credentials,
    pub admin: Credentials,
    /// Password used for accounts the registration flow creates.
    pub registration_password: String,
    /// Product the catalog/cart flows exercise.
    pub sample_product_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            webdriver_url: "http://localhost:4444".to_string(),
            artifact_dir: PathBuf::from("artifacts"),
            strategy_timeout_ms: 2000,
            poll_interval_ms: 250,
            customer: Credentials {
                email: "test@example.com".to_string(),
                password: "password123".to_string(),
            },
            admin: Credentials {
                email: "admin@example.com".to_string(),
                password: "admin123".to_string(),
            },
            registration_password: "Test@123456".to_string(),
            sample_product_id: "123".to_string(),
        }
    }
}

impl RunConfig {
    pub fn strategy_timeout(&self) -> Duration {
        Duration::from_millis(self.strategy_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load `./resilo.yaml` when present, else the defaults.
    pub async fn load_default() -> Result<RunConfig, ConfigError> {
        let local_config = PathBuf::from("./resilo.yaml");
        if local_config.exists() {
            return Self::load_from(&local_config).await;
        }
        Ok(RunConfig::default())
    }

    pub async fn load_from(path: &Path) -> Result<RunConfig, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: RunConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}
