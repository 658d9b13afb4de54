use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::DEFAULT_PAGE_SIZE;
use crate::error::ConfigError;

pub const BASE_URL_ENV: &str = "CATALOG_API_BASE_URL";
const APP_DIR: &str = "artifact-catalog";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub items_per_page: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            request_timeout_seconds: 10,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            items_per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// `~/.config/artifact-catalog` on Linux. Created on first use.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?.join(APP_DIR);
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

impl AppConfig {
    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("config.json"))
    }

    /// Loads the default config file, falling back to (and trying to write) the defaults.
    pub fn load() -> Self {
        let loaded = Self::config_file_path().and_then(|path| Self::load_from(&path));
        let config = match loaded {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "unable to load configuration, using defaults");
                let default_config = Self::default();
                if let Err(save_err) = default_config.save() {
                    warn!(error = %save_err, "unable to save default configuration");
                }
                default_config
            }
        };
        config.with_env_overrides()
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::config_file_path()?)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                self.api.base_url = base_url.trim().to_string();
            }
        }
        self
    }
}
