// src/config.rs
// Runtime configuration loaded from YAML

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, WatcherError};
use crate::log_debug;
use crate::modules::water_level::{DEVICE_NAME_CAPACITY, RECORD_SIZE, UNASSIGNED_OUTLET, URL_CAPACITY};
use crate::util::http::ClientOptions;
use crate::util::storage::DEFAULT_REGION_SIZE;

pub const DEFAULT_CONFIG_PATH: &str = "./level-watcher.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    pub database_path: PathBuf,
    #[serde(default = "default_region_size")]
    pub region_size: usize,
    #[serde(default)]
    pub storage_offset: usize,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default)]
    pub receive_timeout_ms: Option<u64>,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default)]
    pub bootstrap: Option<BootstrapConfig>,
}

/// Values written to the stored record on startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    #[serde(default)]
    pub power: bool,
    pub url: String,
    #[serde(default = "default_outlet")]
    pub outlet: i32,
    #[serde(default)]
    pub device_name: Option<String>,
}

fn default_region_size() -> usize {
    DEFAULT_REGION_SIZE
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_connect_timeout_ms() -> u64 {
    1000
}

fn default_outlet() -> i32 {
    UNASSIGNED_OUTLET
}

fn invalid(field: &str, error: impl Into<String>) -> WatcherError {
    WatcherError::Config {
        field: field.to_string(),
        error: error.into(),
    }
}

impl WatcherConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Parse and validate
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: WatcherConfig = serde_yaml::from_str(yaml)?;
        log_debug!("Loaded config: {:?}", config);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(invalid("database_path", "Cannot be empty"));
        }

        if self.region_size < RECORD_SIZE {
            return Err(invalid(
                "region_size",
                format!("Must be at least {} bytes", RECORD_SIZE),
            ));
        }

        let fits = self
            .storage_offset
            .checked_add(RECORD_SIZE)
            .is_some_and(|end| end <= self.region_size);
        if !fits {
            return Err(invalid(
                "storage_offset",
                format!(
                    "Record of {} bytes does not fit in region of {} bytes",
                    RECORD_SIZE, self.region_size
                ),
            ));
        }

        if self.poll_interval_secs == 0 {
            return Err(invalid("poll_interval_secs", "Must be at least 1"));
        }

        if self.connect_timeout_ms == 0 {
            return Err(invalid("connect_timeout_ms", "Must be at least 1"));
        }

        if self.receive_timeout_ms == Some(0) {
            return Err(invalid("receive_timeout_ms", "Must be at least 1 when set"));
        }

        if let Some(bootstrap) = &self.bootstrap {
            Self::validate_bootstrap(bootstrap)?;
        }

        Ok(())
    }

    fn validate_bootstrap(b: &BootstrapConfig) -> Result<()> {
        if b.url.len() > URL_CAPACITY {
            return Err(invalid(
                "bootstrap.url",
                format!("Cannot exceed {} bytes", URL_CAPACITY),
            ));
        }

        if b.outlet < UNASSIGNED_OUTLET {
            return Err(invalid(
                "bootstrap.outlet",
                format!("Must be {} (unassigned) or an outlet index", UNASSIGNED_OUTLET),
            ));
        }

        if let Some(name) = &b.device_name {
            if name.len() > DEVICE_NAME_CAPACITY {
                return Err(invalid(
                    "bootstrap.device_name",
                    format!("Cannot exceed {} bytes", DEVICE_NAME_CAPACITY),
                ));
            }
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            receive_timeout: self.receive_timeout_ms.map(Duration::from_millis),
        }
    }
}
