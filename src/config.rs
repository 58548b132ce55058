//! Configuration types.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Service configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the per-feature mean/std CSV exported with the classifier.
    pub stats_path: PathBuf,
    /// Path to the serialized classifier artifact.
    pub classifier_path: PathBuf,
    /// Address the HTTP surface binds to.
    pub bind_addr: SocketAddr,
    /// Oracle model identifier for the conversational path.
    pub model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stats_path: PathBuf::from("./data/means_stds.csv"),
            classifier_path: PathBuf::from("./model/classifier.json"),
            bind_addr: "0.0.0.0:8080".parse().expect("static addr"),
            model: "claude-sonnet-4-20250514".to_string(),
        }
    }
}

impl AppConfig {
    /// Build from `LOAN_SCREEN_*` environment variables, falling back to the
    /// defaults above for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("LOAN_SCREEN_STATS_PATH") {
            config.stats_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("LOAN_SCREEN_CLASSIFIER_PATH") {
            config.classifier_path = PathBuf::from(path);
        }
        if let Ok(addr) = std::env::var("LOAN_SCREEN_ADDR") {
            config.bind_addr = addr.parse().map_err(|e| ConfigError::InvalidValue {
                key: "LOAN_SCREEN_ADDR".to_string(),
                message: format!("{e}"),
            })?;
        }
        if let Ok(model) = std::env::var("LOAN_SCREEN_MODEL") {
            config.model = model;
        }

        Ok(config)
    }
}
