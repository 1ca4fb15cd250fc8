// rest_api/src/config.rs

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use lib::storage_engine::StorageConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_REST_API_HOST: &str = "127.0.0.1";
pub const DEFAULT_REST_API_PORT: u16 = 8082;
/// Read from the working directory when no `--config` path is given.
pub const DEFAULT_CONFIG_FILE: &str = "healthwatch.yaml";
pub const ENV_PREFIX: &str = "HEALTHWATCH";

/// Represents the configuration for the REST API server and the storage it opens.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RestApiConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageConfig,
}

impl Default for RestApiConfig {
    fn default() -> Self {
        RestApiConfig {
            host: DEFAULT_REST_API_HOST.to_string(),
            port: DEFAULT_REST_API_PORT,
            storage: StorageConfig::default(),
        }
    }
}

impl RestApiConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Layers built-in defaults, the YAML file and `HEALTHWATCH_` environment
/// variables (nested keys joined with `__`), later layers winning.
pub fn load_rest_api_config(config_file: Option<&Path>) -> Result<RestApiConfig> {
    let file = match config_file {
        Some(path) => File::from(path).format(FileFormat::Yaml).required(true),
        None => File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false),
    };
    let settings = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to read REST API configuration")?;

    let config: RestApiConfig = settings
        .try_deserialize()
        .context("Failed to parse REST API configuration")?;
    config.storage.validate().context("Invalid storage configuration")?;
    Ok(config)
}
