// lib/src/storage_engine/config.rs

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use models::errors::{HealthError, HealthResult};
use models::identifiers::{DEFAULT_JURISDICTION_CODE, DEFAULT_PATIENT_ID_WIDTH};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DATA_DIRECTORY: &str = "/var/lib/healthwatch";
pub const DEFAULT_CACHE_CAPACITY: u64 = 256 * 1024 * 1024;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageEngineType {
    #[default]
    Sled,
    /// A temporary sled database that is discarded when the handle drops.
    InMemory,
}

impl FromStr for StorageEngineType {
    type Err = HealthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sled" => Ok(StorageEngineType::Sled),
            "in_memory" | "inmemory" | "memory" => Ok(StorageEngineType::InMemory),
            _ => Err(HealthError::ConfigurationError(format!("Unknown storage engine type: {}", s))),
        }
    }
}

impl fmt::Display for StorageEngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageEngineType::Sled => f.write_str("sled"),
            StorageEngineType::InMemory => f.write_str("in_memory"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub storage_engine_type: StorageEngineType,
    pub data_directory: PathBuf,
    pub cache_capacity: u64,
    /// Prefix of the staff-facing patient id, e.g. `KL` in `KL000042`.
    pub jurisdiction_code: String,
    pub patient_id_width: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            storage_engine_type: StorageEngineType::Sled,
            data_directory: PathBuf::from(DEFAULT_DATA_DIRECTORY),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            jurisdiction_code: DEFAULT_JURISDICTION_CODE.to_string(),
            patient_id_width: DEFAULT_PATIENT_ID_WIDTH,
        }
    }
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        StorageConfig {
            storage_engine_type: StorageEngineType::InMemory,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> HealthResult<()> {
        if self.jurisdiction_code.trim().is_empty() {
            return Err(HealthError::ConfigurationError("jurisdiction_code must not be empty".to_string()));
        }
        if self.patient_id_width == 0 || self.patient_id_width > 18 {
            return Err(HealthError::ConfigurationError(format!(
                "patient_id_width must be between 1 and 18, got {}",
                self.patient_id_width
            )));
        }
        Ok(())
    }
}
