// lib/src/storage_engine/mod.rs

pub mod config;
pub mod sled_storage;
pub mod storage_engine;
pub mod storage_utils;

pub use config::{StorageConfig, StorageEngineType};
pub use sled_storage::SledHealthStorage;
pub use storage_engine::HealthStorage;

use std::sync::Arc;

use log::info;
use models::errors::{HealthError, HealthResult};

/// Opens the sled database described by `config`. The in-memory engine gets a
/// temporary database that is removed when the last handle drops.
pub fn open_sled_db(config: &StorageConfig) -> HealthResult<sled::Db> {
    let sled_config = match config.storage_engine_type {
        StorageEngineType::Sled => {
            std::fs::create_dir_all(&config.data_directory).map_err(|e| {
                HealthError::StorageError(format!(
                    "Failed to create data directory {}: {}",
                    config.data_directory.display(),
                    e
                ))
            })?;
            sled::Config::new().path(&config.data_directory)
        }
        StorageEngineType::InMemory => sled::Config::new().temporary(true),
    };
    let db = sled_config.cache_capacity(config.cache_capacity).open()?;
    Ok(db)
}

/// Validates the configuration and opens the storage it selects.
pub fn create_storage(config: &StorageConfig) -> HealthResult<Arc<dyn HealthStorage>> {
    config.validate()?;
    let db = open_sled_db(config)?;
    let storage = SledHealthStorage::new(db, config)?;
    match config.storage_engine_type {
        StorageEngineType::Sled => info!("Opened sled storage at {}", config.data_directory.display()),
        StorageEngineType::InMemory => info!("Opened temporary in-memory storage"),
    }
    Ok(Arc::new(storage))
}
