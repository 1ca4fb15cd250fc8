// lib/src/lib.rs

pub mod storage_engine;

pub use storage_engine::{
    create_storage, open_sled_db, HealthStorage, SledHealthStorage, StorageConfig, StorageEngineType,
};
