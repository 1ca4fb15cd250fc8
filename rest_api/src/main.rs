// rest_api/src/main.rs

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use lib::storage_engine::{StorageEngineType, create_storage};
use log::{info, warn};
use rest_api::config::{RestApiConfig, load_rest_api_config};
use rest_api::start_server;

#[derive(Debug, Parser)]
#[command(name = "healthwatch-api", version, about = "Migrant-worker health surveillance REST API")]
struct Args {
    /// YAML configuration file.
    #[arg(long, env = "HEALTHWATCH_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    /// Directory of the on-disk database.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Storage engine: `sled` or `in_memory`.
    #[arg(long)]
    storage_engine: Option<StorageEngineType>,
    /// Shorthand for `--storage-engine in_memory`.
    #[arg(long, conflicts_with = "storage_engine")]
    in_memory: bool,
}

impl Args {
    fn apply_to(self, config: &mut RestApiConfig) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(dir) = self.data_dir {
            config.storage.data_directory = dir;
        }
        if let Some(engine) = self.storage_engine {
            config.storage.storage_engine_type = engine;
        }
        if self.in_memory {
            config.storage.storage_engine_type = StorageEngineType::InMemory;
        }
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C, shutting down."),
        Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = load_rest_api_config(args.config.as_deref())?;
    args.apply_to(&mut config);
    info!("Opening {} storage", config.storage.storage_engine_type);

    let storage = create_storage(&config.storage).context("Failed to open storage")?;
    start_server(&config, storage, shutdown_signal()).await
}
