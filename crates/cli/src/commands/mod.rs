//! Command implementations.

pub mod orders;
pub mod products;
pub mod seed;

use thiserror::Error;

use supplement_store_core::DateRangeError;
use supplement_store_storefront::config::{ConfigError, StorefrontConfig};
use supplement_store_storefront::storage::{OrderRepository, Storage, StorageError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Environment configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reading or writing the data directory failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// No order has the given ID.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// The requested date range is not allowed.
    #[error("Invalid date range: {0}")]
    DateRange(#[from] DateRangeError),

    /// The seed file could not be read.
    #[error("Could not read seed file: {0}")]
    Io(#[from] std::io::Error),

    /// The seed file is not valid YAML for demo orders.
    #[error("Invalid seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A seeded order is unusable.
    #[error("Invalid seed order #{index}: {reason}")]
    InvalidSeedOrder { index: usize, reason: String },
}

/// Open the order repository in the configured data directory.
async fn open_orders() -> Result<OrderRepository, CliError> {
    let config = StorefrontConfig::from_env()?;
    tracing::debug!(data_dir = %config.data_dir.display(), "Opening data directory");
    let storage = Storage::open_dir(&config.data_dir).await?;
    Ok(OrderRepository::load(storage).await?)
}
