//! Durable key-value storage for carts and orders.
//!
//! Each key maps to one JSON blob. On disk a blob lives at
//! `<data_dir>/<key>.json` and is replaced atomically (written to a uniquely
//! named temporary sibling, then renamed over the original). Tests and tools
//! that don't need durability use the in-memory backend.
//!
//! # Keys
//!
//! - `order-storage` - The order book
//! - `cart-storage.<cart-id>` - One visitor's cart
//! - `session.<session-id>` - One visitor's session record
//!
//! Keys are restricted to `[A-Za-z0-9._-]` so they are always safe file names.

pub mod carts;
pub mod orders;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::RwLock;

pub use carts::CartRepository;
pub use orders::OrderRepository;

/// Errors from the storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing a blob failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A blob could not be encoded or decoded.
    #[error("storage data error: {0}")]
    Json(#[from] serde_json::Error),

    /// The key contains characters outside `[A-Za-z0-9._-]`.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// JSON blob store.
///
/// Cheap to clone; clones share the same backend.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<Backend>,
}

enum Backend {
    Dir(PathBuf),
    Memory(RwLock<HashMap<String, String>>),
}

impl Storage {
    /// Store blobs as files under `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub async fn open_dir(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self {
            backend: Arc::new(Backend::Dir(dir)),
        })
    }

    /// Keep blobs in process memory.
    #[must_use]
    pub fn memory() -> Self {
        Self {
            backend: Arc::new(Backend::Memory(RwLock::new(HashMap::new()))),
        }
    }

    /// Read and decode a blob. A missing blob is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid key, an unreadable file or a blob that
    /// does not decode as `T`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        validate_key(key)?;
        let raw = match self.backend.as_ref() {
            Backend::Dir(dir) => match tokio::fs::read_to_string(blob_path(dir, key)).await {
                Ok(raw) => Some(raw),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                Err(e) => return Err(e.into()),
            },
            Backend::Memory(map) => map.read().await.get(key).cloned(),
        };
        raw.map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(Into::into)
    }

    /// Encode and write a blob, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid key or a failed write.
    pub async fn put<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        validate_key(key)?;
        let raw = serde_json::to_string(value)?;
        match self.backend.as_ref() {
            Backend::Dir(dir) => {
                let path = blob_path(dir, key);
                let tmp = dir.join(format!("{key}.json.{}.tmp", uuid::Uuid::new_v4()));
                tokio::fs::write(&tmp, raw).await?;
                tokio::fs::rename(&tmp, &path).await?;
            }
            Backend::Memory(map) => {
                map.write().await.insert(key.to_string(), raw);
            }
        }
        Ok(())
    }

    /// Remove a blob. Removing a missing blob is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid key or a failed delete.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        match self.backend.as_ref() {
            Backend::Dir(dir) => match tokio::fs::remove_file(blob_path(dir, key)).await {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e.into()),
                _ => {}
            },
            Backend::Memory(map) => {
                map.write().await.remove(key);
            }
        }
        Ok(())
    }
}

impl Storage {
    /// Keys starting with `prefix`, sorted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the data directory cannot be listed.
    pub async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut keys = match self.backend.as_ref() {
            Backend::Dir(dir) => {
                let mut keys = Vec::new();
                let mut entries = tokio::fs::read_dir(dir).await?;
                while let Some(entry) = entries.next_entry().await? {
                    let name = entry.file_name();
                    let Some(key) = name.to_str().and_then(|n| n.strip_suffix(".json")) else {
                        continue;
                    };
                    if key.starts_with(prefix) && validate_key(key).is_ok() {
                        keys.push(key.to_string());
                    }
                }
                keys
            }
            Backend::Memory(map) => map
                .read()
                .await
                .keys()
                .filter(|k| k.starts_with(prefix))
                .cloned()
                .collect(),
        };
        keys.sort();
        Ok(keys)
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.backend.as_ref() {
            Backend::Dir(dir) => f.debug_tuple("Storage::Dir").field(dir).finish(),
            Backend::Memory(_) => f.write_str("Storage::Memory"),
        }
    }
}

fn blob_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{key}.json"))
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
