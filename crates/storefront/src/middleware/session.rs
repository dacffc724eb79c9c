//! Session middleware configuration.
//!
//! Sessions carry the visitor's cart ID and are kept as JSON blobs in the
//! same [`Storage`] as carts and orders, so a visitor's cart survives a
//! restart. Expired sessions are swept periodically along with their carts.

use std::time::Duration;

use async_trait::async_trait;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, ExpiredDeletion, SessionStore};
use tower_sessions::{Expiry, SessionManagerLayer};

use supplement_store_core::CartId;

use crate::config::StorefrontConfig;
use crate::models::session_keys;
use crate::storage::carts::cart_key;
use crate::storage::{Storage, StorageError};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "ss_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// How often expired sessions are swept.
pub const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

const SESSION_KEY_PREFIX: &str = "session.";

/// Create the session layer over `storage`.
#[must_use]
pub fn create_session_layer(
    config: &StorefrontConfig,
    storage: Storage,
) -> SessionManagerLayer<StorageSessionStore> {
    SessionManagerLayer::new(StorageSessionStore::new(storage))
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Session store keeping one `session.<id>` blob per session.
#[derive(Clone, Debug)]
pub struct StorageSessionStore {
    storage: Storage,
}

impl StorageSessionStore {
    #[must_use]
    pub const fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Delete sessions that expired before `now`, and the carts they point to.
    ///
    /// Unreadable session blobs are skipped. Returns how many sessions were
    /// deleted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the sessions cannot be listed or deleted.
    pub async fn delete_expired_before(&self, now: OffsetDateTime) -> Result<usize, StorageError> {
        let mut deleted = 0;
        for key in self.storage.keys(SESSION_KEY_PREFIX).await? {
            let record = match self.storage.get::<Record>(&key).await {
                Ok(Some(record)) => record,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Skipping unreadable session");
                    continue;
                }
            };
            if !is_expired(&record, now) {
                continue;
            }
            if let Some(cart_id) = cart_id(&record) {
                self.storage.delete(&cart_key(&cart_id)).await?;
            }
            self.storage.delete(&key).await?;
            deleted += 1;
        }
        Ok(deleted)
    }

    /// Sweep expired sessions every `period` until the runtime shuts down.
    pub fn spawn_expiry_sweep(self, period: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                match self.delete_expired_before(OffsetDateTime::now_utc()).await {
                    Ok(0) => {}
                    Ok(deleted) => tracing::info!(deleted, "Expired sessions removed"),
                    Err(e) => tracing::warn!(error = %e, "Session sweep failed"),
                }
            }
        })
    }
}

#[async_trait]
impl SessionStore for StorageSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self
            .storage
            .get::<Record>(&session_key(&record.id))
            .await?
            .is_some()
        {
            record.id = Id::default();
        }
        self.save(record).await
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        Ok(self.storage.put(&session_key(&record.id), record).await?)
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let record: Option<Record> = self.storage.get(&session_key(session_id)).await?;
        Ok(record.filter(|r| !is_expired(r, OffsetDateTime::now_utc())))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        Ok(self.storage.delete(&session_key(session_id)).await?)
    }
}

#[async_trait]
impl ExpiredDeletion for StorageSessionStore {
    async fn delete_expired(&self) -> session_store::Result<()> {
        self.delete_expired_before(OffsetDateTime::now_utc())
            .await
            .map(|_| ())
            .map_err(Into::into)
    }
}

impl From<StorageError> for session_store::Error {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Json(e) => Self::Decode(e.to_string()),
            other => Self::Backend(other.to_string()),
        }
    }
}

fn session_key(id: &Id) -> String {
    format!("{SESSION_KEY_PREFIX}{id}")
}

fn is_expired(record: &Record, now: OffsetDateTime) -> bool {
    record.expiry_date <= now
}

fn cart_id(record: &Record) -> Option<CartId> {
    record
        .data
        .get(session_keys::CART_ID)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use tower_sessions::cookie::time::Duration as TimeDuration;

    use super::*;

    fn record(cart: &str, expires_in: TimeDuration) -> Record {
        Record {
            id: Id::default(),
            data: HashMap::from([(session_keys::CART_ID.to_string(), serde_json::json!(cart))]),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_saved_session_loads_from_reopened_store() {
        let storage = Storage::memory();
        let mut live = record("cart-1", TimeDuration::hours(1));
        StorageSessionStore::new(storage.clone())
            .create(&mut live)
            .await
            .unwrap();

        let loaded = StorageSessionStore::new(storage).load(&live.id).await.unwrap();

        assert_eq!(loaded.as_ref().and_then(cart_id), Some(CartId::new("cart-1")));
    }

    #[tokio::test]
    async fn test_expired_session_does_not_load() {
        let store = StorageSessionStore::new(Storage::memory());
        let stale = record("cart-1", TimeDuration::hours(-1));
        store.save(&stale).await.unwrap();

        assert!(store.load(&stale.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleted_session_is_gone() {
        let store = StorageSessionStore::new(Storage::memory());
        let live = record("cart-1", TimeDuration::hours(1));
        store.save(&live).await.unwrap();

        store.delete(&live.id).await.unwrap();

        assert!(store.load(&live.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sweep_removes_expired_sessions_and_their_carts() {
        let storage = Storage::memory();
        let store = StorageSessionStore::new(storage.clone());
        let stale = record("old-cart", TimeDuration::hours(-1));
        let live = record("new-cart", TimeDuration::hours(1));
        store.save(&stale).await.unwrap();
        store.save(&live).await.unwrap();
        storage.put(&cart_key(&CartId::new("old-cart")), &"stale").await.unwrap();
        storage.put(&cart_key(&CartId::new("new-cart")), &"live").await.unwrap();

        let deleted = store
            .delete_expired_before(OffsetDateTime::now_utc())
            .await
            .unwrap();

        assert_eq!(deleted, 1);
        assert_eq!(storage.keys("session.").await.unwrap(), vec![session_key(&live.id)]);
        assert_eq!(
            storage.keys("cart-storage.").await.unwrap(),
            vec![cart_key(&CartId::new("new-cart"))]
        );
    }
}
