//! Cart persistence.

use tokio::sync::Mutex;
use tracing::instrument;

use supplement_store_core::{Cart, CartId};

use super::{Storage, StorageError};

const KEY_PREFIX: &str = "cart-storage.";

/// Repository for visitor carts.
///
/// Mutations are serialized so a change and its write land together.
pub struct CartRepository {
    storage: Storage,
    write_lock: Mutex<()>,
}

impl CartRepository {
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    /// Load a cart. An unknown cart ID is an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the stored cart cannot be read.
    #[instrument(skip(self))]
    pub async fn load(&self, cart_id: &CartId) -> Result<Cart, StorageError> {
        Ok(self.storage.get(&cart_key(cart_id)).await?.unwrap_or_default())
    }

    /// Apply a mutation and persist the result if the cart changed.
    ///
    /// `mutate` returns whether it changed the cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be read or written.
    #[instrument(skip(self, mutate))]
    pub async fn update<F>(&self, cart_id: &CartId, mutate: F) -> Result<Cart, StorageError>
    where
        F: FnOnce(&mut Cart) -> bool + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut cart = self.load(cart_id).await?;
        if mutate(&mut cart) {
            self.save(cart_id, &cart).await?;
        }
        Ok(cart)
    }

    /// Empty a cart and drop its blob.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the blob cannot be removed.
    #[instrument(skip(self))]
    pub async fn clear(&self, cart_id: &CartId) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        self.storage.delete(&cart_key(cart_id)).await
    }

    /// Load a cart and drop its blob in one step.
    ///
    /// Of two concurrent takes on the same cart, only one sees the items.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be read or removed.
    #[instrument(skip(self))]
    pub async fn take(&self, cart_id: &CartId) -> Result<Cart, StorageError> {
        let _guard = self.write_lock.lock().await;
        let cart = self.load(cart_id).await?;
        if !cart.is_empty() {
            self.storage.delete(&cart_key(cart_id)).await?;
        }
        Ok(cart)
    }

    /// Put back a cart removed by [`take`](Self::take).
    ///
    /// Items added since the take are kept alongside the restored ones.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be read or written.
    #[instrument(skip(self, cart))]
    pub async fn restore(&self, cart_id: &CartId, cart: Cart) -> Result<Cart, StorageError> {
        self.update(cart_id, move |current| {
            let mut changed = false;
            for item in cart.items() {
                changed |= current.add(item.product.clone());
            }
            changed
        })
        .await
    }

    async fn save(&self, cart_id: &CartId, cart: &Cart) -> Result<(), StorageError> {
        if cart.is_empty() {
            self.storage.delete(&cart_key(cart_id)).await
        } else {
            self.storage.put(&cart_key(cart_id), cart).await
        }
    }
}

/// Storage key of a cart.
pub(crate) fn cart_key(cart_id: &CartId) -> String {
    format!("{KEY_PREFIX}{cart_id}")
}
