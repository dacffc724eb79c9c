//! Application state shared across handlers.

use std::sync::Arc;

use supplement_store_core::Catalog;

use crate::config::StorefrontConfig;
use crate::images::ImageClient;
use crate::storage::{CartRepository, OrderRepository, Storage, StorageError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalogue, the cart and order repositories, and the image client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storage: Storage,
    catalog: Catalog,
    carts: CartRepository,
    orders: OrderRepository,
    images: ImageClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Loads the order book from `storage`. The catalogue is taken as given;
    /// refresh its images before calling this if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted order book cannot be loaded.
    pub async fn new(
        config: StorefrontConfig,
        storage: Storage,
        catalog: Catalog,
    ) -> Result<Self, StorageError> {
        let images = ImageClient::new(&config.images);
        let orders = OrderRepository::load(storage.clone()).await?;
        let carts = CartRepository::new(storage.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                storage,
                catalog,
                carts,
                orders,
                images,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the blob storage behind carts, orders and sessions.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.inner.storage
    }

    /// Get a reference to the product catalogue.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the cart repository.
    #[must_use]
    pub fn carts(&self) -> &CartRepository {
        &self.inner.carts
    }

    /// Get a reference to the order repository.
    #[must_use]
    pub fn orders(&self) -> &OrderRepository {
        &self.inner.orders
    }

    /// Get a reference to the Unsplash image client.
    #[must_use]
    pub fn images(&self) -> &ImageClient {
        &self.inner.images
    }
}
