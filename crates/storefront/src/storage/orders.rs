//! Order persistence.
//!
//! The order book is loaded once at startup and kept in memory. Every
//! mutation is applied to a copy, written to storage, and only then swapped
//! in, so a failed write leaves the in-memory book untouched.

use tokio::sync::RwLock;
use tracing::instrument;

use supplement_store_core::{Order, OrderBook, OrderId, OrderStatus};

use super::{Storage, StorageError};

/// Storage key of the order book.
pub const ORDER_STORAGE_KEY: &str = "order-storage";

/// Repository for placed orders.
pub struct OrderRepository {
    storage: Storage,
    book: RwLock<OrderBook>,
}

impl OrderRepository {
    /// Load the order book from storage. A missing blob is an empty book.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the stored book is unreadable or corrupt.
    #[instrument(skip(storage))]
    pub async fn load(storage: Storage) -> Result<Self, StorageError> {
        let book: OrderBook = storage.get(ORDER_STORAGE_KEY).await?.unwrap_or_default();
        tracing::info!(orders = book.len(), "Order book loaded");
        Ok(Self {
            storage,
            book: RwLock::new(book),
        })
    }

    /// Store a new order at the front of the book and return its final ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the book cannot be written.
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn add(&self, order: Order) -> Result<OrderId, StorageError> {
        let mut book = self.book.write().await;
        let mut next = book.clone();
        let id = next.add(order);
        self.storage.put(ORDER_STORAGE_KEY, &next).await?;
        *book = next;
        Ok(id)
    }

    /// Change an order's status. Returns `false` for an unknown ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the book cannot be written.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<bool, StorageError> {
        let mut book = self.book.write().await;
        let mut next = book.clone();
        if !next.update_status(id, status) {
            return Ok(false);
        }
        self.storage.put(ORDER_STORAGE_KEY, &next).await?;
        *book = next;
        Ok(true)
    }

    /// Replace the whole book, e.g. when seeding.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the book cannot be written.
    pub async fn replace(&self, next: OrderBook) -> Result<(), StorageError> {
        let mut book = self.book.write().await;
        self.storage.put(ORDER_STORAGE_KEY, &next).await?;
        *book = next;
        Ok(())
    }

    /// A copy of one order.
    pub async fn find(&self, id: &OrderId) -> Option<Order> {
        self.book.read().await.find(id).cloned()
    }

    /// Run a read-only closure against the current book.
    pub async fn read<R>(&self, f: impl FnOnce(&OrderBook) -> R) -> R {
        f(&*self.book.read().await)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use supplement_store_core::{Cart, Catalog, CheckoutForm, ProductId, place_order};

    fn sample_order() -> Order {
        let mut cart = Cart::new();
        cart.add(
            Catalog::standard()
                .find(&ProductId::new("prod-3"))
                .cloned()
                .unwrap(),
        );
        let details = CheckoutForm {
            name: "Sam Lee".into(),
            email: "sam@example.com".into(),
            phone: "555 123 4567".into(),
            address: "9 Oak Ave".into(),
            city: "Austin".into(),
            zip: "73301".into(),
        }
        .validate()
        .unwrap();
        place_order(&cart, details, Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_blob_is_empty_book() {
        let repo = OrderRepository::load(Storage::memory()).await.unwrap();
        assert_eq!(repo.read(OrderBook::len).await, 0);
    }

    #[tokio::test]
    async fn test_orders_survive_reload() {
        let storage = Storage::memory();
        let repo = OrderRepository::load(storage.clone()).await.unwrap();
        let id = repo.add(sample_order()).await.unwrap();
        assert!(repo.update_status(&id, OrderStatus::Shipped).await.unwrap());

        let reloaded = OrderRepository::load(storage).await.unwrap();
        let found = reloaded.find(&id).await.unwrap();
        assert_eq!(found.status, OrderStatus::Shipped);
    }

    #[tokio::test]
    async fn test_update_unknown_order() {
        let repo = OrderRepository::load(Storage::memory()).await.unwrap();
        let updated = repo
            .update_status(&OrderId::new("ORD-1"), OrderStatus::Cancelled)
            .await
            .unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn test_corrupt_book_refuses_to_load() {
        let storage = Storage::memory();
        storage.put(ORDER_STORAGE_KEY, &"not an order book").await.unwrap();
        assert!(OrderRepository::load(storage).await.is_err());
    }
}
