//! Seed the order book with demo orders from a YAML file.
//!
//! Customers go through the same validation as the checkout form, and
//! product IDs are resolved against the catalogue, so seeded orders look
//! exactly like ones placed through the storefront.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use supplement_store_core::{
    Cart, Catalog, CheckoutForm, Order, OrderBook, OrderStatus, ProductId, place_order,
};

use super::{CliError, open_orders};

/// Demo orders bundled with the CLI.
const BUNDLED_ORDERS: &str = include_str!("../../seed/orders.yaml");

/// Top-level seed file.
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    pub orders: Vec<SeedOrder>,
}

/// One demo order.
#[derive(Debug, Deserialize)]
pub struct SeedOrder {
    pub customer: CheckoutForm,
    pub products: Vec<String>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub days_ago: i64,
}

/// Seed orders from `file` (or the bundled demo set).
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, if any order is
/// invalid, or if the order book cannot be saved.
pub async fn orders(file: Option<&Path>, clear_existing: bool) -> Result<(), CliError> {
    let content = match file {
        Some(path) => {
            info!(path = %path.display(), "Loading demo orders from file");
            tokio::fs::read_to_string(path).await?
        }
        None => BUNDLED_ORDERS.to_owned(),
    };
    let seed: SeedFile = serde_yaml::from_str(&content)?;
    info!(orders = seed.orders.len(), "Parsed seed file");

    let orders = build_orders(&seed, &Catalog::standard(), Utc::now())?;

    let repo = open_orders().await?;
    let mut book = if clear_existing {
        warn!("Discarding existing orders");
        OrderBook::default()
    } else {
        repo.read(OrderBook::clone).await
    };

    // Oldest first so the newest ends up at the front
    for order in orders {
        book.add(order);
    }
    let total = book.len();
    repo.replace(book).await?;

    info!("Seeding complete! {total} order(s) in the book");
    Ok(())
}

/// Turn seed entries into orders, oldest first.
///
/// # Errors
///
/// Returns `CliError::InvalidSeedOrder` naming the first bad entry.
pub fn build_orders(
    seed: &SeedFile,
    catalog: &Catalog,
    now: DateTime<Utc>,
) -> Result<Vec<Order>, CliError> {
    let mut orders = Vec::with_capacity(seed.orders.len());

    for (index, entry) in seed.orders.iter().enumerate() {
        let invalid = |reason: String| CliError::InvalidSeedOrder { index, reason };

        let customer = entry.customer.validate().map_err(|errors| {
            let reasons: Vec<String> = errors
                .iter()
                .map(|(field, message)| format!("{}: {message}", field.as_str()))
                .collect();
            invalid(reasons.join(", "))
        })?;

        let mut cart = Cart::new();
        for id in &entry.products {
            let product = catalog
                .find(&ProductId::new(id.as_str()))
                .ok_or_else(|| invalid(format!("unknown product {id}")))?;
            cart.add(product.clone());
        }

        let placed_at = now - Duration::days(entry.days_ago.max(0));
        let mut order = place_order(&cart, customer, placed_at)
            .ok_or_else(|| invalid("no products".to_owned()))?;
        order.status = entry.status;
        orders.push(order);
    }

    orders.sort_by_key(|o| o.created_at);
    Ok(orders)
}
