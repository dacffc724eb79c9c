//! Order inspection and status updates.

use chrono::{NaiveDate, Utc};
use tracing::info;

use supplement_store_core::{Order, OrderId, OrderQuery, OrderStatus};

use super::{CliError, open_orders};

/// List orders matching the filters, one page at a time.
///
/// # Errors
///
/// Returns an error if the data directory cannot be read or the date range
/// is rejected.
pub async fn list(
    search: Option<String>,
    status: Option<OrderStatus>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    page: usize,
) -> Result<(), CliError> {
    let repo = open_orders().await?;
    let query = OrderQuery {
        search,
        status,
        date_from,
        date_to,
        page,
    };
    let today = Utc::now().date_naive();

    repo.read(|book| {
        let result = book.query(&query, today);
        if let Some(err) = result.date_error {
            return Err(CliError::DateRange(err));
        }

        info!(
            "{} order(s) matching, page {} of {}",
            result.total_matching, result.page, result.total_pages
        );
        for order in result.orders {
            info!("  {}", summary_line(order));
        }
        Ok(())
    })
    .await
}

/// Print one order in full.
///
/// # Errors
///
/// Returns an error if the data directory cannot be read or the order does
/// not exist.
pub async fn show(id: &str) -> Result<(), CliError> {
    let repo = open_orders().await?;
    let order = repo
        .find(&OrderId::new(id))
        .await
        .ok_or_else(|| CliError::OrderNotFound(id.to_owned()))?;

    info!("Order {} ({})", order.id, order.status.label());
    info!("Placed:   {}", order.created_at.format("%Y-%m-%d %H:%M UTC"));
    info!("Customer: {} <{}>", order.customer.name, order.customer.email);
    info!("Phone:    {}", order.customer.phone);
    info!("Ship to:  {}", order.customer.shipping_address());
    info!("Items:");
    for item in &order.items {
        info!(
            "  {} x {} @ {} = {}",
            item.quantity,
            item.product.name,
            item.product.price.display(),
            item.line_total().display(),
        );
    }
    info!("Subtotal: {}", order.subtotal.display());
    info!("Shipping: {}", order.shipping.display());
    info!("Total:    {}", order.total.display());
    Ok(())
}

/// Change an order's status.
///
/// # Errors
///
/// Returns an error if the order does not exist or the book cannot be saved.
pub async fn set_status(id: &str, status: OrderStatus) -> Result<(), CliError> {
    let repo = open_orders().await?;
    if !repo.update_status(&OrderId::new(id), status).await? {
        return Err(CliError::OrderNotFound(id.to_owned()));
    }
    info!("Order {id} is now {}", status.label());
    Ok(())
}

/// One-line order summary for listings.
fn summary_line(order: &Order) -> String {
    format!(
        "{}  {}  {:<10}  {:>9}  {} ({} item(s))",
        order.id,
        order.created_at.format("%Y-%m-%d"),
        order.status.label(),
        order.total.display(),
        order.customer.name,
        order.item_count(),
    )
}
