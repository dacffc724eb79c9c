//! Orders, the order book reducer and admin order queries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{CartItem, OrderSummary};
use crate::types::{Email, OrderId, OrderStatus, Price};

/// Orders shown per admin list page.
pub const ORDERS_PER_PAGE: usize = 10;

/// Contact and shipping details captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub zip: String,
}

impl CustomerDetails {
    /// One-line shipping address.
    #[must_use]
    pub fn shipping_address(&self) -> String {
        format!("{}, {} {}", self.address, self.city, self.zip)
    }
}

/// A placed order.
///
/// Money fields are frozen at checkout time and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer: CustomerDetails,
    pub items: Vec<CartItem>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
}

impl Order {
    /// Build a pending order from cart items and the summary computed for them.
    #[must_use]
    pub fn new(
        customer: CustomerDetails,
        items: Vec<CartItem>,
        summary: OrderSummary,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: OrderId::from_timestamp(created_at),
            customer,
            items,
            status: OrderStatus::Pending,
            created_at,
            subtotal: summary.subtotal,
            shipping: summary.shipping,
            total: summary.total,
        }
    }

    /// Sum of the line items (excluding shipping).
    #[must_use]
    pub fn line_items_total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Creation date (UTC calendar day).
    #[must_use]
    pub fn created_on(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    fn matches_text(&self, needle: &str) -> bool {
        self.id.as_str().to_lowercase().contains(needle)
            || self.customer.name.to_lowercase().contains(needle)
            || self
                .items
                .iter()
                .any(|i| i.product.name.to_lowercase().contains(needle))
    }
}

/// All orders, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    orders: Vec<Order>,
}

impl OrderBook {
    /// An empty order book.
    #[must_use]
    pub const fn new() -> Self {
        Self { orders: Vec::new() }
    }

    /// Every order, most recently added first.
    #[must_use]
    pub fn all(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Prepend an order and return the ID it was stored under.
    ///
    /// Order IDs are unique within the book. If the order's ID is already
    /// taken (two checkouts in the same millisecond), the next free
    /// `ORD-<millis>` is used instead.
    pub fn add(&mut self, mut order: Order) -> OrderId {
        let mut millis = order.created_at.timestamp_millis();
        while self.contains(&order.id) {
            millis += 1;
            order.id = OrderId::from_millis(millis);
        }
        let id = order.id.clone();
        self.orders.insert(0, order);
        id
    }

    /// Whether an order with this ID exists.
    #[must_use]
    pub fn contains(&self, id: &OrderId) -> bool {
        self.orders.iter().any(|o| &o.id == id)
    }

    /// Look up an order by ID.
    #[must_use]
    pub fn find(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.id == id)
    }

    /// Replace an order's status. Any status may follow any other.
    ///
    /// Returns `false` if no order has that ID.
    pub fn update_status(&mut self, id: &OrderId, status: OrderStatus) -> bool {
        match self.orders.iter_mut().find(|o| &o.id == id) {
            Some(order) => {
                order.status = status;
                true
            }
            None => false,
        }
    }

    /// Run an admin query against the book.
    #[must_use]
    pub fn query(&self, query: &OrderQuery, today: NaiveDate) -> OrderPage<'_> {
        query.run(&self.orders, today)
    }
}

/// Why a creation-date range was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DateRangeError {
    #[error("End date cannot be earlier than start date")]
    EndBeforeStart,
    #[error("Start date cannot be in the future")]
    StartInFuture,
    #[error("End date cannot be in the future")]
    EndInFuture,
}

/// Validate an inclusive creation-date range against `today`.
///
/// # Errors
///
/// Returns the first violated rule: end before start, then a start in the
/// future, then an end in the future.
pub fn validate_date_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(), DateRangeError> {
    if let (Some(from), Some(to)) = (from, to) {
        if to < from {
            return Err(DateRangeError::EndBeforeStart);
        }
    }
    if from.is_some_and(|d| d > today) {
        return Err(DateRangeError::StartInFuture);
    }
    if to.is_some_and(|d| d > today) {
        return Err(DateRangeError::EndInFuture);
    }
    Ok(())
}

/// Admin order list criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQuery {
    /// Matches order ID, customer name or any product name (case-insensitive).
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
    /// Inclusive start date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive end date.
    pub date_to: Option<NaiveDate>,
    /// 1-based page number; `0` is treated as `1`.
    pub page: usize,
}

/// One page of an order query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPage<'a> {
    pub orders: Vec<&'a Order>,
    /// Orders matching the query across all pages.
    pub total_matching: usize,
    pub page: usize,
    pub total_pages: usize,
    /// Set when the date range was rejected; `orders` is then empty.
    pub date_error: Option<DateRangeError>,
}

impl OrderQuery {
    /// Whether an order passes every active predicate.
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            if !order.matches_text(&search.to_lowercase()) {
                return false;
            }
        }
        if self.status.is_some_and(|s| s != order.status) {
            return false;
        }
        let created_on = order.created_on();
        if self.date_from.is_some_and(|from| created_on < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| created_on > to) {
            return false;
        }
        true
    }

    fn run<'a>(&self, orders: &'a [Order], today: NaiveDate) -> OrderPage<'a> {
        let page = self.page.max(1);

        if let Err(e) = validate_date_range(self.date_from, self.date_to, today) {
            return OrderPage {
                orders: Vec::new(),
                total_matching: 0,
                page,
                total_pages: 0,
                date_error: Some(e),
            };
        }

        let matching: Vec<&Order> = orders.iter().filter(|o| self.matches(o)).collect();
        let total_matching = matching.len();
        let total_pages = total_matching.div_ceil(ORDERS_PER_PAGE);
        let orders = matching
            .into_iter()
            .skip((page - 1).saturating_mul(ORDERS_PER_PAGE))
            .take(ORDERS_PER_PAGE)
            .collect();

        OrderPage {
            orders,
            total_matching,
            page,
            total_pages,
            date_error: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::Cart;
    use crate::catalog::Catalog;
    use crate::types::ProductId;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn customer(name: &str) -> CustomerDetails {
        CustomerDetails {
            name: name.to_string(),
            email: Email::parse("buyer@example.com").unwrap(),
            phone: "555-123-4567".to_string(),
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            zip: "12345".to_string(),
        }
    }

    fn order(name: &str, product: &str, at: &str) -> Order {
        let catalog = Catalog::standard();
        let mut cart = Cart::new();
        cart.add(catalog.find(&ProductId::new(product)).cloned().unwrap());
        let created_at = DateTime::parse_from_rfc3339(at).unwrap().with_timezone(&Utc);
        Order::new(customer(name), cart.items().to_vec(), cart.summary(), created_at)
    }

    #[test]
    fn test_add_prepends() {
        let mut book = OrderBook::new();
        book.add(order("Ann", "prod-1", "2026-01-01T10:00:00Z"));
        book.add(order("Bob", "prod-2", "2026-01-02T10:00:00Z"));
        let names: Vec<&str> = book.all().iter().map(|o| o.customer.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Ann"]);
    }

    #[test]
    fn test_same_millisecond_orders_get_distinct_ids() {
        let mut book = OrderBook::new();
        let first = book.add(order("Ann", "prod-1", "2026-01-01T10:00:00Z"));
        let second = book.add(order("Bob", "prod-2", "2026-01-01T10:00:00Z"));
        assert_ne!(first, second);
        assert_eq!(second.as_str(), "ORD-1767261600001");
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_update_status_any_transition() {
        let mut book = OrderBook::new();
        let o = order("Ann", "prod-1", "2026-01-01T10:00:00Z");
        let id = o.id.clone();
        book.add(o);

        assert!(book.update_status(&id, OrderStatus::Delivered));
        assert!(book.update_status(&id, OrderStatus::Pending));
        assert_eq!(book.find(&id).map(|o| o.status), Some(OrderStatus::Pending));
        assert!(!book.update_status(&OrderId::new("ORD-0"), OrderStatus::Shipped));
    }

    #[test]
    fn test_order_total_is_line_items_plus_shipping() {
        let o = order("Ann", "prod-9", "2026-01-01T10:00:00Z"); // $19.99
        assert_eq!(o.total, o.line_items_total() + o.shipping);
        assert_eq!(o.total.display(), "$25.98");
    }

    #[test]
    fn test_search_matches_id_customer_and_product() {
        let mut book = OrderBook::new();
        book.add(order("Ann Smith", "prod-10", "2026-01-01T10:00:00Z"));
        book.add(order("Bob Jones", "prod-1", "2026-01-02T10:00:00Z"));
        let today = day("2026-02-01");

        let by_customer = OrderQuery {
            search: Some("smith".into()),
            ..OrderQuery::default()
        };
        assert_eq!(book.query(&by_customer, today).total_matching, 1);

        let by_product = OrderQuery {
            search: Some("WHEY".into()),
            ..OrderQuery::default()
        };
        let page = book.query(&by_product, today);
        assert_eq!(page.orders.first().map(|o| o.customer.name.as_str()), Some("Bob Jones"));

        let by_id = OrderQuery {
            search: Some("ord-".into()),
            ..OrderQuery::default()
        };
        assert_eq!(book.query(&by_id, today).total_matching, 2);
    }

    #[test]
    fn test_date_range_is_inclusive_on_calendar_days() {
        let mut book = OrderBook::new();
        book.add(order("Ann", "prod-1", "2026-01-01T23:59:00Z"));
        book.add(order("Bob", "prod-1", "2026-01-05T00:01:00Z"));
        book.add(order("Cid", "prod-1", "2026-01-09T12:00:00Z"));
        let query = OrderQuery {
            date_from: Some(day("2026-01-01")),
            date_to: Some(day("2026-01-05")),
            ..OrderQuery::default()
        };
        let page = book.query(&query, day("2026-02-01"));
        assert_eq!(page.total_matching, 2);
        assert_eq!(page.date_error, None);
    }

    #[test]
    fn test_invalid_date_range_yields_error_and_no_orders() {
        let mut book = OrderBook::new();
        book.add(order("Ann", "prod-1", "2026-01-01T10:00:00Z"));
        let query = OrderQuery {
            date_from: Some(day("2026-01-10")),
            date_to: Some(day("2026-01-01")),
            ..OrderQuery::default()
        };
        let page = book.query(&query, day("2026-02-01"));
        assert!(page.orders.is_empty());
        assert_eq!(page.date_error, Some(DateRangeError::EndBeforeStart));
    }

    #[test]
    fn test_validate_date_range_rules() {
        let today = day("2026-03-01");
        assert_eq!(validate_date_range(None, None, today), Ok(()));
        assert_eq!(validate_date_range(Some(today), Some(today), today), Ok(()));
        assert_eq!(
            validate_date_range(Some(day("2026-03-02")), None, today),
            Err(DateRangeError::StartInFuture)
        );
        assert_eq!(
            validate_date_range(None, Some(day("2026-03-02")), today),
            Err(DateRangeError::EndInFuture)
        );
        assert_eq!(
            validate_date_range(Some(day("2026-03-05")), Some(day("2026-03-02")), today),
            Err(DateRangeError::EndBeforeStart)
        );
        assert_eq!(
            DateRangeError::EndBeforeStart.to_string(),
            "End date cannot be earlier than start date"
        );
    }

    #[test]
    fn test_pagination() {
        let mut book = OrderBook::new();
        for i in 0..23 {
            book.add(order(&format!("Customer {i}"), "prod-1", "2026-01-01T10:00:00Z"));
        }
        let today = day("2026-02-01");

        let first = book.query(&OrderQuery::default(), today);
        assert_eq!(first.page, 1);
        assert_eq!(first.orders.len(), 10);
        assert_eq!(first.total_pages, 3);

        let last = book.query(
            &OrderQuery {
                page: 3,
                ..OrderQuery::default()
            },
            today,
        );
        assert_eq!(last.orders.len(), 3);

        let beyond = book.query(
            &OrderQuery {
                page: 9,
                ..OrderQuery::default()
            },
            today,
        );
        assert!(beyond.orders.is_empty());
        assert_eq!(beyond.total_matching, 23);
    }

    #[test]
    fn test_huge_page_is_empty() {
        let mut book = OrderBook::new();
        book.add(order("Ann", "prod-1", "2026-01-01T10:00:00Z"));

        let page = book.query(
            &OrderQuery {
                page: usize::MAX,
                ..OrderQuery::default()
            },
            day("2026-02-01"),
        );
        assert!(page.orders.is_empty());
        assert_eq!(page.page, usize::MAX);
        assert_eq!(page.total_matching, 1);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_status_filter() {
        let mut book = OrderBook::new();
        let o = order("Ann", "prod-1", "2026-01-01T10:00:00Z");
        let id = o.id.clone();
        book.add(o);
        book.add(order("Bob", "prod-1", "2026-01-02T10:00:00Z"));
        book.update_status(&id, OrderStatus::Shipped);

        let query = OrderQuery {
            status: Some(OrderStatus::Shipped),
            ..OrderQuery::default()
        };
        let page = book.query(&query, day("2026-02-01"));
        assert_eq!(page.orders.iter().map(|o| o.id.clone()).collect::<Vec<_>>(), vec![id]);
    }
}
