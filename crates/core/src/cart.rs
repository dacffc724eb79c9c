//! Cart reducer and order summary.
//!
//! Every operation is total: unknown products, repeated adds and
//! out-of-range quantities are absorbed rather than reported. Each product
//! appears at most once, with a quantity of at most
//! [`MAX_QUANTITY_PER_PRODUCT`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::{Price, ProductId};

/// Maximum quantity of any single product in a cart.
pub const MAX_QUANTITY_PER_PRODUCT: u32 = 1;

/// Subtotals strictly above this ship free.
pub const FREE_SHIPPING_THRESHOLD_CENTS: i64 = 5000;

/// Flat shipping charge below the free-shipping threshold.
pub const FLAT_SHIPPING_CENTS: i64 = 599;

/// A product and how many of it are in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Items in the order they were added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the product is already in the cart.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.iter().any(|i| &i.product.id == product_id)
    }

    /// Add one of a product. No-op if it is already in the cart.
    ///
    /// Returns `true` if the cart changed.
    pub fn add(&mut self, product: Product) -> bool {
        if self.contains(&product.id) {
            return false;
        }
        self.items.push(CartItem {
            product,
            quantity: MAX_QUANTITY_PER_PRODUCT,
        });
        true
    }

    /// Remove a product. No-op if it is not in the cart.
    ///
    /// Returns `true` if the cart changed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| &i.product.id != product_id);
        self.items.len() != before
    }

    /// Set a product's quantity, clamped to `0..=MAX_QUANTITY_PER_PRODUCT`.
    /// Zero removes the item; a product not in the cart is left out.
    ///
    /// Returns `true` if the cart changed.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(product_id);
        }
        let quantity = quantity.min(MAX_QUANTITY_PER_PRODUCT);
        match self.items.iter_mut().find(|i| &i.product.id == product_id) {
            Some(item) if item.quantity != quantity => {
                item.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of price × quantity over all items.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of quantities over all items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Subtotal, shipping and total for the cart as it stands now.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        OrderSummary::for_subtotal(self.subtotal(), self.item_count())
    }
}

/// Money breakdown shown on the cart and checkout pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
    pub item_count: u32,
}

impl OrderSummary {
    /// Apply the shipping rule to a subtotal.
    ///
    /// An empty cart has nothing to ship and is charged nothing.
    #[must_use]
    pub fn for_subtotal(subtotal: Price, item_count: u32) -> Self {
        let shipping = if item_count == 0 || subtotal.amount > free_shipping_threshold() {
            Price::zero()
        } else {
            Price::from_cents(FLAT_SHIPPING_CENTS)
        };
        Self {
            subtotal,
            shipping,
            total: subtotal + shipping,
            item_count,
        }
    }

    /// Whether shipping is free.
    #[must_use]
    pub fn free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }

    /// How much more to spend before shipping is free, if anything.
    #[must_use]
    pub fn amount_until_free_shipping(&self) -> Option<Price> {
        let threshold = Price::from_cents(FREE_SHIPPING_THRESHOLD_CENTS);
        (self.subtotal.amount < threshold.amount).then(|| threshold - self.subtotal)
    }
}

fn free_shipping_threshold() -> Decimal {
    Decimal::new(FREE_SHIPPING_THRESHOLD_CENTS, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn product(id: &str) -> Product {
        Catalog::standard()
            .find(&ProductId::new(id))
            .cloned()
            .unwrap_or_else(|| panic!("missing {id}"))
    }

    #[test]
    fn test_adding_twice_keeps_quantity_one() {
        let catalog = Catalog::standard();
        for p in catalog.products() {
            let mut cart = Cart::new();
            assert!(cart.add(p.clone()));
            assert!(!cart.add(p.clone()));
            assert_eq!(cart.items().len(), 1);
            assert_eq!(cart.item_count(), 1);
        }
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add(product("prod-1"));
        let before = cart.clone();
        assert!(!cart.remove(&ProductId::new("prod-2")));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_set_quantity_clamps_and_zero_removes() {
        let mut cart = Cart::new();
        cart.add(product("prod-1"));

        assert!(!cart.set_quantity(&ProductId::new("prod-1"), 5));
        assert_eq!(cart.item_count(), 1);

        assert!(cart.set_quantity(&ProductId::new("prod-1"), 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_on_absent_product_does_not_add() {
        let mut cart = Cart::new();
        assert!(!cart.set_quantity(&ProductId::new("prod-3"), 1));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtotal_tracks_mutations() {
        let mut cart = Cart::new();
        cart.add(product("prod-1"));
        cart.add(product("prod-6"));
        cart.add(product("prod-9"));
        assert_eq!(cart.subtotal(), Price::from_cents(4999 + 2499 + 1999));

        cart.remove(&ProductId::new("prod-6"));
        assert_eq!(cart.subtotal(), Price::from_cents(4999 + 1999));

        let expected: Price = cart.items().iter().map(|i| i.product.price.times(i.quantity)).sum();
        assert_eq!(cart.subtotal(), expected);

        cart.clear();
        assert_eq!(cart.subtotal(), Price::zero());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_summary_free_shipping_example() {
        let mut cart = Cart::new();
        cart.add(product("prod-1")); // $49.99
        cart.add(product("prod-6")); // $24.99
        let summary = cart.summary();
        assert_eq!(summary.subtotal.display(), "$74.98");
        assert_eq!(summary.shipping.display(), "$0.00");
        assert_eq!(summary.total.display(), "$74.98");
        assert!(summary.free_shipping());
        assert_eq!(summary.amount_until_free_shipping(), None);
    }

    #[test]
    fn test_summary_below_threshold_charges_flat_rate() {
        let mut cart = Cart::new();
        cart.add(product("prod-1")); // $49.99
        let summary = cart.summary();
        assert_eq!(summary.shipping, Price::from_cents(599));
        assert_eq!(summary.total.display(), "$55.98");
        assert_eq!(summary.amount_until_free_shipping(), Some(Price::from_cents(1)));
    }

    #[test]
    fn test_exactly_fifty_is_not_free() {
        let summary = OrderSummary::for_subtotal(Price::from_cents(5000), 2);
        assert!(!summary.free_shipping());
        assert_eq!(summary.amount_until_free_shipping(), None);
    }

    #[test]
    fn test_cart_round_trips_through_json() {
        let mut cart = Cart::new();
        cart.add(product("prod-2"));
        let json = serde_json::to_string(&cart).unwrap_or_default();
        let restored: Cart = serde_json::from_str(&json).unwrap_or_default();
        assert_eq!(restored, cart);
    }
}
