//! Supplement Store Core - Domain types and state reducers.
//!
//! This crate provides the types and pure logic shared by all Supplement Store
//! components:
//! - `storefront` - Server-rendered shop and admin order view
//! - `cli` - Command-line tools for inspecting the catalogue and orders
//!
//! # Architecture
//!
//! The core crate contains only types and synchronous reducers - no I/O, no
//! persistence, no HTTP clients. Persistence lives in the storefront crate,
//! which wraps these reducers and saves them after every mutation.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, categories and statuses
//! - [`product`] / [`catalog`] - The static product catalogue
//! - [`filter`] - Product search, filtering and sorting
//! - [`cart`] - Cart reducer and order summary (shipping rules)
//! - [`order`] - Order book reducer and admin order queries
//! - [`checkout`] - Checkout form validation and order placement
//! - [`image`] - Deterministic product image URLs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod filter;
pub mod image;
pub mod order;
pub mod product;
pub mod types;

pub use cart::{Cart, CartItem, OrderSummary};
pub use catalog::Catalog;
pub use checkout::{CheckoutField, CheckoutForm, FieldErrors, place_order};
pub use filter::{ProductFilter, SortKey};
pub use order::{
    CustomerDetails, DateRangeError, ORDERS_PER_PAGE, Order, OrderBook, OrderPage, OrderQuery,
    validate_date_range,
};
pub use product::Product;
pub use types::*;
