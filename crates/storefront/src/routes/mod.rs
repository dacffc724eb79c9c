//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Home page (bestsellers, categories, FAQ)
//! GET  /health                    - Health check
//!
//! # Products
//! GET  /products                  - Product listing (search, category, bestseller, min_price, max_price, sort)
//! GET  /products/{id}             - Product detail
//!
//! # Cart (HTMX fragments, redirects for plain form posts)
//! GET  /cart                      - Cart page
//! POST /cart/add                  - Add to cart (returns count badge, triggers cart-updated)
//! POST /cart/update               - Set quantity (returns cart_items fragment)
//! POST /cart/remove               - Remove item (returns cart_items fragment)
//! POST /cart/clear                - Empty cart (returns cart_items fragment)
//! GET  /cart/count                - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout                  - Checkout form (empty cart redirects to /cart)
//! POST /checkout                  - Place order, redirect to the order page
//!
//! # Admin
//! GET  /admin/orders              - Order list (search, status, date_from, date_to, page)
//! GET  /admin/orders/{id}         - Order detail
//! POST /admin/orders/{id}/status  - Update order status
//!
//! # API
//! GET  /api/images                - Image search proxy
//! ```

pub mod admin;
pub mod api;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod products;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    routing::{get, post},
};

use crate::filters;
use crate::state::AppState;

/// "Not found" page for unknown products and orders.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub title: &'static str,
    pub back_href: &'static str,
    pub back_label: &'static str,
}

impl NotFoundTemplate {
    #[must_use]
    pub const fn new(title: &'static str, back_href: &'static str, back_label: &'static str) -> Self {
        Self {
            title,
            back_href,
            back_label,
        }
    }
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(admin::orders::index))
        .route("/orders/{id}", get(admin::orders::show))
        .route("/orders/{id}/status", post(admin::orders::update_status))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::show).post(checkout::submit))
        .nest("/admin", admin_routes())
        .route("/api/images", get(api::images::search))
}
