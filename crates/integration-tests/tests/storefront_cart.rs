//! Integration tests for the cart pages and HTMX fragments.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use supplement_store_core::{Catalog, ProductId};
use supplement_store_integration_tests::{TestApp, temp_data_dir};
use supplement_store_storefront::storage::Storage;

async fn cart_count(app: &mut TestApp) -> String {
    let response = app.get("/cart/count").await;
    assert_eq!(response.status, StatusCode::OK);
    response.body.trim().to_owned()
}

// =============================================================================
// Adding
// =============================================================================

#[tokio::test]
async fn test_new_visitor_has_empty_cart() {
    let mut app = TestApp::new().await;

    assert_eq!(cart_count(&mut app).await, "");

    let page = app.get("/cart").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_plain_add_redirects_to_cart() {
    let mut app = TestApp::new().await;

    let response = app.add_to_cart("prod-1").await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/cart"));
    assert!(cart_count(&mut app).await.contains(">1<"));
}

#[tokio::test]
async fn test_htmx_add_returns_badge_and_trigger() {
    let mut app = TestApp::new().await;

    let response = app.htmx_post_form("/cart/add", "product_id=prod-6").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("HX-Trigger"), Some("cart-updated"));
    assert!(response.body.contains("cart-badge"));
    assert!(response.body.contains(">1<"));
}

#[tokio::test]
async fn test_adding_same_product_twice_keeps_quantity_one() {
    let mut app = TestApp::new().await;

    app.add_to_cart("prod-1").await;
    let second = app.htmx_post_form("/cart/add", "product_id=prod-1").await;

    assert_eq!(second.status, StatusCode::OK);
    assert!(second.body.contains(">1<"));
}

#[tokio::test]
async fn test_adding_unknown_product_is_not_found() {
    let mut app = TestApp::new().await;

    let response = app.add_to_cart("prod-999").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(cart_count(&mut app).await, "");
}

#[tokio::test]
async fn test_in_cart_product_shows_already_in_cart() {
    let mut app = TestApp::new().await;

    let before = app.get("/products/prod-3").await;
    assert!(before.body.contains("Add to Cart"));

    app.add_to_cart("prod-3").await;

    let after = app.get("/products/prod-3").await;
    assert_eq!(after.status, StatusCode::OK);
    assert!(after.body.contains("Already in Cart"));
}

// =============================================================================
// Totals
// =============================================================================

#[tokio::test]
async fn test_cart_over_threshold_ships_free() {
    let mut app = TestApp::new().await;

    app.add_to_cart("prod-1").await; // $49.99
    app.add_to_cart("prod-6").await; // $24.99

    let page = app.get("/cart").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("$74.98"));
    assert!(page.body.contains("Free"));
    assert!(!page.body.contains("more for free shipping"));
}

#[tokio::test]
async fn test_cart_under_threshold_pays_flat_shipping() {
    let mut app = TestApp::new().await;

    app.add_to_cart("prod-9").await; // $19.99

    let page = app.get("/cart").await;
    assert!(page.body.contains("$19.99"));
    assert!(page.body.contains("$5.99"));
    assert!(page.body.contains("$25.98"));
    assert!(page.body.contains("Add $30.01 more for free shipping"));
}

// =============================================================================
// Updating and removing
// =============================================================================

#[tokio::test]
async fn test_quantity_above_one_is_capped() {
    let mut app = TestApp::new().await;
    app.add_to_cart("prod-2").await;

    let response = app
        .htmx_post_form("/cart/update", "product_id=prod-2&quantity=5")
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(cart_count(&mut app).await.contains(">1<"));
}

#[tokio::test]
async fn test_quantity_zero_removes_item() {
    let mut app = TestApp::new().await;
    app.add_to_cart("prod-2").await;

    let response = app
        .htmx_post_form("/cart/update", "product_id=prod-2&quantity=0")
        .await;

    assert_eq!(response.header("HX-Trigger"), Some("cart-updated"));
    assert!(response.body.contains("Your cart is empty"));
    assert_eq!(cart_count(&mut app).await, "");
}

#[tokio::test]
async fn test_removing_absent_product_is_noop() {
    let mut app = TestApp::new().await;
    app.add_to_cart("prod-4").await;

    let response = app
        .htmx_post_form("/cart/remove", "product_id=prod-5")
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("/products/prod-4"));
    assert!(cart_count(&mut app).await.contains(">1<"));
}

#[tokio::test]
async fn test_remove_then_clear() {
    let mut app = TestApp::new().await;
    app.add_to_cart("prod-4").await;
    app.add_to_cart("prod-5").await;
    app.add_to_cart("prod-6").await;

    let removed = app.post_form("/cart/remove", "product_id=prod-5").await;
    assert_eq!(removed.status, StatusCode::SEE_OTHER);
    assert!(cart_count(&mut app).await.contains(">2<"));

    let cleared = app.htmx_post_form("/cart/clear", "").await;
    assert!(cleared.body.contains("Your cart is empty"));
    assert_eq!(cart_count(&mut app).await, "");
}

#[tokio::test]
async fn test_carts_are_per_visitor() {
    let mut app = TestApp::new().await;
    app.add_to_cart("prod-1").await;

    app.new_visitor();

    assert_eq!(cart_count(&mut app).await, "");
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn test_cart_survives_restart() {
    let dir = temp_data_dir();
    let storage = Storage::open_dir(&dir).await.unwrap();
    let mut app = TestApp::with_storage(storage, dir.clone()).await;
    app.add_to_cart("prod-1").await;
    let cookie = app.cookie().unwrap().to_owned();

    let reopened = Storage::open_dir(&dir).await.unwrap();
    let mut restarted = TestApp::with_storage(reopened, dir.clone()).await;
    restarted.resume_session(&cookie);

    let name = Catalog::standard()
        .find(&ProductId::new("prod-1"))
        .map(|p| p.name.clone())
        .unwrap();
    let page = restarted.get("/cart").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains(&name));
    assert_eq!(cart_count(&mut restarted).await, r#"<span class="cart-badge">1</span>"#);

    let _ = std::fs::remove_dir_all(&dir);
}
