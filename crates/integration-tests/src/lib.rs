//! Integration tests for the Supplement Store.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p supplement-store-integration-tests
//! ```
//!
//! Tests drive the real storefront router in-process with
//! `tower::ServiceExt::oneshot`. No network or server is needed: storage is
//! in memory (or a throwaway directory) and the image client has no access
//! key, so every photo lookup falls back to placeholder URLs.
//!
//! # Test Categories
//!
//! - `storefront_cart` - Cart pages, HTMX fragments and the quantity cap
//! - `storefront_checkout` - Checkout validation and order placement
//! - `admin_orders` - Order list filters, detail page and status updates
//! - `storefront_pages` - Home, catalogue, 404s, health and the image API

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::PathBuf;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use tower::ServiceExt;

use supplement_store_core::Catalog;
use supplement_store_storefront::{
    app, config::StorefrontConfig, state::AppState, storage::Storage,
};

/// A storefront instance plus one visitor's session cookie.
pub struct TestApp {
    pub state: AppState,
    router: Router,
    cookie: Option<String>,
}

/// A fully buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// The `Location` header of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// A response header as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl TestApp {
    /// Storefront over in-memory storage.
    pub async fn new() -> Self {
        Self::with_storage(Storage::memory(), temp_data_dir()).await
    }

    /// Storefront over the given storage.
    pub async fn with_storage(storage: Storage, data_dir: PathBuf) -> Self {
        let config = StorefrontConfig::for_data_dir(data_dir);
        let state = AppState::new(config, storage, Catalog::standard())
            .await
            .unwrap();
        Self {
            router: app(state.clone()),
            state,
            cookie: None,
        }
    }

    /// Send a GET request.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// Send a plain (non-HTMX) form post.
    pub async fn post_form(&mut self, uri: &str, body: &str) -> TestResponse {
        let request = self.form_request(uri, body);
        self.send(request).await
    }

    /// Send a form post the way HTMX does.
    pub async fn htmx_post_form(&mut self, uri: &str, body: &str) -> TestResponse {
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("HX-Request", "true")
            .body(Body::from(body.to_owned()))
            .unwrap();
        self.send(request).await
    }

    /// Add a product with a plain form post.
    pub async fn add_to_cart(&mut self, product_id: &str) -> TestResponse {
        self.post_form("/cart/add", &format!("product_id={product_id}"))
            .await
    }

    /// Forget the session cookie, as a new visitor would.
    pub fn new_visitor(&mut self) {
        self.cookie = None;
    }

    /// The current session cookie (`name=value`).
    #[must_use]
    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Continue a visitor's session, e.g. after a restart.
    pub fn resume_session(&mut self, cookie: &str) {
        self.cookie = Some(cookie.to_owned());
    }

    /// A clone of the router, for sending requests concurrently.
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Build a plain form post carrying the current session cookie.
    #[must_use]
    pub fn form_request(&self, uri: &str, body: &str) -> Request<Body> {
        self.request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
        {
            self.cookie = Some(cookie.to_owned());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

/// A fresh directory under the system temp dir.
#[must_use]
pub fn temp_data_dir() -> PathBuf {
    std::env::temp_dir().join(format!("supplement-store-test-{}", uuid::Uuid::new_v4()))
}

/// A valid checkout form body.
#[must_use]
pub fn valid_checkout_form() -> &'static str {
    "name=Jane+Doe&email=jane%40example.com&phone=%28555%29+123-4567\
     &address=123+Main+St&city=Springfield&zip=12345"
}
