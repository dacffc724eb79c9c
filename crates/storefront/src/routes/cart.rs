//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Requests without the `HX-Request` header (plain form posts) are redirected
//! back to the cart page instead. Cart IDs are stored in the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use supplement_store_core::{Cart, CartItem, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::session;
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub category_label: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product.id.to_string(),
            name: item.product.name.clone(),
            category_label: item.product.category.label().to_string(),
            image: item.product.image.clone(),
            quantity: item.quantity,
            price: item.product.price.display(),
            line_price: item.line_total().display(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
    pub item_count: u32,
    pub free_shipping: bool,
    /// "Add $X more for free shipping", when applicable.
    pub until_free_shipping: Option<String>,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let summary = cart.summary();
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            subtotal: summary.subtotal.display(),
            shipping: summary.shipping.display(),
            total: summary.total.display(),
            item_count: summary.item_count,
            free_shipping: summary.free_shipping(),
            until_free_shipping: (!cart.is_empty())
                .then(|| summary.amount_until_free_shipping())
                .flatten()
                .map(|p| p.display()),
        }
    }
}

/// Product form data shared by add and remove.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub product_id: String,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: u32,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Whether the request came from HTMX.
fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("HX-Request")
}

/// Load the visitor's cart without creating one.
pub async fn load_cart(state: &AppState, session: &Session) -> Result<Cart> {
    match session::cart_id(session).await {
        Some(id) => Ok(state.carts().load(&id).await?),
        None => Ok(Cart::new()),
    }
}

/// Respond to a cart mutation: the items fragment for HTMX, a redirect otherwise.
fn cart_changed(headers: &HeaderMap, cart: &Cart) -> Response {
    if is_htmx(headers) {
        (
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartItemsTemplate {
                cart: CartView::from(cart),
            },
        )
            .into_response()
    } else {
        Redirect::to("/cart").into_response()
    }
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CartShowTemplate> {
    let cart = load_cart(&state, &session).await?;
    Ok(CartShowTemplate {
        cart: CartView::from(&cart),
    })
}

/// Add a product to the cart.
///
/// Adding a product that is already in the cart changes nothing. HTMX
/// requests get the updated count badge; plain posts go to the cart page.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let product_id = ProductId::new(form.product_id);
    let product = state
        .catalog()
        .find(&product_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let cart_id = session::ensure_cart_id(&session).await?;
    let cart = state.carts().update(&cart_id, |c| c.add(product)).await?;
    add_breadcrumb("cart", "Added to cart", &[("product_id", product_id.as_str())]);

    if is_htmx(&headers) {
        Ok((
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartCountTemplate {
                count: cart.item_count(),
            },
        )
            .into_response())
    } else {
        Ok(Redirect::to("/cart").into_response())
    }
}

/// Set an item's quantity. Zero removes it; anything above one is capped.
#[instrument(skip(state, session, headers))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let Some(cart_id) = session::cart_id(&session).await else {
        return Ok(cart_changed(&headers, &Cart::new()));
    };
    let product_id = ProductId::new(form.product_id);
    let cart = state
        .carts()
        .update(&cart_id, |c| c.set_quantity(&product_id, form.quantity))
        .await?;
    Ok(cart_changed(&headers, &cart))
}

/// Remove an item from the cart.
#[instrument(skip(state, session, headers))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let Some(cart_id) = session::cart_id(&session).await else {
        return Ok(cart_changed(&headers, &Cart::new()));
    };
    let product_id = ProductId::new(form.product_id);
    let cart = state
        .carts()
        .update(&cart_id, |c| c.remove(&product_id))
        .await?;
    add_breadcrumb("cart", "Removed from cart", &[("product_id", product_id.as_str())]);
    Ok(cart_changed(&headers, &cart))
}

/// Empty the cart.
#[instrument(skip(state, session, headers))]
pub async fn clear(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    if let Some(cart_id) = session::cart_id(&session).await {
        state.carts().clear(&cart_id).await?;
    }
    Ok(cart_changed(&headers, &Cart::new()))
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<CartCountTemplate> {
    let cart = load_cart(&state, &session).await?;
    Ok(CartCountTemplate {
        count: cart.item_count(),
    })
}
