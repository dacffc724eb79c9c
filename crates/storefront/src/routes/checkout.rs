//! Checkout route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tower_sessions::Session;
use tracing::instrument;

use supplement_store_core::{CheckoutField, CheckoutForm, FieldErrors, place_order};

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::models::session;
use crate::state::AppState;

use super::cart::{CartView, load_cart};

/// One form input with its submitted value and any error.
#[derive(Clone)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub input_type: &'static str,
    pub autocomplete: &'static str,
    pub value: String,
    pub error: Option<String>,
}

impl FieldView {
    fn build(form: &CheckoutForm, errors: &FieldErrors) -> Vec<Self> {
        CheckoutField::ALL
            .iter()
            .map(|&field| {
                let (input_type, autocomplete) = match field {
                    CheckoutField::Name => ("text", "name"),
                    CheckoutField::Email => ("email", "email"),
                    CheckoutField::Phone => ("tel", "tel"),
                    CheckoutField::Address => ("text", "street-address"),
                    CheckoutField::City => ("text", "address-level2"),
                    CheckoutField::Zip => ("text", "postal-code"),
                };
                Self {
                    name: field.as_str(),
                    label: field.label(),
                    input_type,
                    autocomplete,
                    value: form.value(field).to_string(),
                    error: errors.get(field).map(str::to_string),
                }
            })
            .collect()
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub fields: Vec<FieldView>,
    pub cart: CartView,
    pub has_errors: bool,
}

/// Display the checkout form. An empty cart goes back to the cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Response> {
    let cart = load_cart(&state, &session).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    Ok(CheckoutTemplate {
        fields: FieldView::build(&CheckoutForm::default(), &FieldErrors::default()),
        cart: CartView::from(&cart),
        has_errors: false,
    }
    .into_response())
}

/// Validate the form and place the order.
///
/// Invalid input re-renders the form (422) with every message and the
/// submitted values. A valid submission takes the cart, stores the order and
/// redirects to the order's admin page. If the order cannot be stored the
/// cart is put back.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let Some(cart_id) = session::cart_id(&session).await else {
        return Ok(Redirect::to("/cart").into_response());
    };

    let details = match form.validate() {
        Ok(details) => details,
        Err(errors) => {
            let cart = state.carts().load(&cart_id).await?;
            if cart.is_empty() {
                return Ok(Redirect::to("/cart").into_response());
            }
            tracing::debug!(errors = errors.len(), "Checkout form rejected");
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                CheckoutTemplate {
                    fields: FieldView::build(&form, &errors),
                    cart: CartView::from(&cart),
                    has_errors: true,
                },
            )
                .into_response());
        }
    };

    // A concurrent submit of the same cart gets an empty cart here
    let cart = state.carts().take(&cart_id).await?;
    let Some(order) = place_order(&cart, details, Utc::now()) else {
        return Ok(Redirect::to("/cart").into_response());
    };

    let order_id = match state.orders().add(order).await {
        Ok(id) => id,
        Err(e) => {
            if let Err(restore_error) = state.carts().restore(&cart_id, cart).await {
                tracing::error!(error = %restore_error, "Failed to restore cart after checkout error");
            }
            return Err(e.into());
        }
    };

    tracing::info!(order_id = %order_id, "Order placed");
    add_breadcrumb("checkout", "Order placed", &[("order_id", order_id.as_str())]);

    Ok(Redirect::to(&format!("/admin/orders/{order_id}")).into_response())
}
