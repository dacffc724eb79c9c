//! Orders management route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::instrument;

use supplement_store_core::{Order, OrderId, OrderPage, OrderQuery, OrderStatus};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;

use crate::routes::NotFoundTemplate;
use crate::routes::products::OptionView;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Order list query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub page: Option<usize>,
}

impl OrdersQuery {
    /// Build an order query, ignoring values that don't parse.
    #[must_use]
    pub fn to_query(&self) -> OrderQuery {
        OrderQuery {
            search: non_empty(self.search.as_deref()).map(str::to_string),
            status: non_empty(self.status.as_deref()).and_then(|s| s.parse::<OrderStatus>().ok()),
            date_from: parse_date(self.date_from.as_deref()),
            date_to: parse_date(self.date_to.as_deref()),
            page: self.page.unwrap_or(1),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    non_empty(value).and_then(|v| NaiveDate::parse_from_str(v, DATE_FORMAT).ok())
}

/// Query string for a list page with the same filters.
fn page_href(query: &OrderQuery, page: usize) -> String {
    let mut params = Vec::new();
    if let Some(search) = &query.search {
        params.push(format!("search={}", urlencoding::encode(search)));
    }
    if let Some(status) = query.status {
        params.push(format!("status={status}"));
    }
    if let Some(from) = query.date_from {
        params.push(format!("date_from={}", from.format(DATE_FORMAT)));
    }
    if let Some(to) = query.date_to {
        params.push(format!("date_to={}", to.format(DATE_FORMAT)));
    }
    params.push(format!("page={page}"));
    format!("/admin/orders?{}", params.join("&"))
}

/// Order row for the list table.
#[derive(Debug, Clone)]
pub struct OrderRowView {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub item_count: u32,
    pub total: String,
    pub status: String,
    pub status_variant: String,
    pub created_at: String,
}

impl From<&Order> for OrderRowView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            customer_name: order.customer.name.clone(),
            customer_email: order.customer.email.to_string(),
            item_count: order.item_count(),
            total: order.total.display(),
            status: order.status.label().to_string(),
            status_variant: order.status.badge_variant().to_string(),
            created_at: order.created_at.format("%b %-d, %Y %H:%M").to_string(),
        }
    }
}

/// Orders list page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders/index.html")]
pub struct OrdersIndexTemplate {
    pub orders: Vec<OrderRowView>,
    pub search: String,
    pub statuses: Vec<OptionView>,
    pub date_from: String,
    pub date_to: String,
    pub today: String,
    pub date_error: Option<String>,
    pub page: usize,
    pub total_pages: usize,
    pub total_matching: usize,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

impl OrdersIndexTemplate {
    fn new(query: &OrderQuery, result: &OrderPage<'_>, today: NaiveDate) -> Self {
        let statuses = OrderStatus::ALL
            .iter()
            .map(|s| OptionView {
                value: s.as_str().to_string(),
                label: s.label().to_string(),
                selected: query.status == Some(*s),
            })
            .collect();

        Self {
            orders: result.orders.iter().map(|o| OrderRowView::from(*o)).collect(),
            search: query.search.clone().unwrap_or_default(),
            statuses,
            date_from: query
                .date_from
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            date_to: query
                .date_to
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            today: today.format(DATE_FORMAT).to_string(),
            date_error: result.date_error.map(|e| e.to_string()),
            page: result.page,
            total_pages: result.total_pages,
            total_matching: result.total_matching,
            prev_href: (result.page > 1).then(|| page_href(query, result.page - 1)),
            next_href: (result.page < result.total_pages)
                .then(|| page_href(query, result.page + 1)),
        }
    }
}

/// Orders list page handler.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<OrdersQuery>,
) -> OrdersIndexTemplate {
    let query = params.to_query();
    let today = Utc::now().date_naive();

    state
        .orders()
        .read(|book| {
            let result = book.query(&query, today);
            OrdersIndexTemplate::new(&query, &result, today)
        })
        .await
}

// =============================================================================
// Order Detail Views
// =============================================================================

/// Line item view for templates.
#[derive(Debug, Clone)]
pub struct LineItemView {
    pub product_id: String,
    pub name: String,
    pub category_label: String,
    pub image: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// Order detail view for templates.
#[derive(Debug, Clone)]
pub struct OrderDetailView {
    pub id: String,
    pub status: String,
    pub status_label: String,
    pub status_variant: String,
    pub created_at: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: String,
    pub items: Vec<LineItemView>,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
}

impl From<&Order> for OrderDetailView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            status: order.status.as_str().to_string(),
            status_label: order.status.label().to_string(),
            status_variant: order.status.badge_variant().to_string(),
            created_at: order.created_at.format("%B %-d, %Y at %H:%M UTC").to_string(),
            customer_name: order.customer.name.clone(),
            customer_email: order.customer.email.to_string(),
            customer_phone: order.customer.phone.clone(),
            shipping_address: order.customer.shipping_address(),
            items: order
                .items
                .iter()
                .map(|item| LineItemView {
                    product_id: item.product.id.to_string(),
                    name: item.product.name.clone(),
                    category_label: item.product.category.label().to_string(),
                    image: item.product.image.clone(),
                    quantity: item.quantity,
                    unit_price: item.product.price.display(),
                    line_total: item.line_total().display(),
                })
                .collect(),
            subtotal: order.subtotal.display(),
            shipping: order.shipping.display(),
            total: order.total.display(),
        }
    }
}

/// Order detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders/show.html")]
pub struct OrderShowTemplate {
    pub order: OrderDetailView,
    pub statuses: Vec<OptionView>,
}

/// Order detail page handler.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(order) = state.orders().find(&OrderId::new(id)).await else {
        return (
            StatusCode::NOT_FOUND,
            NotFoundTemplate::new("Order not found", "/admin/orders", "Back to orders"),
        )
            .into_response();
    };

    let statuses = OrderStatus::ALL
        .iter()
        .map(|s| OptionView {
            value: s.as_str().to_string(),
            label: s.label().to_string(),
            selected: order.status == *s,
        })
        .collect();

    OrderShowTemplate {
        order: OrderDetailView::from(&order),
        statuses,
    }
    .into_response()
}

/// Status update form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// Update an order's status.
#[instrument(skip(state))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    let status = form
        .status
        .parse::<OrderStatus>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let id = OrderId::new(id);

    if !state.orders().update_status(&id, status).await? {
        return Err(AppError::NotFound(format!("order {id}")));
    }

    tracing::info!(order_id = %id, status = %status, "Order status updated");
    add_breadcrumb(
        "admin",
        "Order status updated",
        &[("order_id", id.as_str()), ("status", status.as_str())],
    );

    Ok(Redirect::to(&format!("/admin/orders/{id}")))
}
