//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use supplement_store_core::{Cart, Category, Product, ProductFilter, ProductId, SortKey};

use crate::error::Result;
use crate::filters;
use crate::state::AppState;

use super::NotFoundTemplate;
use super::cart::load_cart;

/// Related products shown under a product detail page.
const RELATED_LIMIT: usize = 4;

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub category_label: String,
    pub image: String,
    pub bestseller: bool,
    pub in_cart: bool,
}

impl ProductCardView {
    pub fn new(product: &Product, cart: &Cart) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.price.display(),
            category_label: product.category.label().to_string(),
            image: product.image.clone(),
            bestseller: product.bestseller,
            in_cart: cart.contains(&product.id),
        }
    }
}

/// A `<select>` option.
#[derive(Clone)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Product listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub bestseller: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort: Option<String>,
}

impl ProductsQuery {
    /// Build a filter, ignoring values that don't parse.
    #[must_use]
    pub fn to_filter(&self) -> ProductFilter {
        ProductFilter {
            search: non_empty(self.search.as_deref()).map(str::to_string),
            category: non_empty(self.category.as_deref()).and_then(|c| c.parse::<Category>().ok()),
            bestseller_only: self.bestseller.as_deref() == Some("true"),
            min_price: parse_price(self.min_price.as_deref()),
            max_price: parse_price(self.max_price.as_deref()),
            sort: self
                .sort
                .as_deref()
                .map(SortKey::from_param)
                .unwrap_or_default(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_price(value: Option<&str>) -> Option<Decimal> {
    non_empty(value)
        .and_then(|v| v.parse::<Decimal>().ok())
        .filter(|d| !d.is_sign_negative())
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductCardView>,
    pub search: String,
    pub bestseller_only: bool,
    pub min_price: String,
    pub max_price: String,
    pub categories: Vec<OptionView>,
    pub sorts: Vec<OptionView>,
    pub filters_active: bool,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductCardView,
    pub description: String,
    pub category_slug: String,
    pub related_products: Vec<ProductCardView>,
}

/// Display product listing page.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ProductsQuery>,
) -> Result<ProductsIndexTemplate> {
    let filter = query.to_filter();
    let cart = load_cart(&state, &session).await?;

    let products = filter
        .apply(state.catalog().products())
        .into_iter()
        .map(|p| ProductCardView::new(p, &cart))
        .collect();

    let categories = Category::ALL
        .iter()
        .map(|c| OptionView {
            value: c.slug().to_string(),
            label: c.label().to_string(),
            selected: filter.category == Some(*c),
        })
        .collect();

    let sorts = SortKey::ALL
        .iter()
        .map(|k| OptionView {
            value: k.as_str().to_string(),
            label: k.label().to_string(),
            selected: filter.sort == *k,
        })
        .collect();

    Ok(ProductsIndexTemplate {
        products,
        search: filter.search.clone().unwrap_or_default(),
        bestseller_only: filter.bestseller_only,
        min_price: filter.min_price.map(|d| d.to_string()).unwrap_or_default(),
        max_price: filter.max_price.map(|d| d.to_string()).unwrap_or_default(),
        categories,
        sorts,
        filters_active: filter.is_active(),
    })
}

/// Display product detail page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = ProductId::new(id);
    let Some(product) = state.catalog().find(&id) else {
        return Ok((
            StatusCode::NOT_FOUND,
            NotFoundTemplate::new("Product not found", "/products", "Back to products"),
        )
            .into_response());
    };

    let cart = load_cart(&state, &session).await?;

    let related_products = state
        .catalog()
        .products()
        .iter()
        .filter(|p| p.category == product.category && p.id != product.id)
        .take(RELATED_LIMIT)
        .map(|p| ProductCardView::new(p, &cart))
        .collect();

    Ok(ProductShowTemplate {
        product: ProductCardView::new(product, &cart),
        description: product.description.clone(),
        category_slug: product.category.slug().to_string(),
        related_products,
    }
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_to_filter() {
        let query = ProductsQuery {
            search: Some("  whey ".to_string()),
            category: Some("pre-workout".to_string()),
            bestseller: Some("true".to_string()),
            min_price: Some("10".to_string()),
            max_price: Some("abc".to_string()),
            sort: Some("price-high".to_string()),
        };
        let filter = query.to_filter();
        assert_eq!(filter.search.as_deref(), Some("whey"));
        assert_eq!(filter.category, Some(Category::PreWorkout));
        assert!(filter.bestseller_only);
        assert_eq!(filter.min_price, Some(Decimal::new(10, 0)));
        assert_eq!(filter.max_price, None);
        assert_eq!(filter.sort, SortKey::PriceHigh);
    }

    #[test]
    fn test_unknown_values_are_ignored() {
        let query = ProductsQuery {
            category: Some("snacks".to_string()),
            bestseller: Some("yes".to_string()),
            min_price: Some("-5".to_string()),
            sort: Some("random".to_string()),
            ..ProductsQuery::default()
        };
        let filter = query.to_filter();
        assert_eq!(filter, ProductFilter::default());
    }
}
