//! Catalogue listing.

use rust_decimal::Decimal;
use tracing::info;

use supplement_store_core::{Catalog, Category, ProductFilter, SortKey};

/// Build a filter from command-line arguments.
fn build_filter(
    search: Option<String>,
    category: Option<Category>,
    bestseller_only: bool,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
    sort: &str,
) -> ProductFilter {
    ProductFilter {
        search,
        category,
        bestseller_only,
        min_price,
        max_price,
        sort: SortKey::from_param(sort),
    }
}

/// List catalogue products matching the filters.
pub fn list(
    search: Option<String>,
    category: Option<Category>,
    bestseller_only: bool,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
    sort: &str,
) {
    let catalog = Catalog::standard();
    let filter = build_filter(search, category, bestseller_only, min_price, max_price, sort);
    let products = filter.apply(catalog.products());

    info!("{} product(s), sorted by {}", products.len(), filter.sort.label());
    for product in products {
        let marker = if product.bestseller { " *" } else { "" };
        info!(
            "  {:<8} {:>8}  {:<20} {}{marker}",
            product.id.as_str(),
            product.price.display(),
            product.category.label(),
            product.name,
        );
    }
}
