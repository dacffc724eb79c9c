//! Product search, filtering and sorting.
//!
//! [`ProductFilter::apply`] is a pure function over any list of products: it
//! keeps the products matching every active predicate, then sorts them. All
//! predicates are conjunctive, so applying two filters one after the other
//! gives the same set as one filter carrying both predicates.

use rust_decimal::Decimal;

use crate::product::Product;
use crate::types::Category;

/// Sort order for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    /// Alphabetical by name.
    #[default]
    Name,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
    /// Bestsellers first, otherwise catalogue order.
    Bestseller,
}

impl SortKey {
    /// Every sort key, in the order shown in the sort dropdown.
    pub const ALL: [Self; 4] = [Self::Name, Self::PriceLow, Self::PriceHigh, Self::Bestseller];

    /// Query-string value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Bestseller => "bestseller",
        }
    }

    /// Dropdown label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Name => "Alphabetical Order",
            Self::PriceLow => "Price: Low to High",
            Self::PriceHigh => "Price: High to Low",
            Self::Bestseller => "Bestsellers First",
        }
    }

    /// Parse a query-string value; anything unrecognised sorts by name.
    #[must_use]
    pub fn from_param(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == value)
            .unwrap_or_default()
    }
}

/// Criteria for a product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Free-text search over name and description.
    pub search: Option<String>,
    pub category: Option<Category>,
    pub bestseller_only: bool,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
    pub sort: SortKey,
}

impl ProductFilter {
    /// Whether a product passes every active predicate.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            if !product.matches_text(&search.to_lowercase()) {
                return false;
            }
        }
        if self.category.is_some_and(|c| c != product.category) {
            return false;
        }
        if self.bestseller_only && !product.bestseller {
            return false;
        }
        if self.min_price.is_some_and(|min| product.price.amount < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price.amount > max) {
            return false;
        }
        true
    }

    /// Filter then sort. The sort is stable, so ties keep their input order.
    pub fn apply<'a, I>(&self, products: I) -> Vec<&'a Product>
    where
        I: IntoIterator<Item = &'a Product>,
    {
        let mut matched: Vec<&Product> = products.into_iter().filter(|p| self.matches(p)).collect();

        match self.sort {
            SortKey::Name => matched.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then_with(|| a.name.cmp(&b.name))
            }),
            SortKey::PriceLow => matched.sort_by(|a, b| a.price.amount.cmp(&b.price.amount)),
            SortKey::PriceHigh => matched.sort_by(|a, b| b.price.amount.cmp(&a.price.amount)),
            SortKey::Bestseller => matched.sort_by_key(|p| !p.bestseller),
        }

        matched
    }

    /// Whether any predicate is active (sorting does not count).
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.search.as_deref().is_some_and(|s| !s.trim().is_empty())
            || self.category.is_some()
            || self.bestseller_only
            || self.min_price.is_some()
            || self.max_price.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::types::ProductId;

    fn ids(products: &[&Product]) -> Vec<ProductId> {
        products.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_no_predicates_keeps_everything_sorted_by_name() {
        let catalog = Catalog::standard();
        let result = ProductFilter::default().apply(catalog.products());
        assert_eq!(result.len(), 25);
        assert_eq!(result.first().map(|p| p.name.as_str()), Some("Appetite Suppressant"));
        assert!(result.windows(2).all(|w| match w {
            [a, b] => a.name.to_lowercase() <= b.name.to_lowercase(),
            _ => true,
        }));
    }

    #[test]
    fn test_search_is_case_insensitive_on_name_and_description() {
        let catalog = Catalog::standard();
        let by_name = ProductFilter {
            search: Some("OMEGA".to_string()),
            ..ProductFilter::default()
        };
        assert_eq!(ids(&by_name.apply(catalog.products())), vec![ProductId::new("prod-10")]);

        let by_description = ProductFilter {
            search: Some("appetite".to_string()),
            ..ProductFilter::default()
        };
        // Matches the weight-management description as well as the name.
        assert_eq!(by_description.apply(catalog.products()).len(), 3);
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let catalog = Catalog::standard();
        let filter = ProductFilter {
            search: Some("   ".to_string()),
            ..ProductFilter::default()
        };
        assert!(!filter.is_active());
        assert_eq!(filter.apply(catalog.products()).len(), 25);
    }

    #[test]
    fn test_category_and_bestseller_commute() {
        let catalog = Catalog::standard();
        for category in Category::ALL {
            let by_category = ProductFilter {
                category: Some(category),
                ..ProductFilter::default()
            };
            let by_bestseller = ProductFilter {
                bestseller_only: true,
                ..ProductFilter::default()
            };
            let combined = ProductFilter {
                category: Some(category),
                bestseller_only: true,
                ..ProductFilter::default()
            };

            let category_first = by_bestseller.apply(by_category.apply(catalog.products()));
            let bestseller_first = by_category.apply(by_bestseller.apply(catalog.products()));
            let at_once = combined.apply(catalog.products());

            assert_eq!(ids(&category_first), ids(&bestseller_first));
            assert_eq!(ids(&category_first), ids(&at_once));
        }
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let catalog = Catalog::standard();
        let filter = ProductFilter {
            min_price: Some(Decimal::new(2499, 2)),
            max_price: Some(Decimal::new(2999, 2)),
            sort: SortKey::PriceLow,
            ..ProductFilter::default()
        };
        let result = filter.apply(catalog.products());
        assert!(!result.is_empty());
        assert_eq!(result.first().map(|p| p.price.display()), Some("$24.99".to_string()));
        assert_eq!(result.last().map(|p| p.price.display()), Some("$29.99".to_string()));
    }

    #[test]
    fn test_price_sorts() {
        let catalog = Catalog::standard();
        let high = ProductFilter {
            sort: SortKey::PriceHigh,
            ..ProductFilter::default()
        }
        .apply(catalog.products());
        assert_eq!(high.first().map(|p| p.price.display()), Some("$54.99".to_string()));
        assert_eq!(high.last().map(|p| p.price.display()), Some("$19.99".to_string()));
    }

    #[test]
    fn test_bestseller_sort_is_stable_partition() {
        let catalog = Catalog::standard();
        let result = ProductFilter {
            sort: SortKey::Bestseller,
            ..ProductFilter::default()
        }
        .apply(catalog.products());

        let split = result.iter().position(|p| !p.bestseller).unwrap_or(result.len());
        assert_eq!(split, 9);
        assert!(result.iter().skip(split).all(|p| !p.bestseller));

        // Catalogue order preserved within each partition.
        let expected: Vec<ProductId> = catalog
            .products()
            .iter()
            .filter(|p| p.bestseller)
            .chain(catalog.products().iter().filter(|p| !p.bestseller))
            .map(|p| p.id.clone())
            .collect();
        assert_eq!(ids(&result), expected);
    }

    #[test]
    fn test_sort_key_from_param() {
        assert_eq!(SortKey::from_param("price-high"), SortKey::PriceHigh);
        assert_eq!(SortKey::from_param("bogus"), SortKey::Name);
    }
}
