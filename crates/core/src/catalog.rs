//! The static product catalogue.
//!
//! The store sells a fixed list of 25 supplements. Each entry also carries
//! the photo-search query used to find a picture for it; products sharing a
//! query are fetched with a single API call (see [`Catalog::image_groups`]).

use crate::image::category_image_url;
use crate::product::Product;
use crate::types::{Category, Price, ProductId};

/// A catalogue entry before IDs and images are assigned.
struct Entry {
    name: &'static str,
    cents: i64,
    category: Category,
    bestseller: bool,
    image_query: &'static str,
}

const fn entry(
    name: &'static str,
    cents: i64,
    category: Category,
    bestseller: bool,
    image_query: &'static str,
) -> Entry {
    Entry {
        name,
        cents,
        category,
        bestseller,
        image_query,
    }
}

const ENTRIES: [Entry; 25] = [
    entry("Whey Protein Isolate - Vanilla", 4999, Category::Protein, true, "protein powder supplement"),
    entry("Whey Protein Concentrate - Chocolate", 4499, Category::Protein, true, "protein fitness nutrition"),
    entry("Plant-Based Protein - Vanilla", 5499, Category::Protein, false, "plant protein vegan"),
    entry("Casein Protein - Cookies & Cream", 5299, Category::Protein, true, "protein fitness nutrition"),
    entry("Egg White Protein - Unflavored", 4799, Category::Protein, false, "protein powder supplement"),
    entry("Vitamin D3 + K2 Complex", 2499, Category::Vitamins, true, "vitamins supplements health"),
    entry("Multivitamin for Men", 2999, Category::Vitamins, true, "vitamins wellness"),
    entry("Multivitamin for Women", 2999, Category::Vitamins, false, "vitamins supplements health"),
    entry("Vitamin B12 Complex", 1999, Category::Vitamins, false, "vitamins wellness"),
    entry("Omega-3 Fish Oil", 3499, Category::Vitamins, true, "vitamins supplements health"),
    entry("Vitamin C + Zinc", 2299, Category::Vitamins, false, "vitamins wellness"),
    entry("Pre-Workout Energy - Caffeine Boost", 3999, Category::PreWorkout, true, "fitness workout energy"),
    entry("Pre-Workout Pump - Nitric Oxide", 4299, Category::PreWorkout, false, "fitness gym workout"),
    entry("Pre-Workout Endurance - Beta Alanine", 3799, Category::PreWorkout, false, "fitness workout energy"),
    entry("Pre-Workout Focus - No Caffeine", 3999, Category::PreWorkout, false, "fitness gym workout"),
    entry("Post-Workout Recovery - BCAAs", 3299, Category::PostWorkout, true, "recovery fitness"),
    entry("Post-Workout Glutamine", 2799, Category::PostWorkout, false, "recovery health"),
    entry("Post-Workout Creatine Monohydrate", 2499, Category::PostWorkout, false, "recovery fitness"),
    entry("Fat Burner - Thermogenic", 4499, Category::WeightManagement, false, "fitness health"),
    entry("Appetite Suppressant", 3999, Category::WeightManagement, false, "fitness wellness"),
    entry("Metabolism Booster", 3699, Category::WeightManagement, false, "fitness health"),
    entry("Probiotics - Digestive Health", 2999, Category::HealthWellness, true, "health wellness supplements"),
    entry("Magnesium Complex", 2699, Category::HealthWellness, false, "health wellness"),
    entry("Collagen Peptides", 4999, Category::HealthWellness, false, "health wellness supplements"),
    entry("Turmeric Curcumin", 3199, Category::HealthWellness, false, "health wellness"),
];

/// Products that share one photo-search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageGroup {
    pub query: &'static str,
    /// Product IDs in catalogue order.
    pub product_ids: Vec<ProductId>,
}

/// The product catalogue.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    image_queries: Vec<&'static str>,
}

impl Catalog {
    /// Build the standard catalogue with category default images.
    #[must_use]
    pub fn standard() -> Self {
        let mut per_category = [0_usize; Category::ALL.len()];
        let mut products = Vec::with_capacity(ENTRIES.len());
        let mut image_queries = Vec::with_capacity(ENTRIES.len());

        for (index, e) in ENTRIES.iter().enumerate() {
            let slot = Category::ALL
                .iter()
                .position(|c| *c == e.category)
                .unwrap_or_default();
            let category_index = per_category.get(slot).copied().unwrap_or_default();
            if let Some(count) = per_category.get_mut(slot) {
                *count += 1;
            }

            products.push(Product {
                id: ProductId::from_position(index + 1),
                name: e.name.to_owned(),
                description: e.category.description().to_owned(),
                price: Price::from_cents(e.cents),
                category: e.category,
                bestseller: e.bestseller,
                image: category_image_url(e.category, category_index),
            });
            image_queries.push(e.image_query);
        }

        Self {
            products,
            image_queries,
        }
    }

    /// All products in catalogue order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// The first `limit` bestsellers in catalogue order.
    #[must_use]
    pub fn bestsellers(&self, limit: usize) -> Vec<&Product> {
        self.products.iter().filter(|p| p.bestseller).take(limit).collect()
    }

    /// Products grouped by photo-search query, in first-appearance order.
    #[must_use]
    pub fn image_groups(&self) -> Vec<ImageGroup> {
        let mut groups: Vec<ImageGroup> = Vec::new();
        for (product, query) in self.products.iter().zip(&self.image_queries) {
            match groups.iter_mut().find(|g| g.query == *query) {
                Some(group) => group.product_ids.push(product.id.clone()),
                None => groups.push(ImageGroup {
                    query,
                    product_ids: vec![product.id.clone()],
                }),
            }
        }
        groups
    }

    /// Replace a product's image URL. Returns `false` for an unknown ID.
    pub fn set_image(&mut self, id: &ProductId, url: String) -> bool {
        match self.products.iter_mut().find(|p| &p.id == id) {
            Some(product) => {
                product.image = url;
                true
            }
            None => false,
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
