//! Product type.

use serde::{Deserialize, Serialize};

use crate::types::{Category, Price, ProductId};

/// A product in the catalogue.
///
/// Products are immutable once the catalogue is built. Carts and orders keep
/// their own snapshot of the product so a persisted order still renders if
/// the catalogue changes between releases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: Category,
    pub bestseller: bool,
    /// Absolute image URL.
    pub image: String,
}

impl Product {
    /// Case-insensitive substring match on name or description.
    ///
    /// `needle` must already be lower-cased.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.description.to_lowercase().contains(needle)
    }
}
