//! Catalog product.

use serde::{Deserialize, Serialize};

use super::{Category, Price, ProductId};

/// A product as the storefront sees it, after boundary validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// Image URL exactly as the catalog reported it (may not be HTTPS).
    pub image: String,
    pub category: Category,
    pub description: String,
    pub rating: Rating,
}

/// Aggregate customer rating.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rating {
    /// Average score (the catalog calls this `rate`).
    pub rate: f64,
    /// Number of reviews.
    pub count: u32,
}
