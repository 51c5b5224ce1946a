//! Wire types for the catalog REST API and their conversion into core types.
//!
//! The catalog is untrusted input. Products are validated here, once, so the
//! rest of the storefront only ever sees allow-listed categories and
//! non-negative prices.

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use siraj_store_core::{Category, CategoryError, Price, PriceError, Product, ProductId, Rating};

/// A product exactly as the catalog serves it.
#[derive(Debug, Clone, Deserialize)]
pub struct WireProduct {
    pub id: ProductId,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rating: Rating,
}

/// Why a catalog product was rejected at the boundary.
#[derive(Debug, Error)]
pub enum InvalidProduct {
    #[error(transparent)]
    Category(#[from] CategoryError),
    #[error(transparent)]
    Price(#[from] PriceError),
}

impl TryFrom<WireProduct> for Product {
    type Error = InvalidProduct;

    fn try_from(wire: WireProduct) -> Result<Self, Self::Error> {
        Ok(Self {
            id: wire.id,
            title: wire.title,
            price: Price::new(wire.price)?,
            image: wire.image,
            category: wire.category.parse()?,
            description: wire.description,
            rating: wire.rating,
        })
    }
}

/// Convert a list of wire products, dropping the ones that fail validation.
pub fn convert_products(wire: Vec<WireProduct>) -> Vec<Product> {
    wire.into_iter()
        .filter_map(|product| {
            let id = product.id;
            Product::try_from(product)
                .inspect_err(|e| tracing::debug!(product_id = %id, error = %e, "Skipping catalog product"))
                .ok()
        })
        .collect()
}

/// Keep allow-listed category names, first occurrence wins.
pub fn convert_categories(names: Vec<String>) -> Vec<Category> {
    let mut categories = Vec::with_capacity(Category::ALL.len());
    for name in names {
        match name.parse::<Category>() {
            Ok(category) if !categories.contains(&category) => categories.push(category),
            Ok(_) => {}
            Err(e) => tracing::debug!(error = %e, "Skipping catalog category"),
        }
    }
    categories
}
