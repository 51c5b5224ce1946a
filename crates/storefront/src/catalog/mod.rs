//! Product catalog REST client.
//!
//! # Architecture
//!
//! - Plain JSON over `reqwest`; the catalog is the source of truth and is
//!   never synced locally
//! - Products are validated at this boundary: categories outside
//!   [`Category::ALL`](siraj_store_core::Category::ALL) are dropped
//! - In-memory caching via `moka`, with a staleness window per endpoint
//!
//! # Endpoints
//!
//! - `GET /products` - all products
//! - `GET /products/{id}` - one product (404 or an empty body means absent)
//! - `GET /products/categories` - category names
//! - `GET /products/category/{name}` - products in one category
//!
//! # Example
//!
//! ```rust,ignore
//! use siraj_store_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog);
//! let featured = client.list_products().await?;
//! let product = client.get_product(ProductId::new(1)).await?;
//! ```

mod cache;
mod client;
pub mod types;

pub use cache::{CATEGORY_LIST_TTL, PRODUCT_DETAIL_TTL, PRODUCT_LIST_TTL};
pub use client::CatalogClient;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("Catalog returned HTTP {0}")]
    Status(StatusCode),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot carry path segments.
    #[error("Catalog base URL cannot be a base")]
    InvalidBaseUrl,
}
