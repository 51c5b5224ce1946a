//! Cache types for catalog API responses.
//!
//! Each kind of response has its own staleness window. The window is chosen
//! per entry from its key, so one `moka` cache serves every endpoint.

use std::time::{Duration, Instant};

use moka::Expiry;

use siraj_store_core::{Category, Product, ProductId};

/// Product lists (all products, or one category) go stale after 4 hours.
pub const PRODUCT_LIST_TTL: Duration = Duration::from_secs(4 * 60 * 60);

/// The category name list goes stale after 24 hours.
pub const CATEGORY_LIST_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// A single product's detail goes stale after 1 hour.
pub const PRODUCT_DETAIL_TTL: Duration = Duration::from_secs(60 * 60);

/// Cache key for catalog responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Product(ProductId),
    Categories,
    ProductsInCategory(Category),
}

impl CacheKey {
    /// How long a response under this key may be served from cache.
    #[must_use]
    pub const fn staleness_window(&self) -> Duration {
        match self {
            Self::Products | Self::ProductsInCategory(_) => PRODUCT_LIST_TTL,
            Self::Categories => CATEGORY_LIST_TTL,
            Self::Product(_) => PRODUCT_DETAIL_TTL,
        }
    }
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Product>),
    Product(Box<Product>),
    Categories(Vec<Category>),
}

/// Expiry policy applying [`CacheKey::staleness_window`] to new entries.
pub struct StalenessPolicy;

impl Expiry<CacheKey, CacheValue> for StalenessPolicy {
    fn expire_after_create(
        &self,
        key: &CacheKey,
        _value: &CacheValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(key.staleness_window())
    }
}
