//! Catalog REST client implementation.
//!
//! Plain JSON over `reqwest`, cached with `moka` using per-endpoint
//! staleness windows (see [`super::cache`]).

use std::sync::Arc;

use moka::future::Cache;
use reqwest::StatusCode;
use tracing::{debug, instrument};
use url::Url;

use siraj_store_core::{Category, Product, ProductId};

use super::CatalogError;
use super::cache::{CacheKey, CacheValue, StalenessPolicy};
use super::types::{WireProduct, convert_categories, convert_products};
use crate::config::CatalogConfig;

/// Client for the product catalog API.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .expire_after(StalenessPolicy)
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                cache,
            }),
        }
    }

    /// Build an endpoint URL from path segments (each segment is percent-encoded).
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidBaseUrl)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issue a GET and return the body, or `None` on 404.
    async fn fetch(&self, url: Url) -> Result<Option<String>, CatalogError> {
        let response = self.inner.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!(%url, "Catalog returned 404");
            return Ok(None);
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                %url,
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status(status));
        }

        Ok(Some(body))
    }

    /// GET an endpoint whose absence is an error rather than a result.
    async fn fetch_required(&self, url: Url) -> Result<String, CatalogError> {
        self.fetch(url)
            .await?
            .ok_or(CatalogError::Status(StatusCode::NOT_FOUND))
    }

    async fn fetch_product_list(&self, segments: &[&str]) -> Result<Vec<Product>, CatalogError> {
        let body = self.fetch_required(self.endpoint(segments)?).await?;
        let wire: Vec<WireProduct> = serde_json::from_str(&body)?;
        Ok(convert_products(wire))
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List every product (allow-listed categories only).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the catalog answers with a
    /// non-success status, or the body is not a product list.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::Products).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products = self.fetch_product_list(&["products"]).await?;

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a single product.
    ///
    /// Returns `Ok(None)` when the catalog has no such product (404 or an
    /// empty body) or the product's category is not allow-listed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the catalog answers with a
    /// non-success status other than 404.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        let cache_key = CacheKey::Product(id);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(Some(*product));
        }

        let url = self.endpoint(&["products", &id.to_string()])?;
        let Some(body) = self.fetch(url).await? else {
            return Ok(None);
        };

        // The public catalog answers unknown ids with 200 and an empty body
        if body.trim().is_empty() {
            return Ok(None);
        }

        let Some(wire) = serde_json::from_str::<Option<WireProduct>>(&body)? else {
            return Ok(None);
        };

        let product = match Product::try_from(wire) {
            Ok(product) => product,
            Err(e) => {
                debug!(error = %e, "Catalog product rejected, treating as not found");
                return Ok(None);
            }
        };

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(Some(product))
    }

    /// List the allow-listed categories the catalog currently reports.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a list of
    /// strings.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let body = self
            .fetch_required(self.endpoint(&["products", "categories"])?)
            .await?;
        let names: Vec<String> = serde_json::from_str(&body)?;
        let categories = convert_categories(names);

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(categories.clone()),
            )
            .await;

        Ok(categories)
    }

    /// List the products in one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the catalog answers with a
    /// non-success status, or the body is not a product list.
    #[instrument(skip(self), fields(category = %category))]
    pub async fn list_products_by_category(
        &self,
        category: Category,
    ) -> Result<Vec<Product>, CatalogError> {
        let cache_key = CacheKey::ProductsInCategory(category);

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for category products");
            return Ok(products);
        }

        let products: Vec<Product> = self
            .fetch_product_list(&["products", "category", category.as_str()])
            .await?
            .into_iter()
            .filter(|product| product.category == category)
            .collect();

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }
}
