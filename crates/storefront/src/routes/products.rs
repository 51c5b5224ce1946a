//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use siraj_store_core::{Category, Product, ProductId};

use crate::error::{AppError, Result};
use crate::filters;
use crate::images::display_image_url;
use crate::state::AppState;

// =============================================================================
// Shared Views
// =============================================================================

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: ProductId,
    pub title: String,
    pub price: String,
    pub image_url: String,
    pub category_label: String,
    pub category_href: String,
    pub description: String,
    pub rating: String,
    pub rating_count: u32,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price: product.price.to_string(),
            image_url: display_image_url(&product.image),
            category_label: product.category.label(),
            category_href: category_href(product.category),
            description: product.description.clone(),
            rating: format!("{:.1}", product.rating.rate),
            rating_count: product.rating.count,
        }
    }
}

/// A category filter link.
#[derive(Clone)]
pub struct CategoryLink {
    pub label: String,
    pub href: String,
    pub is_active: bool,
}

/// Path of a category listing, with the name percent-encoded.
#[must_use]
pub fn category_href(category: Category) -> String {
    format!(
        "/products/categories/{}",
        urlencoding::encode(category.as_str())
    )
}

/// Build the filter bar: "All" first, then each category.
#[must_use]
pub fn category_links(categories: &[Category], active: Option<Category>) -> Vec<CategoryLink> {
    let all = CategoryLink {
        label: "All".to_string(),
        href: "/products".to_string(),
        is_active: active.is_none(),
    };

    std::iter::once(all)
        .chain(categories.iter().map(|&category| CategoryLink {
            label: category.label(),
            href: category_href(category),
            is_active: active == Some(category),
        }))
        .collect()
}

/// Resolve the category list, falling back to the full allow-list.
pub fn categories_or_default(
    result: std::result::Result<Vec<Category>, crate::catalog::CatalogError>,
) -> Vec<Category> {
    match result {
        Ok(categories) if !categories.is_empty() => categories,
        Ok(_) => Category::ALL.to_vec(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch categories, using allow-list");
            Category::ALL.to_vec()
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
    pub categories: Vec<CategoryLink>,
    pub error: Option<String>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display all products with the category filter bar.
///
/// Products and categories are fetched concurrently. If products fail the
/// page shows an error banner; if categories fail the bar falls back to the
/// allow-list.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Response {
    let catalog = state.catalog();
    let (products, categories) = tokio::join!(catalog.list_products(), catalog.list_categories());

    let categories = category_links(&categories_or_default(categories), None);

    match products {
        Ok(products) => ProductsIndexTemplate {
            products: products.iter().map(ProductView::from).collect(),
            categories,
            error: None,
        }
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch products");
            (
                StatusCode::BAD_GATEWAY,
                ProductsIndexTemplate {
                    products: Vec::new(),
                    categories,
                    error: Some(e.to_string()),
                },
            )
                .into_response()
        }
    }
}

/// Display a single product.
///
/// # Errors
///
/// Returns the not-found page for a non-numeric or unknown id, and the
/// catalog error page if the catalog cannot be reached.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<ProductShowTemplate> {
    let not_found = || AppError::NotFound(format!("product {raw_id}"));

    let id: ProductId = raw_id.parse().map_err(|_| not_found())?;
    let product = state.catalog().get_product(id).await?.ok_or_else(not_found)?;

    Ok(ProductShowTemplate {
        product: ProductView::from(&product),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_href_is_percent_encoded() {
        assert_eq!(
            category_href(Category::MensClothing),
            "/products/categories/men%27s%20clothing"
        );
        assert_eq!(
            category_href(Category::Electronics),
            "/products/categories/electronics"
        );
    }

    #[test]
    fn test_category_links_mark_active() {
        let links = category_links(&Category::ALL, Some(Category::Jewelery));
        assert_eq!(links.len(), 5);
        assert_eq!(links.first().map(|l| l.label.as_str()), Some("All"));

        let active: Vec<&str> = links
            .iter()
            .filter(|l| l.is_active)
            .map(|l| l.label.as_str())
            .collect();
        assert_eq!(active, vec!["jewelery"]);
    }

    #[test]
    fn test_categories_fallback_on_error() {
        let fallback = categories_or_default(Err(crate::catalog::CatalogError::InvalidBaseUrl));
        assert_eq!(fallback, Category::ALL.to_vec());
        assert_eq!(
            categories_or_default(Ok(vec![Category::Electronics])),
            vec![Category::Electronics]
        );
    }
}
