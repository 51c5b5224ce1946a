//! Category listing route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use siraj_store_core::Category;

use super::products::{CategoryLink, ProductView, categories_or_default, category_links};
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Category listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/category.html")]
pub struct CategoryTemplate {
    pub label: String,
    pub products: Vec<ProductView>,
    pub categories: Vec<CategoryLink>,
}

/// Display the products in one category.
///
/// The path segment arrives percent-decoded (`men's clothing`).
///
/// # Errors
///
/// Returns the not-found page for a category outside the allow-list, without
/// asking the catalog, and the catalog error page if products can't be fetched.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(raw_category): Path<String>,
) -> Result<CategoryTemplate> {
    let category: Category = raw_category
        .parse()
        .map_err(|_| AppError::NotFound(format!("category {raw_category}")))?;

    let catalog = state.catalog();
    let (products, categories) = tokio::join!(
        catalog.list_products_by_category(category),
        catalog.list_categories()
    );

    Ok(CategoryTemplate {
        label: category.label(),
        products: products?.iter().map(ProductView::from).collect(),
        categories: category_links(&categories_or_default(categories), Some(category)),
    })
}
