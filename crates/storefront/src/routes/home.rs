//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use siraj_store_core::{Category, Product};

use super::is_htmx;
use super::products::{ProductView, categories_or_default, category_href};
use crate::filters;
use crate::images::display_image_url;
use crate::pagination::{FEATURED_PAGE_SIZE, Page, PageLink, parse_page};
use crate::state::AppState;

/// A "Browse Categories" tile.
#[derive(Clone)]
pub struct CategoryTile {
    pub label: String,
    pub href: String,
    /// Image of the first product in the category, if there is one.
    pub example_image: Option<String>,
}

impl CategoryTile {
    fn new(category: Category, products: &[Product]) -> Self {
        Self {
            label: category.label(),
            href: category_href(category),
            example_image: products
                .iter()
                .find(|product| product.category == category)
                .map(|product| display_image_url(&product.image)),
        }
    }
}

/// The featured products grid (swapped alone by HTMX on page change).
pub struct FeaturedView {
    pub products: Vec<ProductView>,
    pub pages: Vec<PageLink>,
    pub prev: Option<usize>,
    pub next: Option<usize>,
}

impl From<Page<Product>> for FeaturedView {
    fn from(page: Page<Product>) -> Self {
        Self {
            pages: page.links(),
            prev: page.prev(),
            next: page.next(),
            products: page.items.iter().map(ProductView::from).collect(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub featured: FeaturedView,
    pub categories: Vec<CategoryTile>,
    pub error: Option<String>,
}

/// Featured products fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/featured.html")]
pub struct FeaturedTemplate {
    pub featured: FeaturedView,
}

/// Home page query parameters.
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub page: Option<String>,
}

/// Display the home page.
///
/// `?page=N` selects the featured products page; HTMX page changes get only
/// the grid fragment back.
#[instrument(skip(state, headers))]
pub async fn home(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HomeQuery>,
) -> Response {
    let page = parse_page(query.page.as_deref());

    let catalog = state.catalog();
    let (products, categories) = tokio::join!(catalog.list_products(), catalog.list_categories());
    let categories = categories_or_default(categories);

    let products = match products {
        Ok(products) => products,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch featured products");
            return (
                StatusCode::BAD_GATEWAY,
                HomeTemplate {
                    featured: FeaturedView::from(Page::<Product>::of(&[], page, FEATURED_PAGE_SIZE)),
                    categories: categories.iter().map(|&c| CategoryTile::new(c, &[])).collect(),
                    error: Some(e.to_string()),
                },
            )
                .into_response();
        }
    };

    let featured = FeaturedView::from(Page::of(&products, page, FEATURED_PAGE_SIZE));

    if is_htmx(&headers) {
        return FeaturedTemplate { featured }.into_response();
    }

    HomeTemplate {
        featured,
        categories: categories
            .iter()
            .map(|&category| CategoryTile::new(category, &products))
            .collect(),
        error: None,
    }
    .into_response()
}
