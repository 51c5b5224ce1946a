//! XML sitemap of every page worth indexing.
//!
//! Lists the static pages, every allow-listed category and every product the
//! catalog currently offers.

use axum::{
    extract::State,
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::IntoResponse,
};
use tracing::instrument;
use url::Url;

use siraj_store_core::{Category, Product};

use super::products::category_href;
use crate::error::Result;
use crate::state::AppState;

const STATIC_PATHS: [&str; 5] = ["/", "/products", "/about", "/contact", "/cart"];

/// Every site path, in sitemap order.
#[must_use]
pub fn site_paths(products: &[Product]) -> Vec<String> {
    STATIC_PATHS
        .iter()
        .map(ToString::to_string)
        .chain(Category::ALL.iter().map(|&category| category_href(category)))
        .chain(products.iter().map(|product| format!("/products/{}", product.id)))
        .collect()
}

fn render(base_url: &Url, paths: &[String]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for path in paths {
        let loc = base_url.join(path).map_or_else(|_| path.clone(), String::from);
        // Paths are percent-encoded; only '&' needs escaping in XML text
        xml.push_str(&format!("  <url><loc>{}</loc></url>\n", loc.replace('&', "&amp;")));
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Serve `/sitemap.xml`.
///
/// # Errors
///
/// Returns the catalog error page if products can't be fetched.
#[instrument(skip(state))]
pub async fn sitemap(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let products = state.catalog().list_products().await?;
    let body = render(&state.config().base_url, &site_paths(&products));

    Ok((
        [
            (CONTENT_TYPE, "application/xml; charset=utf-8"),
            (CACHE_CONTROL, "public, max-age=3600"),
        ],
        body,
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use siraj_store_core::{Price, ProductId, Rating};

    use super::*;

    fn product(id: i32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("P{id}"),
            price: Price::ZERO,
            image: String::new(),
            category: Category::Electronics,
            description: String::new(),
            rating: Rating::default(),
        }
    }

    #[test]
    fn test_site_paths_cover_categories_and_products() {
        let paths = site_paths(&[product(1), product(20)]);
        assert!(paths.contains(&"/products/categories/women%27s%20clothing".to_string()));
        assert!(paths.contains(&"/products/20".to_string()));
        assert_eq!(paths.len(), STATIC_PATHS.len() + Category::ALL.len() + 2);
    }

    #[test]
    fn test_render_uses_absolute_urls() {
        let base = Url::parse("https://store.example.com").unwrap();
        let xml = render(&base, &["/products/1".to_string()]);
        assert!(xml.contains("<loc>https://store.example.com/products/1</loc>"));
        assert!(xml.contains("<loc>https://store.example.com/products/1</loc></url>\n</urlset>\n"));
    }
}
