//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                - Home page (?page=N, HTMX grid fragment)
//! GET  /health                          - Health check
//! GET  /sitemap.xml                     - Sitemap
//!
//! # Products
//! GET  /products                        - Product listing with category filter
//! GET  /products/{id}                   - Product detail
//! GET  /products/categories/{category}  - Category listing
//!
//! # Cart (HTMX fragments, redirect without HTMX)
//! GET  /cart                            - Cart page
//! POST /cart/add                        - Add to cart (returns count badge, triggers cart-updated)
//! POST /cart/update                     - Update quantity (returns cart_items fragment)
//! POST /cart/remove                     - Remove item (returns cart_items fragment)
//! GET  /cart/count                      - Cart count badge (fragment)
//!
//! # Pages
//! GET  /about                           - About page
//! GET  /account                         - Demo account page
//! GET  /contact                         - Contact form
//! POST /contact                         - Submit contact form
//! ```

pub mod cart;
pub mod categories;
pub mod contact;
pub mod home;
pub mod pages;
pub mod products;
pub mod sitemap;

use axum::{
    Router,
    http::HeaderMap,
    routing::{get, post},
};

use crate::middleware::mutation_rate_limiter;
use crate::state::AppState;

/// Whether the request was issued by HTMX.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .is_some_and(|value| value.as_bytes() == b"true")
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/categories/{category}", get(categories::show))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    let mutations = Router::new()
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route_layer(mutation_rate_limiter());

    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .merge(mutations)
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        .route("/health", get(health))
        .route("/sitemap.xml", get(sitemap::sitemap))
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Static pages
        .route("/about", get(pages::about))
        .route("/account", get(pages::account))
        .route(
            "/contact",
            get(contact::show).merge(post(contact::submit).route_layer(mutation_rate_limiter())),
        )
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the catalog.
async fn health() -> &'static str {
    "ok"
}
