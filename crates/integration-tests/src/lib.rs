//! End-to-end test harness for the Siraj Store storefront.
//!
//! [`TestContext::start`] serves a fake product catalog and a real storefront
//! on ephemeral localhost ports, then hands back a cookie-keeping client so
//! tests can drive the site the way a browser would.
//!
//! ```rust,ignore
//! let ctx = TestContext::start().await?;
//! let page = ctx.get_text("/products/1").await?;
//! assert!(page.contains("Fjallraven Backpack"));
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Router,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
};
use reqwest::Client;
use url::Url;

use siraj_store_storefront::{
    app,
    config::{CatalogConfig, StorefrontConfig},
    state::AppState,
};

/// Products served by the fake catalog, in catalog wire format.
pub const CATALOG_PRODUCTS: &str = r#"[
    {"id":1,"title":"Fjallraven Backpack","price":109.95,"image":"https://img.example/1.png","category":"men's clothing","description":"Fits 15 inch laptops","rating":{"rate":3.9,"count":120}},
    {"id":5,"title":"Dragon Bracelet","price":695,"image":"https://img.example/5.png","category":"jewelery","description":"Gold and silver","rating":{"rate":4.6,"count":400}},
    {"id":9,"title":"WD 2TB Drive","price":64,"image":"http://img.example/9.png","category":"electronics","description":"USB 3.0","rating":{"rate":3.3,"count":203}},
    {"id":15,"title":"Rain Jacket","price":56.99,"image":"https://img.example/15.png","category":"women's clothing","description":"Lightweight","rating":{"rate":2.6,"count":235}}
]"#;

const CATALOG_CATEGORIES: &str = r#"["electronics","jewelery","men's clothing","women's clothing"]"#;

/// Request counter shared with the fake catalog.
#[derive(Clone, Default)]
pub struct CatalogHits(Arc<AtomicUsize>);

impl CatalogHits {
    /// Requests the catalog has answered so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn products() -> Vec<serde_json::Value> {
    serde_json::from_str(CATALOG_PRODUCTS).unwrap_or_default()
}

async fn all_products(State(hits): State<CatalogHits>) -> &'static str {
    hits.record();
    CATALOG_PRODUCTS
}

async fn all_categories(State(hits): State<CatalogHits>) -> &'static str {
    hits.record();
    CATALOG_CATEGORIES
}

async fn one_product(State(hits): State<CatalogHits>, Path(id): Path<String>) -> Response {
    hits.record();
    products()
        .into_iter()
        .find(|p| p["id"].to_string() == id)
        .map_or_else(|| String::new().into_response(), |p| p.to_string().into_response())
}

async fn by_category(State(hits): State<CatalogHits>, Path(name): Path<String>) -> String {
    hits.record();
    let matching: Vec<_> = products()
        .into_iter()
        .filter(|p| p["category"] == name.as_str())
        .collect();
    serde_json::Value::from(matching).to_string()
}

/// Serve `router` on an ephemeral localhost port and return its address.
async fn serve(router: Router) -> std::io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await;
    });
    Ok(addr)
}

/// A running storefront backed by a fake catalog.
pub struct TestContext {
    pub client: Client,
    pub base_url: Url,
    pub catalog_hits: CatalogHits,
}

impl TestContext {
    /// Start the fake catalog and the storefront.
    ///
    /// # Errors
    ///
    /// Returns an error if either listener can't bind or the client can't
    /// be built.
    pub async fn start() -> Result<Self, Box<dyn std::error::Error>> {
        let catalog_hits = CatalogHits::default();
        let catalog = Router::new()
            .route("/products", get(all_products))
            .route("/products/categories", get(all_categories))
            .route("/products/category/{name}", get(by_category))
            .route("/products/{id}", get(one_product))
            .with_state(catalog_hits.clone());
        let catalog_addr = serve(catalog).await?;

        let config = StorefrontConfig {
            host: "127.0.0.1".parse()?,
            port: 0,
            base_url: Url::parse("http://localhost:3000")?,
            catalog: CatalogConfig {
                base_url: Url::parse(&format!("http://{catalog_addr}"))?,
                cache_capacity: 100,
            },
            json_logs: false,
            sentry_dsn: None,
            sentry_environment: None,
        };
        let storefront_addr = serve(app(AppState::new(config))).await?;

        Ok(Self {
            client: Client::builder().cookie_store(true).build()?,
            base_url: Url::parse(&format!("http://{storefront_addr}"))?,
            catalog_hits,
        })
    }

    /// Absolute URL for a storefront path.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` can't be joined onto the base URL.
    pub fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }

    /// GET a page and return its body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn get_text(&self, path: &str) -> Result<String, Box<dyn std::error::Error>> {
        let response = self.client.get(self.url(path)?).send().await?;
        Ok(response.error_for_status()?.text().await?)
    }

    /// POST a form the way a browser without JavaScript does.
    ///
    /// Redirects are followed, so a cart mutation lands on the cart page.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<reqwest::Response, Box<dyn std::error::Error>> {
        Ok(self.client.post(self.url(path)?).form(form).send().await?)
    }

    /// POST a form as an HTMX request.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure.
    pub async fn post_htmx(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<reqwest::Response, Box<dyn std::error::Error>> {
        Ok(self
            .client
            .post(self.url(path)?)
            .header("HX-Request", "true")
            .form(form)
            .send()
            .await?)
    }

    /// The cart badge count as rendered by `/cart/count`.
    ///
    /// # Errors
    ///
    /// Returns an error if the fragment can't be fetched.
    pub async fn cart_count(&self) -> Result<String, Box<dyn std::error::Error>> {
        Ok(self.get_text("/cart/count").await?.trim().to_string())
    }
}
