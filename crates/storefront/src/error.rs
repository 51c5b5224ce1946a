//! Page-level errors for the storefront.
//!
//! Handlers return [`Result`]; upstream failures are reported to Sentry
//! before the error page goes out.
//!
//! Errors render as full pages: a not-found view for missing products and
//! unlisted categories, and a retry view when the catalog cannot be reached.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::filters;

/// Why a page could not be served.
#[derive(Debug, Error)]
pub enum AppError {
    /// The product catalog was unreachable or answered badly.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A product, category or page that doesn't exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Not-found page.
#[derive(Template)]
#[template(path = "errors/not_found.html")]
struct NotFoundTemplate {
    what: String,
}

/// Catalog failure page with a retry prompt.
#[derive(Template)]
#[template(path = "errors/catalog_error.html")]
struct CatalogErrorTemplate;

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Catalog(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn render(&self) -> askama::Result<String> {
        match self {
            Self::Catalog(_) => CatalogErrorTemplate.render(),
            Self::NotFound(what) => NotFoundTemplate { what: what.clone() }.render(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Only upstream failures are reported
        if matches!(self, Self::Catalog(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        match self.render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to render error page");
                (status, status.canonical_reason().unwrap_or("Error")).into_response()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
