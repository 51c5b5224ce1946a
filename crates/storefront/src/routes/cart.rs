//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads;
//! without HTMX every mutation redirects back to the cart page. The cart
//! itself lives in the visitor's session and is opened per request.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tokio::sync::watch;
use tower_sessions::Session;
use tracing::instrument;

use siraj_store_core::{Cart, CartLine, ProductId, ProductRef, format_usd};

use super::is_htmx;
use crate::cart::open_session_cart;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::images::display_image_url;
use crate::state::AppState;

/// Event HTMX listeners (the nav badge) refresh on.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: ProductId,
    pub title: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image_url: String,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id,
            title: line.title.clone(),
            quantity: line.quantity,
            price: line.price.to_string(),
            line_price: format_usd(line.line_total()),
            image_url: display_image_url(&line.image),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u64,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            total: format_usd(cart.total()),
            item_count: cart.item_count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
}

/// Update cart form data.
///
/// `quantity` stays raw text so a cleared or garbled input still reaches
/// the cart; see [`parse_quantity`].
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: ProductId,
    #[serde(default)]
    pub quantity: String,
}

/// Read a quantity field the way a browser's `parseInt` would.
///
/// Leading whitespace, an optional sign, then the longest run of digits;
/// anything after is ignored. No digits at all reads as 0, which removes
/// the line. Out-of-range values clamp to the `i64` bounds and the cart
/// saturates them from there.
#[must_use]
pub fn parse_quantity(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, trimmed.get(1..).unwrap_or_default()),
        Some(b'+') => (false, trimmed.get(1..).unwrap_or_default()),
        _ => (false, trimmed),
    };
    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = unsigned.get(..digits_end).unwrap_or_default();

    if digits.is_empty() {
        return 0;
    }

    let signed = if negative {
        format!("-{digits}")
    } else {
        digits.to_string()
    };
    signed.parse().unwrap_or(if negative { i64::MIN } else { i64::MAX })
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: ProductId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Respond to a cart mutation.
///
/// HTMX gets `fragment` plus an `HX-Trigger` when the cart changed; plain
/// form posts are redirected to the cart page.
fn mutation_response(
    headers: &HeaderMap,
    changes: &mut watch::Receiver<Cart>,
    fragment: impl IntoResponse,
) -> Response {
    if !is_htmx(headers) {
        return Redirect::to("/cart").into_response();
    }

    if changes.has_changed().unwrap_or(false) {
        (AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]), fragment).into_response()
    } else {
        fragment.into_response()
    }
}

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> CartShowTemplate {
    let store = open_session_cart(session).await;
    CartShowTemplate {
        cart: CartView::from(&store.read()),
    }
}

/// Add one unit of a product to the cart.
///
/// Title, price and image are taken from the catalog, not from the form.
///
/// # Errors
///
/// Returns not found for an unknown product id and the catalog error page if
/// the catalog can't be reached.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let not_found = || AppError::NotFound(format!("product {}", form.product_id));

    let id: ProductId = form.product_id.parse().map_err(|_| not_found())?;
    let product = state.catalog().get_product(id).await?.ok_or_else(not_found)?;

    let mut store = open_session_cart(session).await;
    let mut changes = store.subscribe();
    store.add_item(ProductRef::from(&product)).await;

    let id = id.to_string();
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));
    tracing::info!(product_id = %id, "Added to cart");

    Ok(mutation_response(
        &headers,
        &mut changes,
        CartCountTemplate {
            count: store.item_count(),
        },
    ))
}

/// Set the quantity of a cart line; zero or below removes it.
#[instrument(skip(session, headers))]
pub async fn update(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let mut store = open_session_cart(session).await;
    let mut changes = store.subscribe();
    store
        .update_quantity(form.id, parse_quantity(&form.quantity))
        .await;

    mutation_response(
        &headers,
        &mut changes,
        CartItemsTemplate {
            cart: CartView::from(&store.read()),
        },
    )
}

/// Remove a line from the cart.
#[instrument(skip(session, headers))]
pub async fn remove(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let mut store = open_session_cart(session).await;
    let mut changes = store.subscribe();
    store.remove_item(form.id).await;

    mutation_response(
        &headers,
        &mut changes,
        CartItemsTemplate {
            cart: CartView::from(&store.read()),
        },
    )
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> CartCountTemplate {
    let store = open_session_cart(session).await;
    CartCountTemplate {
        count: store.item_count(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use siraj_store_core::Price;

    use super::*;

    #[test]
    fn test_parse_quantity_plain_and_signed() {
        assert_eq!(parse_quantity("3"), 3);
        assert_eq!(parse_quantity(" +7"), 7);
        assert_eq!(parse_quantity("-2"), -2);
        assert_eq!(parse_quantity("0"), 0);
    }

    #[test]
    fn test_parse_quantity_ignores_trailing_text() {
        assert_eq!(parse_quantity("4 items"), 4);
        assert_eq!(parse_quantity("2.9"), 2);
    }

    #[test]
    fn test_parse_quantity_without_digits_removes() {
        assert_eq!(parse_quantity(""), 0);
        assert_eq!(parse_quantity("   "), 0);
        assert_eq!(parse_quantity("abc"), 0);
        assert_eq!(parse_quantity("-"), 0);
    }

    #[test]
    fn test_parse_quantity_clamps_out_of_range() {
        assert_eq!(parse_quantity("99999999999999999999"), i64::MAX);
        assert_eq!(parse_quantity("-99999999999999999999"), i64::MIN);
    }

    #[test]
    fn test_cart_view_formats_totals() {
        let product = ProductRef {
            id: ProductId::new(2),
            title: "Jacket".to_string(),
            price: Price::from_cents(5599).unwrap(),
            image: "http://insecure.example/jacket.png".to_string(),
        };
        let cart = Cart::new()
            .apply(siraj_store_core::CartAction::Add(product.clone()))
            .apply(siraj_store_core::CartAction::Add(product));

        let view = CartView::from(&cart);
        assert_eq!(view.total, "$111.98");
        assert_eq!(view.item_count, 2);
        assert_eq!(view.items[0].price, "$55.99");
        assert_eq!(view.items[0].line_price, "$111.98");
        assert_eq!(view.items[0].image_url, crate::images::PLACEHOLDER_IMAGE);
    }
}
