//! Image URL validation for rendered product images.
//!
//! Catalog image strings are untrusted. Only absolute `https` URLs are
//! rendered; anything else falls back to a local placeholder.

use url::Url;

/// Placeholder shown when a product image URL is not usable.
pub const PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.svg";

/// Whether `candidate` is an absolute URL with the `https` scheme.
///
/// Never fails: unparsable input is simply invalid.
#[must_use]
pub fn is_valid_image_url(candidate: &str) -> bool {
    Url::parse(candidate).is_ok_and(|url| url.scheme() == "https")
}

/// The URL to render for an image: itself if valid, else the placeholder.
#[must_use]
pub fn display_image_url(candidate: &str) -> String {
    if is_valid_image_url(candidate) {
        candidate.to_string()
    } else {
        PLACEHOLDER_IMAGE.to_string()
    }
}
