//! Core types for Siraj Store.
//!
//! Catalog values are validated once, when they enter the application, so
//! everything downstream can rely on these types.

pub mod category;
pub mod email;
pub mod id;
pub mod price;
pub mod product;

pub use category::{Category, CategoryError};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError, format_usd};
pub use product::{Product, Rating};
