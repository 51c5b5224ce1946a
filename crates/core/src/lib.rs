//! Siraj Store Core - Shared domain types.
//!
//! This crate provides the types used by the storefront and its tests:
//! - [`types`] - Type-safe product ids, prices, categories, products and emails
//! - [`cart`] - The cart model and its pure state transitions
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no storage. Persistence of the cart is layered on top by the
//! storefront crate, which calls [`cart::Cart::apply`] and then writes the
//! resulting snapshot.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartAction, CartLine, ProductRef};
pub use types::*;
