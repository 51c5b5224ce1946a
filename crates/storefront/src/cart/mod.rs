//! Visitor cart: state container plus its persistence.
//!
//! Each request opens a [`CartStore`] over the visitor's session
//! ([`SessionStorage`]); the store hydrates once, applies mutations, persists
//! them and notifies subscribers. Nothing about the cart is global.

mod storage;
mod store;

pub use storage::{CART_KEY, CartStorage, MemoryStorage, SessionStorage, StorageError};
pub use store::CartStore;

use tower_sessions::Session;

/// Open the cart stored in a visitor's session.
pub async fn open_session_cart(session: Session) -> CartStore<SessionStorage> {
    CartStore::open(SessionStorage::new(session)).await
}
