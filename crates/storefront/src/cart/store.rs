//! The cart state container.

use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use siraj_store_core::{Cart, CartAction, CartLine, ProductId, ProductRef};

use super::storage::CartStorage;

/// Single owner of a visitor's cart.
///
/// Every mutation runs the pure [`Cart::apply`] transition, then writes the
/// full snapshot to storage, then notifies subscribers if the cart changed.
///
/// The store is hydrated exactly once, in [`CartStore::open`]. That first
/// state assignment is not written back: `skip_next_write` starts set and is
/// cleared by the hydration commit, so only real mutations persist.
pub struct CartStore<S> {
    storage: S,
    state: watch::Sender<Cart>,
    skip_next_write: bool,
}

impl<S: CartStorage> CartStore<S> {
    /// Create a store over `storage` and hydrate it from the stored snapshot.
    ///
    /// A missing or unreadable snapshot gives an empty cart.
    pub async fn open(storage: S) -> Self {
        let (state, _) = watch::channel(Cart::new());
        let mut store = Self {
            storage,
            state,
            skip_next_write: true,
        };

        let loaded = store.load().await;
        store.commit(loaded).await;
        store
    }

    async fn load(&self) -> Cart {
        match self.storage.read().await {
            Ok(Some(snapshot)) => Cart::from_json(&snapshot).unwrap_or_else(|e| {
                warn!(error = %e, "Discarding unreadable cart snapshot");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read cart snapshot");
                Cart::new()
            }
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add one unit of a product.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_item(&mut self, product: ProductRef) {
        self.dispatch(CartAction::Add(product)).await;
    }

    /// Set a line's quantity; zero or below removes the line.
    #[instrument(skip(self))]
    pub async fn update_quantity(&mut self, id: ProductId, quantity: i64) {
        self.dispatch(CartAction::UpdateQuantity { id, quantity })
            .await;
    }

    /// Remove a line if present.
    #[instrument(skip(self))]
    pub async fn remove_item(&mut self, id: ProductId) {
        self.dispatch(CartAction::Remove(id)).await;
    }

    async fn dispatch(&mut self, action: CartAction) {
        let next = self.state.borrow().clone().apply(action);
        self.commit(next).await;
    }

    /// Publish `next` as the current cart and persist it.
    async fn commit(&mut self, next: Cart) {
        let snapshot = next.to_json();

        self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });

        if self.skip_next_write {
            self.skip_next_write = false;
            debug!("Hydrated cart, skipping write-back");
            return;
        }

        match snapshot {
            Ok(snapshot) => {
                if let Err(e) = self.storage.write(snapshot).await {
                    warn!(error = %e, "Failed to persist cart");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize cart"),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The current cart.
    #[must_use]
    pub fn read(&self) -> Cart {
        self.state.borrow().clone()
    }

    /// Current lines, in first-added order.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.state.borrow().lines().to_vec()
    }

    /// Σ price × quantity over the current lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.state.borrow().total()
    }

    /// Total units in the cart.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.state.borrow().item_count()
    }

    /// Subscribe to cart changes.
    ///
    /// The receiver is marked changed only when a mutation actually altered
    /// the cart.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    /// The underlying storage.
    pub const fn storage(&self) -> &S {
        &self.storage
    }
}
