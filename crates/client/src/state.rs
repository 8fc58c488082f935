//! The assembled application state.
//!
//! [`AppState`] owns the three stores and encodes the few flows that span
//! more than one of them: startup hydration, checkout, and account
//! deletion. Everything single-store is reached through the public fields.

use std::sync::Arc;

use tracing::instrument;

use crate::backend::Backend;
use crate::storage::Storage;
use crate::stores::{AuthStore, CartStore, CheckoutOutcome, OrdersStore};

/// The three state containers wired to one persistence handle.
pub struct AppState {
    pub auth: AuthStore,
    pub cart: CartStore,
    pub orders: OrdersStore,
}

impl AppState {
    /// Construct the stores over a shared storage handle.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            auth: AuthStore::new(Arc::clone(&storage)),
            cart: CartStore::new(Arc::clone(&storage)),
            orders: OrdersStore::new(storage),
        }
    }

    /// Re-hydrate every store from its persisted snapshot.
    ///
    /// Local snapshots (orders, cart) are loaded before the session is
    /// restored, so the auth store's profile fetch finds the rest of the
    /// state already in place.
    #[instrument(skip_all)]
    pub async fn initialize(&mut self, backend: &impl Backend) {
        self.orders.initialize();
        self.cart.initialize();
        self.auth.initialize(backend).await;
    }

    /// Attempt to place an order from the current cart.
    pub fn checkout(&mut self) -> CheckoutOutcome {
        self.cart.checkout(&self.auth, &mut self.orders)
    }

    /// Delete the current account and everything local that belongs to it.
    ///
    /// The backend deletion gates the rest: if it fails, orders, cart, and
    /// session are all left intact so the user can retry. On success the
    /// user's orders are purged, the cart emptied, and the session cleared.
    #[instrument(skip_all)]
    pub async fn delete_account(&mut self, backend: &impl Backend) -> bool {
        let Some(user_id) = self.auth.user_id() else {
            return false;
        };

        if !self.auth.delete_account(backend).await {
            return false;
        }

        self.orders.delete_user_orders(user_id);
        self.cart.clear();
        self.auth.logout();
        true
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("auth", &self.auth)
            .field("cart", &self.cart)
            .field("orders", &self.orders)
            .finish()
    }
}
