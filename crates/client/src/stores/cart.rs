//! Cart state and the shipping policy.
//!
//! The cart is device-scoped, not user-scoped: it survives logout and is
//! shared by whoever uses the device, matching how the previous frontend
//! behaved. Only checkout requires an authenticated session.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use echoppe_core::ProductId;

use crate::models::{CartLine, Order, Product};
use crate::storage::{Storage, keys};

use super::auth::AuthStore;
use super::orders::OrdersStore;

/// Subtotal at or above which shipping is free.
const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::ONE_HUNDRED;
/// Flat shipping fee below the threshold.
const FLAT_SHIPPING_FEE: Decimal = Decimal::TEN;
/// First name granted free shipping on the promotional date.
const PROMO_FIRSTNAME: &str = "Swann";

/// Result of a checkout attempt.
///
/// Checkout preconditions are ordinary values, not errors: the UI routes
/// on them (show the empty-cart hint, redirect to login, show the order
/// confirmation).
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    /// Nothing to order.
    EmptyCart,
    /// No authenticated session; the cart is left untouched.
    AuthRequired,
    /// The order was placed and the cart emptied.
    Placed(Order),
}

/// State container for pending line items.
pub struct CartStore {
    storage: Arc<dyn Storage>,
    lines: Vec<CartLine>,
}

impl CartStore {
    /// Create an empty cart over the given persistence handle.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            lines: Vec::new(),
        }
    }

    /// Re-hydrate the cart from its persisted snapshot.
    ///
    /// A corrupt snapshot resets the cart to empty rather than poisoning
    /// every later computation.
    #[instrument(skip_all)]
    pub fn initialize(&mut self) {
        match self.storage.get(keys::CART) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartLine>>(&raw) {
                Ok(lines) => {
                    debug!(count = lines.len(), "cart re-hydrated");
                    self.lines = lines;
                }
                Err(err) => {
                    warn!(%err, "cart snapshot is corrupt; resetting");
                    self.lines = Vec::new();
                    self.persist();
                }
            },
            Ok(None) => {}
            Err(err) => warn!(%err, "failed to read cart snapshot"),
        }
    }

    /// Current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Total number of articles (sum of quantities).
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Shipping cost as of today. See [`CartStore::shipping_cost_on`].
    #[must_use]
    pub fn shipping_cost(&self, auth: &AuthStore) -> Decimal {
        self.shipping_cost_on(auth, Utc::now().date_naive())
    }

    /// Shipping cost on a given date.
    ///
    /// An empty cart ships for nothing, as does any cart whose subtotal
    /// reaches the free-shipping threshold. On June 6th, users whose first
    /// name matches the promotion also ship free. Everyone else pays the
    /// flat fee.
    #[must_use]
    pub fn shipping_cost_on(&self, auth: &AuthStore, today: NaiveDate) -> Decimal {
        if self.lines.is_empty() {
            return Decimal::ZERO;
        }
        if self.subtotal() >= FREE_SHIPPING_THRESHOLD {
            return Decimal::ZERO;
        }
        if today.month() == 6
            && today.day() == 6
            && auth
                .user()
                .is_some_and(|u| u.name.firstname == PROMO_FIRSTNAME)
        {
            return Decimal::ZERO;
        }
        FLAT_SHIPPING_FEE
    }

    /// Subtotal plus shipping as of today.
    #[must_use]
    pub fn total(&self, auth: &AuthStore) -> Decimal {
        self.total_on(auth, Utc::now().date_naive())
    }

    /// Subtotal plus shipping on a given date.
    #[must_use]
    pub fn total_on(&self, auth: &AuthStore, today: NaiveDate) -> Decimal {
        self.subtotal() + self.shipping_cost_on(auth, today)
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart gets its quantity incremented; there
    /// is never more than one line per product id.
    pub fn add_item(&mut self, product: &Product) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            line.quantity += 1;
        } else {
            self.lines.push(CartLine::from_product(product));
        }
        self.persist();
    }

    /// Remove a product's line entirely. Unknown ids are a no-op.
    pub fn remove_item(&mut self, product_id: ProductId) {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        if self.lines.len() != before {
            self.persist();
        }
    }

    /// Set a line's quantity. Zero removes the line; unknown ids are a
    /// no-op.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove_item(product_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = quantity;
            self.persist();
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.persist();
    }

    /// Attempt checkout as of today. See [`CartStore::checkout_on`].
    pub fn checkout(&mut self, auth: &AuthStore, orders: &mut OrdersStore) -> CheckoutOutcome {
        self.checkout_on(auth, orders, Utc::now().date_naive())
    }

    /// Attempt checkout on a given date.
    ///
    /// Preconditions are checked in order: an empty cart short-circuits
    /// before the auth check. On success the order is handed to the orders
    /// store and the cart is emptied; on any other outcome the cart is
    /// left exactly as it was.
    #[instrument(skip_all)]
    pub fn checkout_on(
        &mut self,
        auth: &AuthStore,
        orders: &mut OrdersStore,
        today: NaiveDate,
    ) -> CheckoutOutcome {
        if self.lines.is_empty() {
            return CheckoutOutcome::EmptyCart;
        }
        if !auth.is_authenticated() {
            return CheckoutOutcome::AuthRequired;
        }

        let subtotal = self.subtotal();
        let shipping = self.shipping_cost_on(auth, today);
        let total = subtotal + shipping;

        match orders.create_order(auth, &self.lines, subtotal, shipping, total) {
            Some(order) => {
                debug!(order_id = %order.id, "order placed");
                self.clear();
                CheckoutOutcome::Placed(order)
            }
            // token present but no derived profile to attribute the order to
            None => CheckoutOutcome::AuthRequired,
        }
    }

    fn persist(&self) {
        match serde_json::to_string(&self.lines) {
            Ok(json) => {
                if let Err(err) = self.storage.set(keys::CART, &json) {
                    warn!(%err, "failed to persist cart snapshot");
                }
            }
            Err(err) => warn!(%err, "failed to serialize cart"),
        }
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("lines", &self.lines)
            .finish()
    }
}
