//! Order-history state.
//!
//! The persisted snapshot holds every order placed on this device, across
//! all users; views and deletions are always scoped by user id. Legacy
//! snapshots are migrated to the current schema once, at load time.

use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use echoppe_core::{OrderId, OrderStatus, UserId};

use crate::migration::normalize_orders;
use crate::models::{CartLine, Order, OrderLine, ShippingAddress, generate_order_id};
use crate::storage::{Storage, keys};

use super::auth::AuthStore;

/// Tax rate applied to the order total at creation time.
const TAX_RATE: Decimal = Decimal::from_parts(2, 0, 0, false, 1); // 0.2

/// State container for placed orders.
pub struct OrdersStore {
    storage: Arc<dyn Storage>,
    orders: Vec<Order>,
}

impl OrdersStore {
    /// Create an empty store over the given persistence handle.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            orders: Vec::new(),
        }
    }

    /// Re-hydrate the order history, migrating legacy snapshots.
    ///
    /// Whatever was stored is normalized to the current schema and the
    /// normalized form is written back, so the migration runs at most once
    /// per snapshot. A corrupt snapshot resets the history to empty.
    #[instrument(skip_all)]
    pub fn initialize(&mut self) {
        match self.storage.get(keys::ORDERS) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
                Ok(records) => {
                    self.orders = normalize_orders(records);
                    debug!(count = self.orders.len(), "order history re-hydrated");
                    self.persist();
                }
                Err(err) => {
                    warn!(%err, "orders snapshot is corrupt; resetting");
                    self.orders = Vec::new();
                    self.persist();
                }
            },
            Ok(None) => {}
            Err(err) => warn!(%err, "failed to read orders snapshot"),
        }
    }

    /// Every order on this device, in placement order.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Record a new order for the current user.
    ///
    /// The monetary amounts are taken as computed by the cart; tax is
    /// derived here from the total. Returns `None` when no profile is
    /// available to attribute the order to.
    pub fn create_order(
        &mut self,
        auth: &AuthStore,
        lines: &[CartLine],
        subtotal: Decimal,
        shipping: Decimal,
        total: Decimal,
    ) -> Option<Order> {
        let user = auth.user()?;

        let order = Order {
            id: generate_order_id(),
            user_id: user.id,
            products: lines.iter().map(OrderLine::from).collect(),
            subtotal,
            shipping,
            tax: total * TAX_RATE,
            total,
            status: OrderStatus::Processing,
            date: Utc::now(),
            shipping_address: user.address.as_ref().map(ShippingAddress::from),
        };

        debug!(order_id = %order.id, user_id = %order.user_id, "order recorded");
        self.orders.push(order.clone());
        self.persist();
        Some(order)
    }

    /// The current user's orders, newest first.
    ///
    /// Orders placed the same instant keep their placement order (the sort
    /// is stable). Returns an empty list when no profile is available.
    #[must_use]
    pub fn user_orders(&self, auth: &AuthStore) -> Vec<Order> {
        let Some(user_id) = auth.user_id() else {
            return Vec::new();
        };

        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.date.cmp(&a.date));
        orders
    }

    /// Remove every order belonging to a user. Returns whether anything
    /// was removed.
    pub fn delete_user_orders(&mut self, user_id: UserId) -> bool {
        let before = self.orders.len();
        self.orders.retain(|o| o.user_id != user_id);
        if self.orders.len() == before {
            return false;
        }

        debug!(%user_id, removed = before - self.orders.len(), "orders removed");
        self.persist();
        true
    }

    /// Change an order's status. Returns whether the order was found.
    pub fn update_order_status(&mut self, id: &OrderId, status: OrderStatus) -> bool {
        let Some(order) = self.orders.iter_mut().find(|o| &o.id == id) else {
            return false;
        };

        order.status = status;
        debug!(order_id = %id, %status, "order status updated");
        self.persist();
        true
    }

    fn persist(&self) {
        match serde_json::to_string(&self.orders) {
            Ok(json) => {
                if let Err(err) = self.storage.set(keys::ORDERS, &json) {
                    warn!(%err, "failed to persist orders snapshot");
                }
            }
            Err(err) => warn!(%err, "failed to serialize orders"),
        }
    }
}

impl std::fmt::Debug for OrdersStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersStore")
            .field("orders", &self.orders.len())
            .finish()
    }
}
