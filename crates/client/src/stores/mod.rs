//! The three state containers.
//!
//! Each store owns one collection, exposes explicit mutation methods, and
//! persists a snapshot after every mutation. Derived values (subtotal,
//! shipping, order views) are plain methods recomputed on demand.
//!
//! Dependency direction is one-way: [`AuthStore`] is the leaf, [`CartStore`]
//! and [`OrdersStore`] take it as a parameter where identity matters. The
//! stores never hold references to each other.

mod auth;
mod cart;
mod orders;

pub use auth::AuthStore;
pub use cart::{CartStore, CheckoutOutcome};
pub use orders::OrdersStore;
