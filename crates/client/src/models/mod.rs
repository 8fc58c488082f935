//! Domain types for the client state layer.
//!
//! These types mirror the shapes exchanged with the backend and the shapes
//! persisted to local storage. Field renames keep the serialized form
//! compatible with snapshots written by earlier versions of the app.

mod cart;
mod order;
mod user;

pub use cart::{CartLine, Product};
pub use order::{Order, OrderLine, ProductSnapshot, ShippingAddress, generate_order_id};
pub use user::{
    Address, CachedCredentials, Credentials, Geolocation, Name, NewUserPayload, PayloadAddress,
    RegistrationData, User,
};
