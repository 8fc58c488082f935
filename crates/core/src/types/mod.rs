//! Shared type definitions.

mod id;
mod status;

pub use id::{OrderId, ProductId, UserId};
pub use status::{OrderStatus, ParseOrderStatusError};
