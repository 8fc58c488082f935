//! Placed-order types and id generation.

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use echoppe_core::{OrderId, OrderStatus, UserId};

use super::cart::CartLine;
use super::user::Address;

/// A placed order.
///
/// Immutable once created except for [`Order::status`]. Orders are never
/// deleted individually - only in bulk when the owning account is deleted.
/// Serialized in camelCase to match the snapshots written by earlier
/// versions of the app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub products: Vec<OrderLine>,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    pub date: DateTime<Utc>,
    pub shipping_address: Option<ShippingAddress>,
}

/// One line of an order: the product as it was sold, plus a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product: ProductSnapshot,
    pub quantity: u32,
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        Self {
            product: ProductSnapshot {
                id: line.product_id,
                title: line.title.clone(),
                price: line.price,
                image: line.image.clone(),
            },
            quantity: line.quantity,
        }
    }
}

/// Product fields frozen into an order at checkout time.
///
/// Later catalog changes (price, title) must not rewrite order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: echoppe_core::ProductId,
    pub title: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
}

/// Delivery address frozen into an order at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub street: String,
    pub number: u32,
    pub city: String,
    pub zipcode: String,
}

impl From<&Address> for ShippingAddress {
    fn from(address: &Address) -> Self {
        Self {
            street: address.street.clone(),
            number: address.number,
            city: address.city.clone(),
            zipcode: address.zipcode.clone(),
        }
    }
}

/// Characters used for the random order-id suffix.
const SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
/// Length of the random order-id suffix.
const SUFFIX_LEN: usize = 5;

/// Generate a fresh order id.
///
/// Combines the current time in milliseconds (base 36) with a short random
/// suffix. Uniqueness is best effort: collisions would need two orders in
/// the same millisecond with the same suffix, which is acceptable for a
/// single-device order history. There is no dedup or retry on collision.
#[must_use]
pub fn generate_order_id() -> OrderId {
    #[allow(clippy::cast_sign_loss)] // timestamps after 1970 are non-negative
    let millis = Utc::now().timestamp_millis().max(0) as u64;

    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| {
            let index = rng.random_range(0..SUFFIX_ALPHABET.len());
            char::from(*SUFFIX_ALPHABET.get(index).unwrap_or(&b'0'))
        })
        .collect();

    OrderId::new(format!("{}{suffix}", to_base36(millis)))
}

/// Encode a number in lowercase base 36.
fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_owned();
    }

    let mut out = Vec::new();
    while value > 0 {
        let digit = (value % 36) as usize;
        out.push(*DIGITS.get(digit).unwrap_or(&b'0'));
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
