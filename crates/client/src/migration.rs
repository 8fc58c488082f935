//! Normalization of legacy persisted order snapshots.
//!
//! Earlier versions of the app persisted orders with different field names
//! and fewer fields (`items` instead of `products`, a deprecated `username`
//! field, no `tax`, sometimes no `id`). [`normalize_orders`] lifts every
//! stored record into the current [`Order`] shape.
//!
//! The pass is pure (no I/O) and idempotent: normalizing an already
//! normalized collection reproduces it byte for byte. The orders store runs
//! it once at load time and re-persists the result.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::warn;

use echoppe_core::{OrderId, OrderStatus, UserId};

use crate::models::{CartLine, Order, OrderLine, ShippingAddress, generate_order_id};

/// Tax rate backfilled into legacy records that predate the `tax` field.
#[must_use]
pub fn legacy_tax_rate() -> Decimal {
    Decimal::new(2, 1) // 0.2
}

/// Normalize every stored record into the current [`Order`] shape.
///
/// Records that cannot be attributed to a user (no parseable `userId`) are
/// dropped: an unscoped order can never be shown, deleted, or updated.
#[must_use]
pub fn normalize_orders(records: Vec<Value>) -> Vec<Order> {
    records.into_iter().filter_map(normalize_order).collect()
}

fn normalize_order(record: Value) -> Option<Order> {
    let Value::Object(record) = record else {
        warn!("dropping non-object order record");
        return None;
    };

    let Some(user_id) = user_id_field(&record) else {
        warn!("dropping order record without a user id");
        return None;
    };

    let subtotal = decimal_field(&record, "subtotal").unwrap_or(Decimal::ZERO);
    let tax = decimal_field(&record, "tax").unwrap_or_else(|| subtotal * legacy_tax_rate());

    // `items` is the pre-rename spelling of `products`
    let products = record
        .get("products")
        .or_else(|| record.get("items"))
        .map(normalize_lines)
        .unwrap_or_default();

    Some(Order {
        id: id_field(&record).unwrap_or_else(generate_order_id),
        user_id,
        products,
        subtotal,
        shipping: decimal_field(&record, "shipping").unwrap_or(Decimal::ZERO),
        tax,
        total: decimal_field(&record, "total").unwrap_or(Decimal::ZERO),
        status: record
            .get("status")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<OrderStatus>().ok())
            .unwrap_or_default(),
        date: record
            .get("date")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map_or_else(Utc::now, |d| d.with_timezone(&Utc)),
        shipping_address: record
            .get("shippingAddress")
            .cloned()
            .and_then(|v| serde_json::from_value::<ShippingAddress>(v).ok()),
    })
}

fn user_id_field(record: &Map<String, Value>) -> Option<UserId> {
    record
        .get("userId")
        .and_then(Value::as_i64)
        .and_then(|v| i32::try_from(v).ok())
        .map(UserId::new)
}

fn id_field(record: &Map<String, Value>) -> Option<OrderId> {
    match record.get("id") {
        Some(Value::String(s)) if !s.is_empty() => Some(OrderId::from(s.as_str())),
        // some very old records stored numeric ids
        Some(Value::Number(n)) => Some(OrderId::new(n.to_string())),
        _ => None,
    }
}

fn decimal_field(record: &Map<String, Value>, key: &str) -> Option<Decimal> {
    record
        .get(key)
        .cloned()
        .and_then(|v| serde_json::from_value::<Decimal>(v).ok())
}

/// Normalize the product lines of one record.
///
/// Accepts the current `{product, quantity}` shape and the legacy shape
/// where raw cart lines were stored directly; anything else is skipped.
fn normalize_lines(value: &Value) -> Vec<OrderLine> {
    let Some(entries) = value.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            if let Ok(line) = serde_json::from_value::<OrderLine>(entry.clone()) {
                return Some(line);
            }
            if let Ok(cart_line) = serde_json::from_value::<CartLine>(entry.clone()) {
                return Some(OrderLine::from(&cart_line));
            }
            warn!("skipping unrecognizable order line");
            None
        })
        .collect()
}
