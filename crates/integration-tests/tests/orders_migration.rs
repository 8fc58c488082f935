//! Integration tests for order-history persistence and schema migration.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::Value;

use echoppe_client::models::Credentials;
use echoppe_client::state::AppState;
use echoppe_client::storage::{MemoryStorage, Storage, keys};
use echoppe_core::{OrderId, OrderStatus, UserId};
use echoppe_integration_tests::{MockBackend, sample_user};

fn app(storage: &Arc<MemoryStorage>) -> AppState {
    AppState::new(Arc::clone(storage) as Arc<dyn Storage>)
}

/// An order-history snapshot as the previous frontend wrote it: `items`
/// instead of `products`, a stray `username`, no `tax`, no `status`.
const LEGACY_SNAPSHOT: &str = r#"[
    {
        "id": "lx2m9aQ4B7C",
        "userId": 1,
        "username": "marin",
        "items": [
            {"id": 1, "title": "Sac de voyage", "price": 40.0, "quantity": 2}
        ],
        "subtotal": 80.0,
        "total": 90.0,
        "date": "2024-11-02T09:30:00Z"
    },
    {
        "id": "lx9kk2XY0Z1",
        "userId": 2,
        "username": "odette",
        "items": [],
        "subtotal": 20.0,
        "total": 30.0,
        "date": "2025-02-10T18:00:00Z"
    },
    {
        "userId": 1,
        "items": [],
        "subtotal": 10.0,
        "total": 20.0,
        "date": "2025-06-01T08:00:00Z"
    }
]"#;

// ============================================================================
// Migration Tests
// ============================================================================

#[tokio::test]
async fn test_legacy_snapshot_is_migrated_on_startup() {
    let storage = Arc::new(MemoryStorage::with_entries([(keys::ORDERS, LEGACY_SNAPSHOT)]));
    let backend = MockBackend::default();

    let mut state = app(&storage);
    state.initialize(&backend).await;
    assert_eq!(state.orders.orders().len(), 3);

    let first = state.orders.orders().first().expect("order");
    assert_eq!(first.id, OrderId::from("lx2m9aQ4B7C"));
    assert_eq!(first.user_id, UserId::new(1));
    assert_eq!(first.products.len(), 1);
    assert_eq!(first.tax, Decimal::from(16)); // backfilled: 80 * 0.2
    assert_eq!(first.status, OrderStatus::Processing);

    // the record that had no id got one
    let last = state.orders.orders().last().expect("order");
    assert!(!last.id.as_str().is_empty());

    // the migrated form replaces the legacy snapshot on disk
    let persisted = storage.get(keys::ORDERS).expect("read").expect("snapshot");
    assert!(persisted.contains("\"products\""));
    assert!(!persisted.contains("\"items\""));
    assert!(!persisted.contains("\"username\""));
}

#[tokio::test]
async fn test_migration_is_stable_across_restarts() {
    let storage = Arc::new(MemoryStorage::with_entries([(keys::ORDERS, LEGACY_SNAPSHOT)]));
    let backend = MockBackend::default();

    let mut first = app(&storage);
    first.initialize(&backend).await;
    let after_first = storage.get(keys::ORDERS).expect("read").expect("snapshot");
    drop(first);

    let mut second = app(&storage);
    second.initialize(&backend).await;
    let after_second = storage.get(keys::ORDERS).expect("read").expect("snapshot");

    // the second pass must not rewrite anything (no regenerated ids or dates)
    assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn test_corrupt_snapshot_resets_history() {
    let storage = Arc::new(MemoryStorage::with_entries([(keys::ORDERS, "certainly not json")]));
    let backend = MockBackend::default();

    let mut state = app(&storage);
    state.initialize(&backend).await;
    assert!(state.orders.orders().is_empty());
    assert_eq!(
        storage.get(keys::ORDERS).expect("read").as_deref(),
        Some("[]")
    );
}

// ============================================================================
// Scoping Tests
// ============================================================================

#[tokio::test]
async fn test_user_orders_are_scoped_and_newest_first() {
    let storage = Arc::new(MemoryStorage::with_entries([(keys::ORDERS, LEGACY_SNAPSHOT)]));
    let backend = MockBackend::with_users(vec![sample_user(1, "marin", "pw", "Marin")]);

    let mut state = app(&storage);
    state.initialize(&backend).await;
    assert!(state.auth.login(&backend, &Credentials::new("marin", "pw")).await);

    let orders = state.orders.user_orders(&state.auth);
    assert_eq!(orders.len(), 2);
    // June 2025 before November 2024
    assert!(orders.first().expect("order").date > orders.last().expect("order").date);
    assert!(orders.iter().all(|o| o.user_id == UserId::new(1)));
}

#[tokio::test]
async fn test_deleting_one_users_orders_spares_the_rest() {
    let storage = Arc::new(MemoryStorage::with_entries([(keys::ORDERS, LEGACY_SNAPSHOT)]));
    let backend = MockBackend::default();

    let mut state = app(&storage);
    state.initialize(&backend).await;

    assert!(state.orders.delete_user_orders(UserId::new(1)));
    assert_eq!(state.orders.orders().len(), 1);
    assert_eq!(
        state.orders.orders().first().expect("order").user_id,
        UserId::new(2)
    );

    // the purge is persisted
    let persisted = storage.get(keys::ORDERS).expect("read").expect("snapshot");
    let records: Vec<Value> = serde_json::from_str(&persisted).expect("parse");
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_order_status_update_is_persisted() {
    let storage = Arc::new(MemoryStorage::with_entries([(keys::ORDERS, LEGACY_SNAPSHOT)]));
    let backend = MockBackend::default();

    let mut state = app(&storage);
    state.initialize(&backend).await;

    let id = OrderId::from("lx2m9aQ4B7C");
    assert!(state.orders.update_order_status(&id, OrderStatus::Shipped));

    let mut second = app(&storage);
    second.initialize(&backend).await;
    let order = second
        .orders
        .orders()
        .iter()
        .find(|o| o.id == id)
        .expect("order");
    assert_eq!(order.status, OrderStatus::Shipped);
}
