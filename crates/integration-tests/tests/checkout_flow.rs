//! Integration tests for the cart and checkout flow.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use echoppe_client::models::Credentials;
use echoppe_client::state::AppState;
use echoppe_client::storage::{MemoryStorage, Storage};
use echoppe_client::stores::CheckoutOutcome;
use echoppe_core::OrderStatus;
use echoppe_integration_tests::{MockBackend, sample_product, sample_user};

fn app(storage: &Arc<MemoryStorage>) -> AppState {
    AppState::new(Arc::clone(storage) as Arc<dyn Storage>)
}

async fn signed_in(storage: &Arc<MemoryStorage>, backend: &MockBackend) -> AppState {
    let mut state = app(storage);
    assert!(
        state
            .auth
            .login(backend, &Credentials::new("marin", "pw"))
            .await
    );
    state
}

// ============================================================================
// Checkout Preconditions
// ============================================================================

#[tokio::test]
async fn test_checkout_with_empty_cart_is_refused() {
    let storage = Arc::new(MemoryStorage::new());
    let backend = MockBackend::with_users(vec![sample_user(1, "marin", "pw", "Marin")]);
    let mut state = signed_in(&storage, &backend).await;

    assert_eq!(state.checkout(), CheckoutOutcome::EmptyCart);
    assert!(state.orders.orders().is_empty());
}

#[tokio::test]
async fn test_checkout_as_guest_keeps_cart() {
    let storage = Arc::new(MemoryStorage::new());
    let mut state = app(&storage);

    state.cart.add_item(&sample_product(1, Decimal::from(40)));
    assert_eq!(state.checkout(), CheckoutOutcome::AuthRequired);

    // nothing is lost; the user can sign in and retry
    assert_eq!(state.cart.count(), 1);
    assert!(state.orders.orders().is_empty());
}

// ============================================================================
// The Full Purchase Journey
// ============================================================================

#[tokio::test]
async fn test_purchase_journey_end_to_end() {
    let storage = Arc::new(MemoryStorage::new());
    let backend = MockBackend::with_users(vec![sample_user(1, "marin", "pw", "Marin")]);
    let mut state = signed_in(&storage, &backend).await;

    let sac = sample_product(1, Decimal::from(40));
    state.cart.add_item(&sac);
    state.cart.add_item(&sac);
    state.cart.add_item(&sample_product(2, Decimal::from(15)));
    assert_eq!(state.cart.subtotal(), Decimal::from(95));

    let outcome = state.checkout();
    let CheckoutOutcome::Placed(order) = outcome else {
        panic!("expected a placed order, got {outcome:?}");
    };

    assert_eq!(order.subtotal, Decimal::from(95));
    assert_eq!(order.shipping, Decimal::TEN);
    assert_eq!(order.total, Decimal::from(105));
    assert_eq!(order.tax, Decimal::from(21)); // 105 * 0.2
    assert_eq!(order.status, OrderStatus::Processing);
    assert_eq!(order.products.len(), 2);
    assert_eq!(
        order.shipping_address.as_ref().map(|a| a.city.as_str()),
        Some("Nantes")
    );
    assert!(state.cart.is_empty());

    // the order survives a restart
    let mut second = app(&storage);
    second.initialize(&backend).await;
    let orders = second.orders.user_orders(&second.auth);
    assert_eq!(orders.len(), 1);
    assert_eq!(orders.first().expect("order").id, order.id);
}

#[tokio::test]
async fn test_shipping_is_free_at_threshold() {
    let storage = Arc::new(MemoryStorage::new());
    let backend = MockBackend::with_users(vec![sample_user(1, "marin", "pw", "Marin")]);
    let mut state = signed_in(&storage, &backend).await;

    state.cart.add_item(&sample_product(1, Decimal::ONE_HUNDRED));

    let CheckoutOutcome::Placed(order) = state.checkout() else {
        panic!("expected a placed order");
    };
    assert_eq!(order.shipping, Decimal::ZERO);
    assert_eq!(order.total, Decimal::ONE_HUNDRED);
}

#[tokio::test]
async fn test_birthday_promotion_ships_free_on_june_sixth() {
    let storage = Arc::new(MemoryStorage::new());
    let backend = MockBackend::with_users(vec![sample_user(1, "swann", "pw", "Swann")]);
    let mut state = app(&storage);
    assert!(
        state
            .auth
            .login(&backend, &Credentials::new("swann", "pw"))
            .await
    );

    state.cart.add_item(&sample_product(1, Decimal::from(20)));
    let june_6 = NaiveDate::from_ymd_opt(2026, 6, 6).expect("date");

    let outcome = state
        .cart
        .checkout_on(&state.auth, &mut state.orders, june_6);
    let CheckoutOutcome::Placed(order) = outcome else {
        panic!("expected a placed order");
    };
    assert_eq!(order.shipping, Decimal::ZERO);
    assert_eq!(order.total, Decimal::from(20));
}

// ============================================================================
// Cart Persistence
// ============================================================================

#[tokio::test]
async fn test_guest_cart_survives_login_and_restart() {
    let storage = Arc::new(MemoryStorage::new());
    let backend = MockBackend::with_users(vec![sample_user(1, "marin", "pw", "Marin")]);

    let mut state = app(&storage);
    state.cart.add_item(&sample_product(1, Decimal::from(40)));
    assert!(
        state
            .auth
            .login(&backend, &Credentials::new("marin", "pw"))
            .await
    );
    assert_eq!(state.cart.count(), 1);
    drop(state);

    let mut second = app(&storage);
    second.initialize(&backend).await;
    assert_eq!(second.cart.count(), 1);
}
