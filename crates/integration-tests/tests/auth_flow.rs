//! Integration tests for the authentication flow.
//!
//! These run entirely in-process against [`MockBackend`] and
//! `MemoryStorage`; no server or network is involved.

use std::sync::Arc;

use echoppe_client::models::{Address, Credentials, Geolocation, Name, RegistrationData};
use echoppe_client::state::AppState;
use echoppe_client::storage::{MemoryStorage, Storage, keys};
use echoppe_core::UserId;
use echoppe_integration_tests::{MOCK_TOKEN, MockBackend, sample_user};

fn app(storage: &Arc<MemoryStorage>) -> AppState {
    AppState::new(Arc::clone(storage) as Arc<dyn Storage>)
}

fn registration(username: &str) -> RegistrationData {
    RegistrationData {
        email: format!("{username}@example.com"),
        username: username.to_owned(),
        password: "hunter-2-hunter".to_owned(),
        name: Name {
            firstname: "Odette".to_owned(),
            lastname: "Durand".to_owned(),
        },
        address: Address {
            city: "Nantes".to_owned(),
            street: "rue Kervégan".to_owned(),
            number: 12,
            zipcode: "44000".to_owned(),
            geolocation: Geolocation::default(),
        },
        phone: String::new(),
    }
}

// ============================================================================
// Login & Session Tests
// ============================================================================

#[tokio::test]
async fn test_login_persists_session_and_derives_profile() {
    let storage = Arc::new(MemoryStorage::new());
    let backend = MockBackend::with_users(vec![sample_user(3, "marin", "pw", "Marin")]);
    let mut state = app(&storage);

    assert!(state.auth.login(&backend, &Credentials::new("marin", "pw")).await);
    assert!(state.auth.is_authenticated());
    assert_eq!(state.auth.user_id(), Some(UserId::new(3)));
    assert_eq!(state.auth.user_full_name().as_deref(), Some("Marin Leroy"));

    assert_eq!(
        storage.get(keys::AUTH_TOKEN).expect("read").as_deref(),
        Some(MOCK_TOKEN)
    );
    let cached = storage
        .get(keys::TEMP_CREDENTIALS)
        .expect("read")
        .expect("cached credentials");
    // cached password is obfuscated, never plain
    assert!(!cached.contains("pw\""));
}

#[tokio::test]
async fn test_login_with_bad_credentials_sets_error() {
    let storage = Arc::new(MemoryStorage::new());
    let backend = MockBackend::with_users(vec![sample_user(3, "marin", "pw", "Marin")]);
    let mut state = app(&storage);

    assert!(!state.auth.login(&backend, &Credentials::new("marin", "wrong")).await);
    assert!(!state.auth.is_authenticated());
    assert!(state.auth.error().is_some());
    assert_eq!(storage.get(keys::AUTH_TOKEN).expect("read"), None);
    assert_eq!(storage.get(keys::TEMP_CREDENTIALS).expect("read"), None);
}

#[tokio::test]
async fn test_session_survives_restart() {
    let storage = Arc::new(MemoryStorage::new());
    let backend = MockBackend::with_users(vec![sample_user(3, "marin", "pw", "Marin")]);

    let mut first = app(&storage);
    assert!(first.auth.login(&backend, &Credentials::new("marin", "pw")).await);
    drop(first);

    // a fresh process over the same storage
    let mut second = app(&storage);
    second.initialize(&backend).await;
    assert!(second.auth.is_authenticated());
    assert_eq!(second.auth.user_id(), Some(UserId::new(3)));
}

#[tokio::test]
async fn test_restart_with_unreachable_backend_fails_closed() {
    let storage = Arc::new(MemoryStorage::new());
    let backend = MockBackend::with_users(vec![sample_user(3, "marin", "pw", "Marin")]);

    let mut first = app(&storage);
    assert!(first.auth.login(&backend, &Credentials::new("marin", "pw")).await);
    drop(first);

    backend.fail_listing();
    let mut second = app(&storage);
    second.initialize(&backend).await;

    // half-valid sessions are not kept around
    assert!(!second.auth.is_authenticated());
    assert_eq!(second.auth.user(), None);
    assert_eq!(storage.get(keys::AUTH_TOKEN).expect("read"), None);
    assert_eq!(storage.get(keys::TEMP_CREDENTIALS).expect("read"), None);
}

// ============================================================================
// Registration Tests
// ============================================================================

#[tokio::test]
async fn test_register_sends_flattened_payload() {
    let storage = Arc::new(MemoryStorage::new());
    let backend = MockBackend::default();
    let mut state = app(&storage);

    let user = state
        .auth
        .register(&backend, registration("odette"))
        .await
        .expect("registration");
    assert_eq!(user.username, "odette");

    let payloads = backend.created_payloads();
    assert_eq!(payloads.len(), 1);
    let payload = payloads.first().expect("payload");
    assert_eq!(payload.firstname, "Odette");
    assert_eq!(payload.lastname, "Durand");
    assert_eq!(payload.number, 12);
    assert_eq!(payload.zipcode, "44000");
    // empty coordinates are defaulted, not sent empty
    assert_eq!(payload.address.geolocation.lat, "0");
    assert_eq!(payload.address.geolocation.long, "0");
}

#[tokio::test]
async fn test_register_then_login() {
    let storage = Arc::new(MemoryStorage::new());
    let backend = MockBackend::default();
    let mut state = app(&storage);

    state
        .auth
        .register(&backend, registration("odette"))
        .await
        .expect("registration");

    assert!(
        state
            .auth
            .login(&backend, &Credentials::new("odette", "hunter-2-hunter"))
            .await
    );
    assert_eq!(state.auth.user_full_name().as_deref(), Some("Odette Durand"));
}

// ============================================================================
// Account Deletion Tests
// ============================================================================

#[tokio::test]
async fn test_delete_account_cascades_locally() {
    let storage = Arc::new(MemoryStorage::new());
    let backend = MockBackend::with_users(vec![sample_user(3, "marin", "pw", "Marin")]);
    let mut state = app(&storage);

    assert!(state.auth.login(&backend, &Credentials::new("marin", "pw")).await);
    state
        .cart
        .add_item(&echoppe_integration_tests::sample_product(
            1,
            rust_decimal::Decimal::from(40),
        ));
    assert!(matches!(
        state.checkout(),
        echoppe_client::stores::CheckoutOutcome::Placed(_)
    ));
    state
        .cart
        .add_item(&echoppe_integration_tests::sample_product(
            2,
            rust_decimal::Decimal::from(15),
        ));

    assert!(state.delete_account(&backend).await);
    assert!(!state.auth.is_authenticated());
    assert!(state.cart.is_empty());
    assert!(state.orders.orders().is_empty());
    assert!(backend.users().is_empty());
    assert_eq!(storage.get(keys::AUTH_TOKEN).expect("read"), None);
}

#[tokio::test]
async fn test_failed_deletion_leaves_session_intact() {
    let storage = Arc::new(MemoryStorage::new());
    let backend = MockBackend::with_users(vec![sample_user(3, "marin", "pw", "Marin")]);
    let mut state = app(&storage);

    assert!(state.auth.login(&backend, &Credentials::new("marin", "pw")).await);
    state
        .cart
        .add_item(&echoppe_integration_tests::sample_product(
            1,
            rust_decimal::Decimal::from(40),
        ));

    backend.fail_deletion();
    assert!(!state.delete_account(&backend).await);

    assert!(state.auth.is_authenticated());
    assert!(state.auth.error().is_some());
    assert_eq!(state.cart.count(), 1);
}
