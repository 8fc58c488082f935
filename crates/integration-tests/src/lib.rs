//! Test support for the Échoppe integration tests.
//!
//! [`MockBackend`] is an in-process stand-in for the shop API: it
//! authenticates against a seeded user list, serves that list, and records
//! user creations so tests can assert on the exact payload sent. Failure
//! modes are toggled per test.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p echoppe-integration-tests
//! ```

// Test support code; panicking on a poisoned lock is the right behavior here.
#![allow(clippy::expect_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use secrecy::ExposeSecret;

use echoppe_client::backend::{Backend, BackendError};
use echoppe_client::models::{
    Address, Credentials, Geolocation, Name, NewUserPayload, Product, User,
};
use echoppe_core::UserId;

/// The token every successful authentication returns.
pub const MOCK_TOKEN: &str = "mock-token-1";

/// In-process fake of the shop API.
#[derive(Default)]
pub struct MockBackend {
    users: Mutex<Vec<User>>,
    created: Mutex<Vec<NewUserPayload>>,
    next_id: AtomicI32,
    reject_auth: AtomicBool,
    fail_listing: AtomicBool,
    fail_deletion: AtomicBool,
}

impl MockBackend {
    /// Backend seeded with the given users.
    #[must_use]
    pub fn with_users(users: Vec<User>) -> Self {
        let next_id = users.iter().map(|u| i32::from(u.id)).max().unwrap_or(0) + 1;
        Self {
            users: Mutex::new(users),
            next_id: AtomicI32::new(next_id),
            ..Self::default()
        }
    }

    /// Make `authenticate` fail with 401 regardless of credentials.
    pub fn reject_auth(&self) {
        self.reject_auth.store(true, Ordering::SeqCst);
    }

    /// Make `list_users` fail with 500.
    pub fn fail_listing(&self) {
        self.fail_listing.store(true, Ordering::SeqCst);
    }

    /// Make `delete_user` fail with 500.
    pub fn fail_deletion(&self) {
        self.fail_deletion.store(true, Ordering::SeqCst);
    }

    /// Payloads received by `create_user`, in order.
    #[must_use]
    pub fn created_payloads(&self) -> Vec<NewUserPayload> {
        self.created.lock().expect("lock").clone()
    }

    /// Current user listing.
    #[must_use]
    pub fn users(&self) -> Vec<User> {
        self.users.lock().expect("lock").clone()
    }

    fn status_error(status: u16, message: &str) -> BackendError {
        BackendError::Status {
            status,
            message: message.to_owned(),
        }
    }
}

impl Backend for MockBackend {
    async fn authenticate(&self, credentials: &Credentials) -> Result<String, BackendError> {
        if self.reject_auth.load(Ordering::SeqCst) {
            return Err(Self::status_error(401, "invalid credentials"));
        }

        let users = self.users.lock().expect("lock");
        let matched = users.iter().any(|u| {
            u.username == credentials.username && u.password == credentials.password.expose_secret()
        });
        if matched {
            Ok(MOCK_TOKEN.to_owned())
        } else {
            Err(Self::status_error(401, "invalid credentials"))
        }
    }

    async fn list_users(&self) -> Result<Vec<User>, BackendError> {
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(Self::status_error(500, "listing unavailable"));
        }
        Ok(self.users.lock().expect("lock").clone())
    }

    async fn create_user(&self, payload: &NewUserPayload) -> Result<User, BackendError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let user = User {
            id: UserId::new(id),
            email: payload.email.clone(),
            username: payload.username.clone(),
            password: payload.password.clone(),
            name: Name {
                firstname: payload.firstname.clone(),
                lastname: payload.lastname.clone(),
            },
            address: Some(Address {
                city: payload.address.city.clone(),
                street: payload.address.street.clone(),
                number: payload.number,
                zipcode: payload.zipcode.clone(),
                geolocation: payload.address.geolocation.clone(),
            }),
            phone: payload.phone.clone(),
        };

        self.created.lock().expect("lock").push(payload.clone());
        self.users.lock().expect("lock").push(user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), BackendError> {
        if self.fail_deletion.load(Ordering::SeqCst) {
            return Err(Self::status_error(500, "deletion unavailable"));
        }

        let mut users = self.users.lock().expect("lock");
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(Self::status_error(404, "no such user"));
        }
        Ok(())
    }
}

/// A seeded shop user.
#[must_use]
pub fn sample_user(id: i32, username: &str, password: &str, firstname: &str) -> User {
    User {
        id: UserId::new(id),
        email: format!("{username}@example.com"),
        username: username.to_owned(),
        password: password.to_owned(),
        name: Name {
            firstname: firstname.to_owned(),
            lastname: "Leroy".to_owned(),
        },
        address: Some(Address {
            city: "Nantes".to_owned(),
            street: "rue Kervégan".to_owned(),
            number: 12,
            zipcode: "44000".to_owned(),
            geolocation: Geolocation::default(),
        }),
        phone: "02-40-00-00-00".to_owned(),
    }
}

/// A catalog product.
#[must_use]
pub fn sample_product(id: i32, price: rust_decimal::Decimal) -> Product {
    Product {
        id: echoppe_core::ProductId::new(id),
        title: format!("Article {id}"),
        price,
        image: String::new(),
    }
}
