//! The backend collaborator.
//!
//! The state layer never talks HTTP directly; it calls the [`Backend`]
//! trait and reacts to success or failure. Retry, interceptors, and token
//! refresh are the transport's concern, not this layer's. Exactly four
//! operations are required:
//!
//! - `authenticate` - exchange credentials for a session token
//! - `list_users` - list all users (profile re-derivation workaround)
//! - `create_user` - register a new account
//! - `delete_user` - delete an account
//!
//! [`HttpBackend`] is the production implementation over `reqwest`; tests
//! substitute their own implementations.

mod http;

pub use http::HttpBackend;

use thiserror::Error;

use echoppe_core::UserId;

use crate::models::{Credentials, NewUserPayload, User};

/// Errors surfaced by backend operations.
///
/// The stores turn these into human-readable messages on their `error`
/// field; they are never thrown across the container boundary.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request could not be sent or the response body not read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("unexpected response shape: {0}")]
    Decode(String),
}

/// Abstract request API the state layer depends on.
#[allow(async_fn_in_trait)]
pub trait Backend {
    /// Exchange credentials for a session token.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure or rejected credentials.
    async fn authenticate(&self, credentials: &Credentials) -> Result<String, BackendError>;

    /// List every user known to the backend.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure.
    async fn list_users(&self) -> Result<Vec<User>, BackendError>;

    /// Create a new user account.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure or a rejected payload.
    async fn create_user(&self, payload: &NewUserPayload) -> Result<User, BackendError>;

    /// Delete a user account.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure or an unknown id.
    async fn delete_user(&self, id: UserId) -> Result<(), BackendError>;
}
