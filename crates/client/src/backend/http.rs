//! HTTP implementation of the [`Backend`] trait over `reqwest`.

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use echoppe_core::UserId;

use crate::config::ClientConfig;
use crate::models::{Credentials, NewUserPayload, User};

use super::{Backend, BackendError};

/// Login request body.
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Login response body.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// Backend client for the shop API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a new backend client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Http` if the underlying client cannot be
    /// built (e.g., TLS initialization failure).
    pub fn new(config: &ClientConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.api_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Turn a non-success response into a `BackendError::Status` carrying
    /// whatever message the body contains.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        let message = if message.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_owned()
        } else {
            message
        };

        Err(BackendError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

impl Backend for HttpBackend {
    #[instrument(skip_all, fields(username = %credentials.username))]
    async fn authenticate(&self, credentials: &Credentials) -> Result<String, BackendError> {
        let body = LoginRequest {
            username: &credentials.username,
            password: credentials.password.expose_secret(),
        };

        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&body)
            .send()
            .await?;
        let response = Self::check(response).await?;

        let login: LoginResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        debug!("authenticated");
        Ok(login.token)
    }

    #[instrument(skip_all)]
    async fn list_users(&self) -> Result<Vec<User>, BackendError> {
        let response = self.client.get(self.url("/users")).send().await?;
        let response = Self::check(response).await?;

        let users: Vec<User> = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        debug!(count = users.len(), "fetched user listing");
        Ok(users)
    }

    #[instrument(skip_all, fields(username = %payload.username))]
    async fn create_user(&self, payload: &NewUserPayload) -> Result<User, BackendError> {
        let response = self
            .client
            .post(self.url("/users"))
            .json(payload)
            .send()
            .await?;
        let response = Self::check(response).await?;

        response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    #[instrument(skip_all, fields(user_id = %id))]
    async fn delete_user(&self, id: UserId) -> Result<(), BackendError> {
        let response = self
            .client
            .delete(self.url(&format!("/users/{id}")))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config() -> ClientConfig {
        ClientConfig {
            api_url: "https://api.example.com".to_owned(),
            api_timeout: Duration::from_secs(5),
            data_dir: std::path::PathBuf::from(".echoppe"),
        }
    }

    #[test]
    fn test_url_joins_paths() {
        let backend = HttpBackend::new(&config()).expect("client");
        assert_eq!(backend.url("/users"), "https://api.example.com/users");
        assert_eq!(
            backend.url("/users/7"),
            "https://api.example.com/users/7"
        );
    }
}
