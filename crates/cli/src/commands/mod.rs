//! Command implementations.
//!
//! Every command loads the full application state from the data directory,
//! performs one operation, and lets the stores persist their snapshots.
//! Results are reported through `tracing`.

pub mod auth;
pub mod cart;
pub mod orders;

use std::sync::Arc;

use thiserror::Error;

use echoppe_client::backend::{BackendError, HttpBackend};
use echoppe_client::config::{ClientConfig, ConfigError};
use echoppe_client::state::AppState;
use echoppe_client::storage::{FileStorage, Storage, StorageError};

/// Errors surfaced to the CLI entry point.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The backend client could not be built or a request failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The data directory could not be used.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The operation was refused by the state layer.
    #[error("{0}")]
    Rejected(String),
}

/// Load configuration, open the data directory, and hydrate the stores.
pub(crate) async fn load() -> Result<(AppState, HttpBackend), CliError> {
    let config = ClientConfig::from_env()?;
    let backend = HttpBackend::new(&config)?;
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(&config.data_dir)?);

    let mut state = AppState::new(storage);
    state.initialize(&backend).await;
    Ok((state, backend))
}

/// Turn a store's error flag into a [`CliError::Rejected`].
pub(crate) fn rejected(error: Option<&str>, fallback: &str) -> CliError {
    CliError::Rejected(error.unwrap_or(fallback).to_owned())
}
