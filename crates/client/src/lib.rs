//! Échoppe client state layer.
//!
//! Three cooperating state containers back the shop UI: authentication,
//! cart, and order history. Each container owns its collection, persists a
//! serialized snapshot after every mutation, and re-hydrates it at startup.
//!
//! # Architecture
//!
//! - [`stores::AuthStore`] owns identity (user, session token, flags). It is
//!   the leaf dependency: cart and orders read it, it never reads them.
//! - [`stores::CartStore`] owns pending line items and the shipping policy;
//!   checkout delegates order creation to the orders store.
//! - [`stores::OrdersStore`] owns the placed-order history and migrates
//!   legacy persisted snapshots to the current schema at load time.
//!
//! Containers are plain constructed values wired together by the caller
//! (see [`state::AppState`]) - there is no ambient global state. Network
//! access goes through the [`backend::Backend`] trait; local persistence
//! goes through the [`storage::Storage`] trait. Both are injected, so the
//! whole layer runs against mocks in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use echoppe_client::{backend::HttpBackend, config::ClientConfig, state::AppState,
//!     storage::FileStorage};
//!
//! let config = ClientConfig::from_env()?;
//! let backend = HttpBackend::new(&config)?;
//! let storage = Arc::new(FileStorage::open(&config.data_dir)?);
//! let mut state = AppState::new(storage);
//! state.initialize(&backend).await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod migration;
pub mod models;
pub mod state;
pub mod storage;
pub mod stores;
