//! Local persistence for state snapshots.
//!
//! Each state container serializes its whole collection after every
//! mutation and writes it under a well-known key - the storage analog of
//! the browser profile the previous frontend persisted into. Values are
//! plain serialized strings; there is no binary framing and no incremental
//! patching.
//!
//! [`Storage`] is dyn-compatible so the three stores can share one handle
//! (`Arc<dyn Storage>`). [`FileStorage`] keeps one JSON file per key under
//! a data directory; [`MemoryStorage`] backs tests and ephemeral runs.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Well-known snapshot keys.
pub mod keys {
    /// Session token for the authenticated user.
    pub const AUTH_TOKEN: &str = "auth_token";
    /// Obfuscated credentials for profile re-derivation.
    pub const TEMP_CREDENTIALS: &str = "temp_credentials";
    /// Serialized cart lines.
    pub const CART: &str = "cart";
    /// Serialized order history (all users on this device).
    pub const ORDERS: &str = "orders";
}

/// Errors that can occur while reading or writing snapshots.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// A concurrent writer panicked while holding the in-memory lock.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Key-value persistence for serialized snapshots.
///
/// Implementations overwrite values wholesale; a `set` replaces whatever
/// was stored under the key before.
pub trait Storage: Send + Sync {
    /// Read the snapshot stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the underlying store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the underlying store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`. Removing a missing key is not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the underlying store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
