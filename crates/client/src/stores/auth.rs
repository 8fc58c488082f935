//! Authentication state.
//!
//! Owns the current user, the session token, and the loading/error flags.
//! The backend has no profile endpoint, so after authenticating the store
//! caches the credentials (obfuscated) and re-derives the profile by
//! matching them against the user listing. Any failure along that path
//! fails closed: the whole session is cleared rather than left half-valid.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use secrecy::ExposeSecret;
use tracing::{debug, instrument, warn};

use echoppe_core::UserId;

use crate::backend::Backend;
use crate::models::{CachedCredentials, Credentials, NewUserPayload, RegistrationData, User};
use crate::storage::{Storage, keys};

/// Suffix appended before encoding so a decoded value is recognizable.
const OBFUSCATION_SUFFIX: &str = "_secure";

/// Obfuscate a password for local caching.
///
/// Reverses the characters, appends a fixed suffix, and base64-encodes the
/// result. This is deliberately reversible - the cached value is replayed
/// against the user listing to re-derive the profile. It is not a security
/// boundary.
#[must_use]
pub fn obfuscate_password(password: &str) -> String {
    let reversed: String = password.chars().rev().collect();
    BASE64.encode(format!("{reversed}{OBFUSCATION_SUFFIX}"))
}

/// Recover a password cached by [`obfuscate_password`].
///
/// Returns `None` when the value is not valid base64, not UTF-8, or lacks
/// the expected suffix - any of which means the cache entry is corrupt.
#[must_use]
pub fn deobfuscate_password(encoded: &str) -> Option<String> {
    let bytes = BASE64.decode(encoded).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    let reversed = decoded.strip_suffix(OBFUSCATION_SUFFIX)?;
    Some(reversed.chars().rev().collect())
}

/// State container for identity and session.
pub struct AuthStore {
    storage: Arc<dyn Storage>,
    user: Option<User>,
    token: Option<String>,
    loading: bool,
    error: Option<String>,
}

impl AuthStore {
    /// Create an empty store over the given persistence handle.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            user: None,
            token: None,
            loading: false,
            error: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn seeded(
        storage: Arc<dyn Storage>,
        user: Option<User>,
        token: Option<String>,
    ) -> Self {
        Self {
            storage,
            user,
            token,
            loading: false,
            error: None,
        }
    }

    /// Restore the session persisted on this device, if any.
    ///
    /// A stored token makes the session authenticated immediately; the
    /// profile is then re-derived from the cached credentials, and failure
    /// to do so clears the session.
    #[instrument(skip_all)]
    pub async fn initialize(&mut self, backend: &impl Backend) {
        match self.storage.get(keys::AUTH_TOKEN) {
            Ok(Some(token)) => {
                debug!("restoring persisted session");
                self.token = Some(token);
                self.fetch_profile(backend).await;
            }
            Ok(None) => {}
            Err(err) => warn!(%err, "failed to read persisted session token"),
        }
    }

    /// Authenticate against the backend.
    ///
    /// On success the token is stored (memory and disk), the credentials
    /// are cached obfuscated, and the profile is fetched. Returns whether
    /// authentication itself succeeded; a profile fetch failure afterwards
    /// clears the session but does not change the return value.
    #[instrument(skip_all, fields(username = %credentials.username))]
    pub async fn login(&mut self, backend: &impl Backend, credentials: &Credentials) -> bool {
        self.loading = true;
        self.error = None;

        match backend.authenticate(credentials).await {
            Ok(token) => {
                self.persist(keys::AUTH_TOKEN, &token);
                self.token = Some(token);

                let cached = CachedCredentials {
                    username: credentials.username.clone(),
                    password: obfuscate_password(credentials.password.expose_secret()),
                };
                match serde_json::to_string(&cached) {
                    Ok(json) => self.persist(keys::TEMP_CREDENTIALS, &json),
                    Err(err) => warn!(%err, "failed to serialize cached credentials"),
                }

                self.loading = false;
                self.fetch_profile(backend).await;
                true
            }
            Err(err) => {
                warn!(%err, "authentication failed");
                self.loading = false;
                self.error = Some(err.to_string());
                self.token = None;
                self.user = None;
                self.discard(keys::AUTH_TOKEN);
                self.discard(keys::TEMP_CREDENTIALS);
                false
            }
        }
    }

    /// Re-derive the profile from the cached credentials.
    ///
    /// The user listing is scanned for an entry matching the cached
    /// username and password. Missing cache, corrupt cache, a failed
    /// request, or no matching user all fail closed: the session is
    /// cleared. The cache itself survives a successful fetch so the next
    /// restart can repeat it.
    #[instrument(skip_all)]
    pub async fn fetch_profile(&mut self, backend: &impl Backend) -> bool {
        let Some(cached) = self.cached_credentials() else {
            warn!("no usable cached credentials; clearing session");
            self.logout();
            return false;
        };
        let Some(password) = deobfuscate_password(&cached.password) else {
            warn!("cached credentials are corrupt; clearing session");
            self.logout();
            return false;
        };

        self.loading = true;
        match backend.list_users().await {
            Ok(users) => {
                self.loading = false;
                let matched = users
                    .into_iter()
                    .find(|u| u.username == cached.username && u.password == password);
                if let Some(user) = matched {
                    debug!(user_id = %user.id, "profile re-derived");
                    self.user = Some(user);
                    true
                } else {
                    warn!("cached credentials match no user; clearing session");
                    self.logout();
                    false
                }
            }
            Err(err) => {
                warn!(%err, "profile fetch failed; clearing session");
                self.loading = false;
                self.error = Some(err.to_string());
                self.logout();
                false
            }
        }
    }

    /// Create a new account.
    ///
    /// Does not log the new user in; callers decide whether to chain a
    /// [`AuthStore::login`] afterwards.
    #[instrument(skip_all, fields(username = %data.username))]
    pub async fn register(&mut self, backend: &impl Backend, data: RegistrationData) -> Option<User> {
        self.loading = true;
        self.error = None;

        let payload = NewUserPayload::from(data);
        match backend.create_user(&payload).await {
            Ok(user) => {
                self.loading = false;
                debug!(user_id = %user.id, "account created");
                Some(user)
            }
            Err(err) => {
                warn!(%err, "registration failed");
                self.loading = false;
                self.error = Some(err.to_string());
                None
            }
        }
    }

    /// Ask the backend to delete the current account.
    ///
    /// Only the remote deletion happens here; on failure the local session
    /// is left intact so the user can retry. Local cleanup (orders, cart,
    /// logout) is the caller's responsibility once this returns `true`.
    #[instrument(skip_all)]
    pub async fn delete_account(&mut self, backend: &impl Backend) -> bool {
        let Some(id) = self.user_id() else {
            return false;
        };

        self.loading = true;
        self.error = None;
        match backend.delete_user(id).await {
            Ok(()) => {
                self.loading = false;
                debug!(user_id = %id, "account deleted");
                true
            }
            Err(err) => {
                warn!(%err, "account deletion failed");
                self.loading = false;
                self.error = Some(err.to_string());
                false
            }
        }
    }

    /// Clear the session, in memory and on disk.
    pub fn logout(&mut self) {
        self.user = None;
        self.token = None;
        self.discard(keys::AUTH_TOKEN);
        self.discard(keys::TEMP_CREDENTIALS);
    }

    /// Whether a session token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The current user, if the profile has been derived.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The current user's id, if known.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.user.as_ref().map(|u| u.id)
    }

    /// The session token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Display name of the current user.
    #[must_use]
    pub fn user_full_name(&self) -> Option<String> {
        self.user.as_ref().map(User::full_name)
    }

    /// Last operation error, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a backend operation is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn cached_credentials(&self) -> Option<CachedCredentials> {
        let raw = match self.storage.get(keys::TEMP_CREDENTIALS) {
            Ok(value) => value?,
            Err(err) => {
                warn!(%err, "failed to read cached credentials");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(cached) => Some(cached),
            Err(err) => {
                warn!(%err, "cached credentials are not valid JSON");
                None
            }
        }
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(err) = self.storage.set(key, value) {
            warn!(%err, key, "failed to persist snapshot");
        }
    }

    fn discard(&self, key: &str) {
        if let Err(err) = self.storage.remove(key) {
            warn!(%err, key, "failed to remove snapshot");
        }
    }
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore")
            .field("user", &self.user)
            .field("authenticated", &self.token.is_some())
            .field("loading", &self.loading)
            .field("error", &self.error)
            .finish()
    }
}
