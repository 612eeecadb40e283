//! Signed-in session state.
//!
//! The session is the user profile plus its bearer token, mirrored into
//! three storage entries (see [`crate::storage::keys`]). Every write goes to
//! memory and storage together; a failed request leaves both untouched.

use std::sync::Arc;

use blitzshop_core::User;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::api::{AuthApi, AuthResponse, RegisterRequest};
use crate::error::{ClientError, Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::storage::{KeyValueStore, StorageError, keys};
use crate::validation::{RegistrationForm, validate_login, validate_registration};

#[derive(Debug, Clone)]
struct Session {
    token: SecretString,
    user: User,
}

/// Holds the current user and token.
pub struct SessionStore {
    auth: Arc<dyn AuthApi>,
    storage: Arc<dyn KeyValueStore>,
    state: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Create a signed-out store. Call [`SessionStore::restore`] to load a
    /// persisted session.
    #[must_use]
    pub fn new(auth: Arc<dyn AuthApi>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            auth,
            storage,
            state: RwLock::new(None),
        }
    }

    /// Load the persisted session, if any.
    ///
    /// Returns whether a session was restored. Missing or corrupt entries,
    /// and an unreadable storage file, leave the store signed out.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if the backend cannot be read.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> Result<bool> {
        let (token, user) = match self.stored_session().await {
            Ok(entries) => entries,
            Err(StorageError::Serialization(e)) => {
                warn!(error = %e, "Ignoring unreadable session storage");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        let (Some(token), Some(user)) = (token, user) else {
            return Ok(false);
        };

        let user: User = match serde_json::from_str(&user) {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Ignoring corrupt stored user profile");
                return Ok(false);
            }
        };

        set_sentry_user(&user.id, Some(user.email.as_str()));
        *self.state.write().await = Some(Session {
            token: SecretString::from(token),
            user,
        });
        Ok(true)
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns a validation error without sending a request, or the
    /// server's message (for example "Invalid email or password").
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let email = validate_login(email, password)?;
        let response = self.auth.login(&email, password).await?;
        let user = self.establish(response).await?;
        info!(user_id = %user.id, "Signed in");
        Ok(user)
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// Returns a validation error without sending a request, or the
    /// server's message (for example "Email already registered").
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn register(&self, form: &RegistrationForm) -> Result<User> {
        let email = validate_registration(form)?;
        let request = RegisterRequest {
            email,
            password: form.password.clone(),
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            username: form
                .username
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(String::from),
        };
        let response = self.auth.register(&request).await?;
        let user = self.establish(response).await?;
        info!(user_id = %user.id, "Registered");
        Ok(user)
    }

    /// Clear the session from memory and storage.
    ///
    /// # Errors
    ///
    /// Returns the first `ClientError::Storage` failure. Memory is cleared
    /// and every entry is attempted regardless.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        self.state.write().await.take();
        clear_sentry_user();
        add_breadcrumb("auth", "Signed out", None);

        let mut first_error = None;
        for key in keys::ALL {
            if let Err(e) = self.storage.remove(key).await {
                warn!(key, error = %e, "Failed to remove stored session entry");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), |e| Err(e.into()))
    }

    /// Replace the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unauthenticated` when signed out.
    pub async fn update_user(&self, user: User) -> Result<()> {
        let serialized = serde_json::to_string(&user)
            .map_err(|e| ClientError::Parse(format!("Failed to serialize user: {e}")))?;
        {
            let mut state = self.state.write().await;
            let session = state.as_mut().ok_or(ClientError::Unauthenticated)?;
            session.user = user;
        }
        self.storage.set(keys::USER, &serialized).await?;
        Ok(())
    }

    /// Current user, if signed in.
    pub async fn user(&self) -> Option<User> {
        self.state.read().await.as_ref().map(|s| s.user.clone())
    }

    /// Current bearer token, if signed in.
    pub async fn token(&self) -> Option<SecretString> {
        self.state.read().await.as_ref().map(|s| s.token.clone())
    }

    /// Token of the signed-in user, or `Unauthenticated`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unauthenticated` when signed out.
    pub async fn require_token(&self) -> Result<SecretString> {
        self.token().await.ok_or(ClientError::Unauthenticated)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_some()
    }

    pub async fn is_admin(&self) -> bool {
        self.state
            .read()
            .await
            .as_ref()
            .is_some_and(|s| s.user.is_admin)
    }

    async fn stored_session(
        &self,
    ) -> std::result::Result<(Option<String>, Option<String>), StorageError> {
        let token = self.storage.get(keys::TOKEN).await?;
        let user = self.storage.get(keys::USER).await?;
        Ok((token, user))
    }

    /// Persist a fresh session, then publish it in memory.
    ///
    /// The entries are written together or not at all: a failed write
    /// removes the ones already stored.
    async fn establish(&self, response: AuthResponse) -> Result<User> {
        let AuthResponse {
            access_token, user, ..
        } = response;
        let serialized = serde_json::to_string(&user)
            .map_err(|e| ClientError::Parse(format!("Failed to serialize user: {e}")))?;
        let user_id = user.id.to_string();

        let entries = [
            (keys::TOKEN, access_token.expose_secret()),
            (keys::USER, serialized.as_str()),
            (keys::USER_ID, user_id.as_str()),
        ];
        for (written, (key, value)) in entries.iter().enumerate() {
            if let Err(e) = self.storage.set(key, value).await {
                for (stored, _) in &entries[..written] {
                    if let Err(cleanup) = self.storage.remove(stored).await {
                        warn!(key = stored, error = %cleanup, "Failed to roll back session entry");
                    }
                }
                return Err(e.into());
            }
        }

        set_sentry_user(&user.id, Some(user.email.as_str()));
        *self.state.write().await = Some(Session {
            token: access_token,
            user: user.clone(),
        });
        Ok(user)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}
