//! BlitzShop storefront SDK.
//!
//! Client-side state and workflows for the BlitzShop REST API: the signed-in
//! session, an optimistic cart, catalog browsing, checkout with coupons and
//! card payment, invoices and account settings.
//!
//! # Example
//!
//! ```rust,ignore
//! let config = ClientConfig::from_env()?;
//! let storage = Arc::new(FileStore::new(config.state_file()));
//! let shop = Storefront::connect(&config, storage).await?;
//!
//! shop.login("ana@example.com", "secret1").await?;
//! shop.cart().add(ProductId::new(3), 2).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod session;
pub mod storage;
pub mod stripe;
pub mod validation;

use std::sync::Arc;

use blitzshop_core::{ProfileUpdate, User};
use secrecy::SecretString;
use tracing::{info, instrument, warn};

pub use api::ApiClient;
pub use cart::CartStore;
pub use checkout::{Checkout, CheckoutTotals};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use session::SessionStore;
pub use storage::KeyValueStore;

use validation::{RegistrationForm, ValidationError, validate_password_change};

/// Shopper-facing client: one API client, one session and one cart.
#[derive(Debug, Clone)]
pub struct Storefront {
    api: ApiClient,
    session: Arc<SessionStore>,
    cart: Arc<CartStore>,
}

impl Storefront {
    /// Build the client and restore any persisted session (and its cart).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or storage cannot
    /// be read. A failed cart fetch is only logged.
    pub async fn connect(config: &ClientConfig, storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        let api = ApiClient::new(config)?;
        Self::with_api(api, storage).await
    }

    /// Like [`Storefront::connect`] with a prebuilt API client.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if storage cannot be read.
    pub async fn with_api(api: ApiClient, storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        let session = Arc::new(SessionStore::new(Arc::new(api.clone()), storage));
        let cart = Arc::new(CartStore::new(Arc::new(api.clone()), session.clone()));

        if session.restore().await? {
            info!("Restored persisted session");
            if let Err(e) = cart.refresh().await {
                warn!(error = %e, "Initial cart fetch failed");
            }
        }

        Ok(Self { api, session, cart })
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Shared handle to the session, for the admin client.
    #[must_use]
    pub fn session_handle(&self) -> Arc<SessionStore> {
        Arc::clone(&self.session)
    }

    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    #[must_use]
    pub fn checkout(&self) -> Checkout {
        Checkout::new(self.api.clone(), self.session.clone(), self.cart.clone())
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Sign in and load the user's cart.
    ///
    /// # Errors
    ///
    /// See [`SessionStore::login`]. A failed cart fetch is only logged.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let user = self.session.login(email, password).await?;
        self.load_cart().await;
        Ok(user)
    }

    /// Create an account, sign in and load the (empty) cart.
    ///
    /// # Errors
    ///
    /// See [`SessionStore::register`].
    pub async fn register(&self, form: &RegistrationForm) -> Result<User> {
        let user = self.session.register(form).await?;
        self.load_cart().await;
        Ok(user)
    }

    /// Sign out and drop the local cart.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if persisted entries cannot be removed.
    pub async fn logout(&self) -> Result<()> {
        self.cart.reset().await;
        self.session.logout().await
    }

    async fn load_cart(&self) {
        if let Err(e) = self.cart.refresh().await {
            warn!(error = %e, "Cart fetch after sign-in failed");
        }
    }

    // =========================================================================
    // Account
    // =========================================================================

    /// Update profile fields and the session's copy of the user.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unauthenticated` when signed out, or the
    /// server's rejection.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        let token = self.session.require_token().await?;
        let user = self.api.update_profile(&token, update).await?;
        self.session.update_user(user.clone()).await?;
        Ok(user)
    }

    /// Change the password after validating the form.
    ///
    /// # Errors
    ///
    /// Returns a validation error without a request, or the server's
    /// rejection ("Current password is incorrect").
    #[instrument(skip_all)]
    pub async fn change_password(&self, current: &str, new: &str, confirm: &str) -> Result<()> {
        validate_password_change(current, new, confirm)?;
        let token = self.session.require_token().await?;
        self.api
            .change_password(
                &token,
                &SecretString::from(current),
                &SecretString::from(new),
            )
            .await?;
        info!("Password changed");
        Ok(())
    }

    /// Deactivate the account, then sign out.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank password, or "Incorrect password".
    #[instrument(skip_all)]
    pub async fn delete_account(&self, password: &str) -> Result<()> {
        if password.is_empty() {
            return Err(ValidationError::PasswordRequired.into());
        }
        let token = self.session.require_token().await?;
        self.api
            .delete_account(&token, &SecretString::from(password))
            .await?;
        info!("Account deactivated");
        self.logout().await
    }
}
