//! Admin-gated API access.

use std::sync::Arc;

use blitzshop_storefront::api::ApiClient;
use blitzshop_storefront::error::{ClientError, Result};
use blitzshop_storefront::session::SessionStore;
use reqwest::RequestBuilder;
use secrecy::SecretString;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Client for `/api/admin/*`, `/api/analytics/*` and the admin parts of
/// `/api/coupons` and `/api/orders`.
///
/// Every call re-checks the session, so signing out (or signing in as a
/// shopper) stops further admin requests without a round trip.
#[derive(Debug, Clone)]
pub struct AdminClient {
    pub(crate) api: ApiClient,
    session: Arc<SessionStore>,
}

/// `{"message", "<key>": T}` envelope used by admin writes; only the
/// payload is kept.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(alias = "product", alias = "coupon", alias = "invoice", alias = "settings")]
    pub item: T,
}

impl AdminClient {
    /// Wrap a signed-in administrator session.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unauthenticated` when signed out and
    /// `ClientError::Forbidden` for non-admin users. No request is made.
    pub async fn new(api: ApiClient, session: Arc<SessionStore>) -> Result<Self> {
        let client = Self { api, session };
        client.token().await?;
        Ok(client)
    }

    /// Bearer token of the administrator.
    pub(crate) async fn token(&self) -> Result<SecretString> {
        let token = self.session.require_token().await?;
        if !self.session.is_admin().await {
            return Err(ClientError::Forbidden);
        }
        Ok(token)
    }

    /// Send an admin request and decode the JSON response.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T> {
        self.api.send(request, fallback).await.map_err(admin_denied)
    }

    /// Send an admin request and return the raw body (PDF downloads).
    pub(crate) async fn send_bytes(&self, request: RequestBuilder, fallback: &str) -> Result<Vec<u8>> {
        self.api
            .send_bytes(request, fallback)
            .await
            .map_err(admin_denied)
    }

    /// Send an admin request and return the body as text (CSV exports).
    pub(crate) async fn send_text(&self, request: RequestBuilder, fallback: &str) -> Result<String> {
        self.api
            .send_text(request, fallback)
            .await
            .map_err(admin_denied)
    }

    /// Underlying API client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }
}

/// Every 403 from an admin route is the role guard, whatever its body says.
fn admin_denied(err: ClientError) -> ClientError {
    match err {
        ClientError::Api { status: 403, .. } => ClientError::Forbidden,
        other => other,
    }
}
