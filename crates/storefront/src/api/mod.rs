//! HTTP client for the BlitzShop REST API.
//!
//! # Architecture
//!
//! - One [`ApiClient`] per process, cheap to clone (`Arc` inside)
//! - JSON in and out; money is sent as JSON numbers
//! - Authenticated calls take the session token explicitly and send it as
//!   `Authorization: Bearer <token>`
//! - Read-only catalog responses are cached via `moka`
//! - No timeouts, retries or request de-duplication: a slow response may
//!   land after a newer one
//!
//! # Error bodies
//!
//! Failed responses carry `{"error": "...", "message"?: "..."}`. The `error`
//! string becomes the user-facing message, except where it is a snake_case
//! code with a `message` beside it (the review routes); when both are missing
//! each operation supplies its own fallback text. A 403 keeps its body text; the admin
//! client narrows it to [`ClientError::Forbidden`].

mod account;
mod auth;
mod cart;
mod catalog;
mod coupons;
mod invoices;
mod orders;
mod payments;
mod reviews;

pub use auth::{AuthApi, AuthResponse, RegisterRequest};
pub use catalog::ProductQuery;
pub use payments::{PaymentConfirmation, PaymentIntent};
pub use reviews::MAX_REVIEWS_PER_PAGE;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ClientConfig;
use crate::error::ClientError;
use catalog::CacheValue;

/// Default `User-Agent` sent with every request.
const USER_AGENT: &str = concat!("blitzshop-client/", env!("CARGO_PKG_VERSION"));

/// Error body returned by the API.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl ErrorBody {
    /// Text to show the user. `error` wins unless it is a machine code such
    /// as `already_reviewed` sent alongside a `message`.
    fn into_message(self) -> Option<String> {
        let is_code = |s: &str| {
            !s.is_empty() && s.chars().all(|c| c.is_ascii_lowercase() || c == '_')
        };
        match (self.error, self.message) {
            (Some(error), Some(message)) if is_code(&error) => Some(message),
            (error, message) => error.or(message),
        }
        .filter(|m| !m.trim().is_empty())
    }
}

/// Plain `{"message": "..."}` acknowledgement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ack {
    pub message: Option<String>,
}

/// BlitzShop REST API client.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<String, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        let user_agent = config.user_agent.as_deref().unwrap_or(USER_AGENT);
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()?;

        Ok(Self::with_http_client(
            client,
            config.api_url.clone(),
            config.catalog_cache_ttl,
        ))
    }

    /// Build a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_http_client(client: reqwest::Client, base_url: Url, cache_ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(cache_ttl)
            .build();

        Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url,
                cache,
            }),
        }
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve an API path (with or without a leading slash) and append query pairs.
    ///
    /// Pairs whose value is `None` are skipped.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Parse` if the path cannot be joined onto the base URL.
    pub fn endpoint(&self, path: &str, query: &[(&str, Option<String>)]) -> Result<Url, ClientError> {
        let mut url = self
            .inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::Parse(format!("Invalid API path {path}: {e}")))?;

        let present: Vec<_> = query
            .iter()
            .filter_map(|(key, value)| value.as_deref().map(|v| (*key, v)))
            .collect();
        if !present.is_empty() {
            url.query_pairs_mut().extend_pairs(present);
        }
        Ok(url)
    }

    /// Start a request, attaching the bearer token when one is given.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Parse` if the path is not a valid URL.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, Option<String>)],
        token: Option<&SecretString>,
    ) -> Result<RequestBuilder, ClientError> {
        let url = self.endpoint(path, query)?;
        let builder = self.inner.client.request(method, url);
        Ok(match token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        })
    }

    /// Send a request and decode a JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` on transport failure and the mapped API
    /// error (using `fallback` when the body has no message) on non-2xx.
    pub async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        self.handle_response(response, fallback).await
    }

    /// Send a request and return the raw body bytes (PDF downloads).
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::send`].
    pub async fn send_bytes(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<Vec<u8>, ClientError> {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(self.parse_error(response, fallback).await);
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Send a request and return the body as text (CSV exports).
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::send`].
    pub async fn send_text(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<String, ClientError> {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(self.parse_error(response, fallback).await);
        }
        Ok(response.text().await?)
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
        fallback: &str,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| ClientError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(self.parse_error(response, fallback).await)
    }

    /// Parse error response from the API.
    async fn parse_error(&self, response: Response, fallback: &str) -> ClientError {
        let status = response.status().as_u16();

        // Check for rate limiting
        if status == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return ClientError::RateLimited(retry_after);
        }

        let body: ErrorBody = response.json().await.unwrap_or_default();
        let message = body.into_message();

        // A bare 403 is the admin guard; shopper ownership checks carry their own text
        let message = match (status, message) {
            (403, None) => return ClientError::Forbidden,
            (_, Some(message)) => message,
            (_, None) => fallback.to_string(),
        };

        if status == 404 {
            return ClientError::NotFound(message);
        }

        tracing::debug!(status, %message, "API request rejected");
        ClientError::Api { status, message }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_http_client(
            reqwest::Client::new(),
            Url::parse(base).unwrap(),
            Duration::from_secs(60),
        )
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = client("https://shop.example.com/backend/");
        let url = api.endpoint("/api/cart/", &[]).unwrap();
        assert_eq!(url.as_str(), "https://shop.example.com/backend/api/cart/");
    }

    #[test]
    fn test_endpoint_skips_missing_query_values() {
        let api = client("http://localhost:5000/");
        let url = api
            .endpoint(
                "api/products",
                &[
                    ("q", Some("red mug".to_string())),
                    ("category", None),
                    ("page", Some("2".to_string())),
                ],
            )
            .unwrap();
        assert_eq!(url.query(), Some("q=red+mug&page=2"));
    }

    #[test]
    fn test_endpoint_without_query_has_none() {
        let api = client("http://localhost:5000/");
        let url = api.endpoint("api/cart/clear", &[("x", None)]).unwrap();
        assert_eq!(url.query(), None);
    }

    fn body(error: Option<&str>, message: Option<&str>) -> ErrorBody {
        ErrorBody {
            error: error.map(String::from),
            message: message.map(String::from),
        }
    }

    #[test]
    fn test_error_text_wins_over_detail() {
        let message = body(Some("Error creating order"), Some("db timeout")).into_message();
        assert_eq!(message.as_deref(), Some("Error creating order"));
    }

    #[test]
    fn test_error_code_defers_to_message() {
        let message = body(
            Some("already_reviewed"),
            Some("You have already reviewed this product"),
        )
        .into_message();
        assert_eq!(message.as_deref(), Some("You have already reviewed this product"));

        let bare = body(Some("forbidden"), None).into_message();
        assert_eq!(bare.as_deref(), Some("forbidden"));
        assert!(body(Some("  "), None).into_message().is_none());
    }

    #[test]
    fn test_debug_shows_base_url() {
        let api = client("http://localhost:5000/");
        assert!(format!("{api:?}").contains("localhost:5000"));
    }
}
