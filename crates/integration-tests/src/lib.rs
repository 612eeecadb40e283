//! Integration tests for the BlitzShop client SDKs.
//!
//! Each test starts an `httpmock` server standing in for the BlitzShop REST
//! API and drives the real [`ApiClient`] against it.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p blitzshop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session` - Sign-in, persistence and sign-out
//! - `cart` - Optimistic cart updates and rollback
//! - `checkout` - Orders, coupons and payment
//! - `catalog` - Product listing, caching and error mapping
//! - `invoices` - Shopper invoice access and 403 handling
//! - `reviews` - Product reviews and review eligibility
//! - `stripe` - Card confirmation against the payment provider
//! - `admin` - Admin gate, management and analytics

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::time::Duration;

use blitzshop_storefront::storage::{MemoryStore, keys};
use blitzshop_storefront::{ApiClient, KeyValueStore, Storefront};
use httpmock::MockServer;
use serde_json::{Value, json};
use url::Url;

/// Bearer token handed out by [`TestContext::mock_login`].
pub const TOKEN: &str = "test-token";

/// `Authorization` header value carrying [`TOKEN`].
pub const BEARER: &str = "Bearer test-token";

/// A mock API server, a client pointed at it and in-memory storage.
pub struct TestContext {
    pub server: MockServer,
    pub api: ApiClient,
    pub storage: MemoryStore,
}

impl TestContext {
    /// Start a mock server with a client using a one-minute catalog cache.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URL cannot be parsed.
    #[allow(clippy::unwrap_used)]
    pub async fn new() -> Self {
        let server = MockServer::start_async().await;
        let base_url = Url::parse(&server.base_url()).unwrap();
        let api = ApiClient::with_http_client(
            reqwest::Client::new(),
            base_url,
            Duration::from_secs(60),
        );
        Self {
            server,
            api,
            storage: MemoryStore::new(),
        }
    }

    /// Build a storefront over this context's client and storage.
    ///
    /// # Panics
    ///
    /// Panics if the in-memory storage fails, which it cannot.
    #[allow(clippy::unwrap_used)]
    pub async fn storefront(&self) -> Storefront {
        let storage: Arc<dyn KeyValueStore> = Arc::new(self.storage.clone());
        Storefront::with_api(self.api.clone(), storage).await.unwrap()
    }

    /// Persist a signed-in session directly, as a previous run would have.
    ///
    /// # Panics
    ///
    /// Panics if the in-memory storage fails, which it cannot.
    #[allow(clippy::unwrap_used)]
    pub async fn seed_session(&self, user: &Value) {
        self.storage.set(keys::TOKEN, TOKEN).await.unwrap();
        self.storage.set(keys::USER, &user.to_string()).await.unwrap();
        self.storage
            .set(keys::USER_ID, &user["id"].to_string())
            .await
            .unwrap();
    }

    /// Mock a successful sign-in for `user`.
    pub async fn mock_login(&self, user: &Value) -> httpmock::Mock<'_> {
        let body = json!({
            "message": "Login successful",
            "user": user,
            "access_token": TOKEN,
            "refresh_token": "refresh",
        });
        self.server
            .mock_async(|when, then| {
                when.method(httpmock::Method::POST).path("/api/auth/login");
                then.status(200).json_body(body);
            })
            .await
    }

    /// Mock the cart listing with `items`.
    pub async fn mock_cart(&self, items: Value) -> httpmock::Mock<'_> {
        self.server
            .mock_async(|when, then| {
                when.method(httpmock::Method::GET)
                    .path("/api/cart/")
                    .header("authorization", BEARER);
                then.status(200).json_body(json!({ "cart_items": items }));
            })
            .await
    }
}

/// A shopper account.
#[must_use]
pub fn shopper() -> Value {
    json!({
        "id": 7,
        "email": "ana@example.com",
        "username": "ana",
        "first_name": "Ana",
        "last_name": "Lopez",
        "is_admin": false,
        "is_active": true
    })
}

/// An administrator account.
#[must_use]
pub fn admin_user() -> Value {
    json!({
        "id": 1,
        "email": "admin@example.com",
        "username": "admin",
        "is_admin": true,
        "is_active": true
    })
}

/// A cart line as listed by `GET /api/cart/`.
#[must_use]
pub fn cart_line(id: i32, product_id: i32, quantity: u32, unit_price: f64) -> Value {
    json!({
        "id": id,
        "product_id": product_id,
        "quantity": quantity,
        "unit_price": unit_price,
        "total_price": unit_price * f64::from(quantity),
        "product": { "name": format!("Product {product_id}"), "stock": 50 }
    })
}
