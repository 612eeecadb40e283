//! Optimistic shopping cart.
//!
//! The store keeps a local copy of the server cart and edits it before the
//! server answers. Each mutation has exactly one way back when the server
//! rejects it:
//!
//! - `add` on a product already in the cart bumps its quantity first and
//!   subtracts the same amount on failure. This is a compensating edit,
//!   not a snapshot restore.
//! - `add` on a new product waits for the server, then refetches the list.
//! - `update`, `remove` and `clear` snapshot the list, edit it, and put the
//!   snapshot back on failure.
//!
//! Calls are neither queued nor coalesced. The lock is only held for the
//! synchronous edit, never across a request.

use std::sync::Arc;

use async_trait::async_trait;
use blitzshop_core::{CartItem, CartItemId, CartSnapshot, ProductId};
use rust_decimal::Decimal;
use secrecy::SecretString;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::error::{ClientError, Result, add_breadcrumb};
use crate::session::SessionStore;
use crate::validation::ValidationError;

/// Remote cart resource.
#[async_trait]
pub trait CartApi: Send + Sync {
    /// Full cart listing.
    async fn fetch_cart(&self, token: &SecretString) -> Result<CartSnapshot>;

    /// Add `quantity` units of a product, merging with an existing line.
    async fn add_item(&self, token: &SecretString, product_id: ProductId, quantity: u32)
    -> Result<()>;

    /// Set the quantity of a line.
    async fn update_item(&self, token: &SecretString, item_id: CartItemId, quantity: u32)
    -> Result<()>;

    /// Delete a line.
    async fn remove_item(&self, token: &SecretString, item_id: CartItemId) -> Result<()>;

    /// Delete every line.
    async fn clear_cart(&self, token: &SecretString) -> Result<()>;
}

/// In-memory cart synchronized with the remote cart.
pub struct CartStore {
    api: Arc<dyn CartApi>,
    session: Arc<SessionStore>,
    items: RwLock<Vec<CartItem>>,
}

impl CartStore {
    #[must_use]
    pub fn new(api: Arc<dyn CartApi>, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            items: RwLock::new(Vec::new()),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` units of a product.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` or `InvalidQuantity` before touching state,
    /// otherwise the server's message (for example "Insufficient stock").
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add(&self, product_id: ProductId, quantity: u32) -> Result<()> {
        let token = self.session.require_token().await?;
        if quantity == 0 {
            return Err(ValidationError::InvalidQuantity.into());
        }

        let bumped = {
            let mut items = self.items.write().await;
            match items.iter_mut().find(|item| item.product_id == product_id) {
                Some(item) => {
                    item.set_quantity(item.quantity.saturating_add(quantity));
                    true
                }
                None => false,
            }
        };

        if bumped {
            if let Err(e) = self.api.add_item(&token, product_id, quantity).await {
                warn!(error = %e, "Add to cart rejected, reverting quantity");
                let mut items = self.items.write().await;
                if let Some(item) = items.iter_mut().find(|item| item.product_id == product_id) {
                    item.set_quantity(item.quantity.saturating_sub(quantity));
                }
                return Err(e);
            }
        } else {
            self.api.add_item(&token, product_id, quantity).await?;
            if let Err(e) = self.refresh().await {
                warn!(error = %e, "Cart refetch after add failed");
            }
        }

        let product = product_id.to_string();
        add_breadcrumb(
            "cart",
            "Added to cart",
            Some(&[("product_id", product.as_str())][..]),
        );
        Ok(())
    }

    /// Set the quantity of a line; zero removes it.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` before touching state, otherwise the server's
    /// message. The list is restored to its pre-call state on failure.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn update(&self, item_id: CartItemId, quantity: u32) -> Result<()> {
        let token = self.session.require_token().await?;

        let snapshot = {
            let mut items = self.items.write().await;
            let snapshot = items.clone();
            if quantity == 0 {
                items.retain(|item| item.id != Some(item_id));
            } else if let Some(item) = items.iter_mut().find(|item| item.id == Some(item_id)) {
                item.set_quantity(quantity);
            }
            snapshot
        };

        if let Err(e) = self.api.update_item(&token, item_id, quantity).await {
            self.restore(snapshot, &e).await;
            return Err(e);
        }
        Ok(())
    }

    /// Delete a line.
    ///
    /// # Errors
    ///
    /// Same as [`CartStore::update`].
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn remove(&self, item_id: CartItemId) -> Result<()> {
        let token = self.session.require_token().await?;

        let snapshot = {
            let mut items = self.items.write().await;
            let snapshot = items.clone();
            items.retain(|item| item.id != Some(item_id));
            snapshot
        };

        if let Err(e) = self.api.remove_item(&token, item_id).await {
            self.restore(snapshot, &e).await;
            return Err(e);
        }
        Ok(())
    }

    /// Delete every line.
    ///
    /// # Errors
    ///
    /// Same as [`CartStore::update`].
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<()> {
        let token = self.session.require_token().await?;

        let snapshot = std::mem::take(&mut *self.items.write().await);

        if let Err(e) = self.api.clear_cart(&token).await {
            self.restore(snapshot, &e).await;
            return Err(e);
        }
        add_breadcrumb("cart", "Cleared cart", None);
        Ok(())
    }

    /// Replace the local list with the server's.
    ///
    /// Signed out, the list is simply emptied.
    ///
    /// # Errors
    ///
    /// Returns the request error; the list is emptied in that case.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        let Some(token) = self.session.token().await else {
            self.items.write().await.clear();
            return Ok(());
        };

        match self.api.fetch_cart(&token).await {
            Ok(snapshot) => {
                debug!(lines = snapshot.cart_items.len(), "Cart refreshed");
                *self.items.write().await = snapshot.cart_items;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Cart fetch failed, emptying local cart");
                self.items.write().await.clear();
                Err(e)
            }
        }
    }

    /// Drop the local list without a request (sign-out).
    pub async fn reset(&self) {
        self.items.write().await.clear();
    }

    async fn restore(&self, snapshot: Vec<CartItem>, error: &ClientError) {
        warn!(error = %error, "Cart update rejected, restoring snapshot");
        *self.items.write().await = snapshot;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn items(&self) -> Vec<CartItem> {
        self.items.read().await.clone()
    }

    /// Sum of quantities.
    pub async fn total_items(&self) -> u32 {
        self.items.read().await.iter().map(|item| item.quantity).sum()
    }

    /// Sum of `unit_price × quantity`.
    pub async fn total_price(&self) -> Decimal {
        self.items.read().await.iter().map(CartItem::line_total).sum()
    }

    pub async fn is_in_cart(&self, product_id: ProductId) -> bool {
        self.items
            .read()
            .await
            .iter()
            .any(|item| item.product_id == product_id)
    }

    /// Quantity of a product in the cart, 0 when absent.
    pub async fn product_quantity(&self, product_id: ProductId) -> u32 {
        self.items
            .read()
            .await
            .iter()
            .find(|item| item.product_id == product_id)
            .map_or(0, |item| item.quantity)
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use blitzshop_core::{Email, User};
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;
    use crate::api::{AuthApi, AuthResponse, RegisterRequest};
    use crate::storage::MemoryStore;

    struct StaticAuth;

    #[async_trait]
    impl AuthApi for StaticAuth {
        async fn login(&self, _email: &Email, _password: &str) -> Result<AuthResponse> {
            let user: User =
                serde_json::from_value(json!({ "id": 1, "email": "ana@example.com" })).unwrap();
            Ok(AuthResponse {
                message: None,
                user,
                access_token: SecretString::from("jwt"),
                refresh_token: None,
            })
        }

        async fn register(&self, _request: &RegisterRequest) -> Result<AuthResponse> {
            Err(ClientError::Forbidden)
        }
    }

    /// Server cart double. Mutations succeed unless `fail` is set.
    #[derive(Default)]
    struct FakeCart {
        server: Mutex<Vec<CartItem>>,
        fail: Mutex<Option<String>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeCart {
        fn fail_with(&self, message: &str) {
            *self.fail.lock().unwrap() = Some(message.to_string());
        }

        fn check(&self, call: String) -> Result<()> {
            self.calls.lock().unwrap().push(call);
            match self.fail.lock().unwrap().clone() {
                Some(message) => Err(ClientError::Api {
                    status: 400,
                    message,
                }),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl CartApi for FakeCart {
        async fn fetch_cart(&self, _token: &SecretString) -> Result<CartSnapshot> {
            self.check("fetch".into())?;
            Ok(CartSnapshot {
                cart_items: self.server.lock().unwrap().clone(),
                total_items: None,
                total_price: None,
            })
        }

        async fn add_item(
            &self,
            _token: &SecretString,
            product_id: ProductId,
            quantity: u32,
        ) -> Result<()> {
            self.check(format!("add {product_id} {quantity}"))?;
            let mut server = self.server.lock().unwrap();
            match server.iter_mut().find(|i| i.product_id == product_id) {
                Some(item) => item.set_quantity(item.quantity + quantity),
                None => {
                    let id = i32::try_from(server.len()).unwrap() + 100;
                    server.push(line(id, product_id.as_i32(), quantity, dec!(2.50)));
                }
            }
            Ok(())
        }

        async fn update_item(
            &self,
            _token: &SecretString,
            item_id: CartItemId,
            quantity: u32,
        ) -> Result<()> {
            self.check(format!("update {item_id} {quantity}"))
        }

        async fn remove_item(&self, _token: &SecretString, item_id: CartItemId) -> Result<()> {
            self.check(format!("remove {item_id}"))
        }

        async fn clear_cart(&self, _token: &SecretString) -> Result<()> {
            self.check("clear".into())
        }
    }

    fn line(id: i32, product_id: i32, quantity: u32, unit_price: Decimal) -> CartItem {
        let mut item = CartItem {
            id: Some(CartItemId::new(id)),
            product_id: ProductId::new(product_id),
            quantity,
            unit_price,
            total_price: Decimal::ZERO,
            product: None,
        };
        item.set_quantity(quantity);
        item
    }

    async fn signed_in(server: Vec<CartItem>) -> (CartStore, Arc<FakeCart>) {
        let session = Arc::new(SessionStore::new(
            Arc::new(StaticAuth),
            Arc::new(MemoryStore::new()),
        ));
        session.login("ana@example.com", "secret1").await.unwrap();

        let api = Arc::new(FakeCart {
            server: Mutex::new(server),
            ..FakeCart::default()
        });
        let cart = CartStore::new(api.clone(), session);
        cart.refresh().await.unwrap();
        api.calls.lock().unwrap().clear();
        (cart, api)
    }

    #[tokio::test]
    async fn test_totals_follow_unit_price_times_quantity() {
        let (cart, _) = signed_in(vec![
            line(1, 10, 2, dec!(3.25)),
            line(2, 11, 1, dec!(10.00)),
        ])
        .await;

        assert_eq!(cart.total_items().await, 3);
        assert_eq!(cart.total_price().await, dec!(16.50));
        assert!(cart.is_in_cart(ProductId::new(10)).await);
        assert_eq!(cart.product_quantity(ProductId::new(12)).await, 0);
    }

    #[tokio::test]
    async fn test_add_existing_item_increments_locally() {
        let (cart, api) = signed_in(vec![line(1, 10, 2, dec!(3.00))]).await;

        cart.add(ProductId::new(10), 3).await.unwrap();

        assert_eq!(cart.product_quantity(ProductId::new(10)).await, 5);
        assert_eq!(cart.items().await[0].total_price, dec!(15.00));
        assert_eq!(*api.calls.lock().unwrap(), vec!["add 10 3".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_add_reverts_by_same_amount() {
        let (cart, api) = signed_in(vec![line(1, 10, 2, dec!(3.00))]).await;
        api.fail_with("Insufficient stock");

        let err = cart.add(ProductId::new(10), 4).await.unwrap_err();

        assert_eq!(err.to_string(), "Insufficient stock");
        assert_eq!(cart.product_quantity(ProductId::new(10)).await, 2);
        assert_eq!(cart.items().await[0].total_price, dec!(6.00));
    }

    #[tokio::test]
    async fn test_add_new_item_refetches() {
        let (cart, api) = signed_in(Vec::new()).await;

        cart.add(ProductId::new(42), 1).await.unwrap();

        assert_eq!(cart.product_quantity(ProductId::new(42)).await, 1);
        assert_eq!(
            *api.calls.lock().unwrap(),
            vec!["add 42 1".to_string(), "fetch".to_string()]
        );
    }

    #[tokio::test]
    async fn test_failed_add_of_new_item_leaves_cart_alone() {
        let (cart, api) = signed_in(vec![line(1, 10, 1, dec!(1.00))]).await;
        api.fail_with("Product not found");

        assert!(cart.add(ProductId::new(99), 1).await.is_err());
        assert_eq!(cart.items().await.len(), 1);
    }

    #[tokio::test]
    async fn test_zero_quantity_add_is_rejected_locally() {
        let (cart, api) = signed_in(Vec::new()).await;

        let err = cart.add(ProductId::new(1), 0).await.unwrap_err();
        assert!(err.is_validation());
        assert!(api.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_update_restores_snapshot() {
        let before = vec![line(1, 10, 2, dec!(3.00)), line(2, 11, 1, dec!(5.00))];
        let (cart, api) = signed_in(before.clone()).await;
        api.fail_with("Insufficient stock");

        assert!(cart.update(CartItemId::new(1), 9).await.is_err());
        assert_eq!(cart.items().await, before);

        assert!(cart.update(CartItemId::new(1), 0).await.is_err());
        assert_eq!(cart.items().await, before);
    }

    #[tokio::test]
    async fn test_update_to_zero_removes_line() {
        let (cart, _) = signed_in(vec![line(1, 10, 2, dec!(3.00))]).await;

        cart.update(CartItemId::new(1), 0).await.unwrap();
        assert!(cart.items().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_remove_and_clear_restore_snapshot() {
        let before = vec![line(1, 10, 2, dec!(3.00)), line(2, 11, 1, dec!(5.00))];
        let (cart, api) = signed_in(before.clone()).await;
        api.fail_with("Failed to remove from cart");

        assert!(cart.remove(CartItemId::new(2)).await.is_err());
        assert_eq!(cart.items().await, before);

        assert!(cart.clear().await.is_err());
        assert_eq!(cart.items().await, before);
    }

    #[tokio::test]
    async fn test_clear_empties_cart() {
        let (cart, _) = signed_in(vec![line(1, 10, 2, dec!(3.00))]).await;

        cart.clear().await.unwrap();
        assert_eq!(cart.total_items().await, 0);
        assert_eq!(cart.total_price().await, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_failed_refresh_empties_cart() {
        let (cart, api) = signed_in(vec![line(1, 10, 2, dec!(3.00))]).await;
        api.fail_with("Internal error");

        assert!(cart.refresh().await.is_err());
        assert!(cart.items().await.is_empty());
    }

    #[tokio::test]
    async fn test_signed_out_mutations_fail_without_request() {
        let session = Arc::new(SessionStore::new(
            Arc::new(StaticAuth),
            Arc::new(MemoryStore::new()),
        ));
        let api = Arc::new(FakeCart::default());
        let cart = CartStore::new(api.clone(), session);

        assert!(matches!(
            cart.add(ProductId::new(1), 1).await,
            Err(ClientError::Unauthenticated)
        ));
        assert!(matches!(
            cart.clear().await,
            Err(ClientError::Unauthenticated)
        ));
        assert!(api.calls.lock().unwrap().is_empty());
    }
}
