//! Order endpoints (`/api/orders/*`, `/api/users/orders`).

use blitzshop_core::{
    LimitPage, Order, OrderAddresses, OrderCouponUpdate, OrderHistoryPage, OrderId, OrderSummary,
};
use reqwest::Method;
use secrecy::SecretString;
use serde::Deserialize;
use serde::de::IgnoredAny;
use tracing::instrument;

use super::ApiClient;
use crate::error::ClientError;

/// `{"order"}` envelope of order reads and writes.
#[derive(Deserialize)]
struct OrderEnvelope {
    order: Order,
}

impl ApiClient {
    /// Create an order from the server-side cart.
    ///
    /// The server empties the cart on success.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with "Cart is empty" or a stock message on 400.
    #[instrument(skip(self, token, addresses))]
    pub async fn create_order(
        &self,
        token: &SecretString,
        addresses: &OrderAddresses,
    ) -> Result<Order, ClientError> {
        let request = self
            .request(Method::POST, "api/orders/create", &[], Some(token))?
            .json(addresses);
        let envelope: OrderEnvelope = self.send(request, "Error creating order").await?;
        Ok(envelope.order)
    }

    /// Get one of the signed-in user's orders.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the order does not belong to the user.
    #[instrument(skip(self, token), fields(order_id = %id))]
    pub async fn order(&self, token: &SecretString, id: OrderId) -> Result<Order, ClientError> {
        let request = self.request(Method::GET, &format!("api/orders/{id}"), &[], Some(token))?;
        let envelope: OrderEnvelope = self.send(request, "Order not found").await?;
        Ok(envelope.order)
    }

    /// Page through the signed-in user's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn my_orders(
        &self,
        token: &SecretString,
        page: u32,
        limit: u32,
    ) -> Result<LimitPage<OrderSummary>, ClientError> {
        let request = self.request(
            Method::GET,
            "api/orders/my",
            &[
                ("page", Some(page.to_string())),
                ("limit", Some(limit.to_string())),
            ],
            Some(token),
        )?;
        self.send(request, "Error listing orders").await
    }

    /// Order history with line items, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn order_history(
        &self,
        token: &SecretString,
        page: u32,
        per_page: u32,
    ) -> Result<OrderHistoryPage, ClientError> {
        let request = self.request(
            Method::GET,
            "api/users/orders",
            &[
                ("page", Some(page.to_string())),
                ("per_page", Some(per_page.to_string())),
            ],
            Some(token),
        )?;
        self.send(request, "Failed to load order history").await
    }

    /// Record (or clear) the coupon applied to an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token, update), fields(order_id = %id))]
    pub async fn record_order_coupon(
        &self,
        token: &SecretString,
        id: OrderId,
        update: &OrderCouponUpdate,
    ) -> Result<(), ClientError> {
        let request = self
            .request(Method::PUT, &format!("api/orders/{id}"), &[], Some(token))?
            .json(update);
        let _: IgnoredAny = self.send(request, "Failed to update order").await?;
        Ok(())
    }
}
