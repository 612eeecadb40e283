//! Payment endpoints (`/api/payments/*`).

use blitzshop_core::{Order, OrderId};
use reqwest::Method;
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::ApiClient;
use crate::error::ClientError;

/// Payment intent created for an order.
///
/// Implements `Debug` manually to redact the client secret.
#[derive(Clone, Deserialize)]
pub struct PaymentIntent {
    pub payment_intent_id: String,
    pub client_secret: String,
    pub amount: Decimal,
    pub currency: String,
    pub order_id: OrderId,
    pub status: String,
}

impl std::fmt::Debug for PaymentIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentIntent")
            .field("payment_intent_id", &self.payment_intent_id)
            .field("client_secret", &"[REDACTED]")
            .field("amount", &self.amount)
            .field("currency", &self.currency)
            .field("order_id", &self.order_id)
            .field("status", &self.status)
            .finish()
    }
}

/// Result of server-side payment confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub message: Option<String>,
    pub order: Order,
}

#[derive(Serialize)]
struct IntentBody {
    order_id: OrderId,
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
}

#[derive(Serialize)]
struct ConfirmBody<'a> {
    payment_intent_id: &'a str,
}

impl ApiClient {
    /// Create a payment intent for a pending order.
    ///
    /// `amount` is the total shown to the shopper, discount included.
    ///
    /// # Errors
    ///
    /// Returns "Order cannot be paid" for orders that are no longer pending.
    #[instrument(skip(self, token), fields(order_id = %order_id))]
    pub async fn create_payment_intent(
        &self,
        token: &SecretString,
        order_id: OrderId,
        amount: Decimal,
    ) -> Result<PaymentIntent, ClientError> {
        let request = self
            .request(Method::POST, "api/payments/create-intent", &[], Some(token))?
            .json(&IntentBody { order_id, amount });
        self.send(request, "Error creating payment intent").await
    }

    /// Ask the server to verify a confirmed intent and update the order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn confirm_payment(
        &self,
        token: &SecretString,
        payment_intent_id: &str,
    ) -> Result<PaymentConfirmation, ClientError> {
        let request = self
            .request(Method::POST, "api/payments/confirm", &[], Some(token))?
            .json(&ConfirmBody { payment_intent_id });
        self.send(request, "Error confirming payment").await
    }
}
