//! Card confirmation through Stripe's client-side API.
//!
//! Speaks the same endpoint the browser widget uses: the intent is confirmed
//! with its client secret and a tokenized payment method, authenticated only
//! by the publishable key. No secret key ever reaches the client.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::api::PaymentIntent;
use crate::checkout::{ConfirmedPayment, PaymentConfirmer};
use crate::config::StripeConfig;
use crate::error::{ClientError, Result};

#[derive(Deserialize)]
struct IntentResponse {
    id: String,
    status: String,
}

#[derive(Debug, Default, Deserialize)]
struct StripeErrorBody {
    error: Option<StripeErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

/// [`PaymentConfirmer`] backed by Stripe.
#[derive(Debug, Clone)]
pub struct StripeConfirmer {
    client: reqwest::Client,
    config: StripeConfig,
}

impl StripeConfirmer {
    #[must_use]
    pub fn new(config: StripeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl PaymentConfirmer for StripeConfirmer {
    #[instrument(skip(self, intent), fields(payment_intent_id = %intent.payment_intent_id))]
    async fn confirm_card_payment(&self, intent: &PaymentIntent) -> Result<ConfirmedPayment> {
        let url = self
            .config
            .api_url
            .join(&format!(
                "v1/payment_intents/{}/confirm",
                intent.payment_intent_id
            ))
            .map_err(|e| ClientError::Parse(format!("Invalid Stripe URL: {e}")))?;

        let response = self
            .client
            .post(url)
            .form(&[
                ("key", self.config.publishable_key.expose_secret()),
                ("client_secret", intent.client_secret.as_str()),
                ("payment_method", self.config.payment_method.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let body: StripeErrorBody = response.json().await.unwrap_or_default();
            let message = body
                .error
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Payment failed".to_string());
            return Err(ClientError::Payment(message));
        }

        let confirmed: IntentResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(format!("Failed to parse Stripe response: {e}")))?;
        debug!(status = %confirmed.status, "Stripe confirmation finished");

        match confirmed.status.as_str() {
            "succeeded" | "processing" => Ok(ConfirmedPayment {
                payment_intent_id: confirmed.id,
                status: confirmed.status,
            }),
            "requires_action" => Err(ClientError::Payment(
                "Payment requires additional authentication".to_string(),
            )),
            other => Err(ClientError::Payment(format!(
                "Payment not completed ({other})"
            ))),
        }
    }
}
