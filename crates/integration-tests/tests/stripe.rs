//! Integration tests for card confirmation against a mocked Stripe API.

use blitzshop_core::OrderId;
use blitzshop_storefront::ClientError;
use blitzshop_storefront::api::PaymentIntent;
use blitzshop_storefront::checkout::PaymentConfirmer;
use blitzshop_storefront::config::StripeConfig;
use blitzshop_storefront::stripe::StripeConfirmer;
use httpmock::prelude::*;
use rust_decimal_macros::dec;
use secrecy::SecretString;
use serde_json::json;
use url::Url;

const CONFIRM_PATH: &str = "/v1/payment_intents/pi_123/confirm";

fn confirmer(server: &MockServer) -> StripeConfirmer {
    StripeConfirmer::new(StripeConfig {
        publishable_key: SecretString::from("pk_test_abc"),
        api_url: Url::parse(&format!("{}/", server.base_url())).unwrap(),
        payment_method: "pm_1Nc8".to_string(),
    })
}

fn intent() -> PaymentIntent {
    PaymentIntent {
        payment_intent_id: "pi_123".into(),
        client_secret: "pi_123_secret_abc".into(),
        amount: dec!(81),
        currency: "usd".into(),
        order_id: OrderId::new(42),
        status: "requires_payment_method".into(),
    }
}

async fn mock_status<'a>(server: &'a MockServer, status: &str) -> httpmock::Mock<'a> {
    let body = json!({ "id": "pi_123", "status": status });
    server
        .mock_async(|when, then| {
            when.method(POST).path(CONFIRM_PATH);
            then.status(200).json_body(body);
        })
        .await
}

#[tokio::test]
async fn test_succeeded_intent_is_confirmed() {
    let server = MockServer::start_async().await;
    let confirm = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(CONFIRM_PATH)
                .x_www_form_urlencoded_tuple("key", "pk_test_abc")
                .x_www_form_urlencoded_tuple("client_secret", "pi_123_secret_abc")
                .x_www_form_urlencoded_tuple("payment_method", "pm_1Nc8");
            then.status(200)
                .json_body(json!({ "id": "pi_123", "status": "succeeded" }));
        })
        .await;

    let confirmed = confirmer(&server)
        .confirm_card_payment(&intent())
        .await
        .unwrap();

    confirm.assert_async().await;
    assert_eq!(confirmed.payment_intent_id, "pi_123");
    assert_eq!(confirmed.status, "succeeded");
}

#[tokio::test]
async fn test_processing_intent_is_accepted() {
    let server = MockServer::start_async().await;
    mock_status(&server, "processing").await;

    let confirmed = confirmer(&server)
        .confirm_card_payment(&intent())
        .await
        .unwrap();

    assert_eq!(confirmed.status, "processing");
}

#[tokio::test]
async fn test_intent_needing_authentication_is_rejected() {
    let server = MockServer::start_async().await;
    mock_status(&server, "requires_action").await;

    let err = confirmer(&server)
        .confirm_card_payment(&intent())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Payment(_)));
    assert_eq!(err.to_string(), "Payment requires additional authentication");
}

#[tokio::test]
async fn test_unfinished_intent_reports_its_status() {
    let server = MockServer::start_async().await;
    mock_status(&server, "requires_payment_method").await;

    let err = confirmer(&server)
        .confirm_card_payment(&intent())
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Payment not completed (requires_payment_method)"
    );
}

#[tokio::test]
async fn test_card_error_uses_provider_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(CONFIRM_PATH);
            then.status(402).json_body(json!({
                "error": {
                    "type": "card_error",
                    "code": "card_declined",
                    "message": "Your card was declined."
                }
            }));
        })
        .await;

    let err = confirmer(&server)
        .confirm_card_payment(&intent())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Payment(ref m) if m == "Your card was declined."));
}

#[tokio::test]
async fn test_error_without_message_falls_back() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(CONFIRM_PATH);
            then.status(500).body("upstream failure");
        })
        .await;

    let err = confirmer(&server)
        .confirm_card_payment(&intent())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Payment failed");
}
