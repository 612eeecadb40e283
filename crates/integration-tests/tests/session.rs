//! Integration tests for sign-in, session persistence and sign-out.

use blitzshop_integration_tests::{BEARER, TOKEN, TestContext, cart_line, shopper};
use blitzshop_storefront::ClientError;
use blitzshop_storefront::storage::{KeyValueStore, keys};
use httpmock::prelude::*;
use secrecy::ExposeSecret;
use serde_json::json;

#[tokio::test]
async fn test_login_persists_session_and_loads_cart() {
    let ctx = TestContext::new().await;
    let login = ctx.mock_login(&shopper()).await;
    let cart = ctx.mock_cart(json!([cart_line(1, 3, 2, 4.5)])).await;

    let shop = ctx.storefront().await;
    let user = shop.login("ana@example.com", "secret1").await.unwrap();

    login.assert_async().await;
    cart.assert_async().await;
    assert_eq!(user.id.as_i32(), 7);
    assert!(shop.session().is_authenticated().await);
    assert_eq!(
        shop.session().token().await.unwrap().expose_secret(),
        TOKEN
    );
    assert_eq!(shop.cart().total_items().await, 2);

    assert_eq!(
        ctx.storage.get(keys::TOKEN).await.unwrap().as_deref(),
        Some(TOKEN)
    );
    assert_eq!(
        ctx.storage.get(keys::USER_ID).await.unwrap().as_deref(),
        Some("7")
    );
    let stored: serde_json::Value =
        serde_json::from_str(&ctx.storage.get(keys::USER).await.unwrap().unwrap()).unwrap();
    assert_eq!(stored["email"], "ana@example.com");
}

#[tokio::test]
async fn test_login_failure_surfaces_server_message() {
    let ctx = TestContext::new().await;
    ctx.server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(401)
                .json_body(json!({ "error": "Invalid email or password" }));
        })
        .await;

    let shop = ctx.storefront().await;
    let err = shop
        .login("ana@example.com", "wrong-password")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Invalid email or password");
    assert!(!shop.session().is_authenticated().await);
    assert!(ctx.storage.is_empty().await);
}

#[tokio::test]
async fn test_invalid_login_form_sends_no_request() {
    let ctx = TestContext::new().await;
    let login = ctx.mock_login(&shopper()).await;

    let shop = ctx.storefront().await;
    let err = shop.login("not-an-email", "secret1").await.unwrap_err();
    assert!(err.is_validation());

    let err = shop.login("ana@example.com", "123").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    login.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_restore_uses_persisted_session() {
    let ctx = TestContext::new().await;
    ctx.seed_session(&shopper()).await;
    let cart = ctx.mock_cart(json!([cart_line(4, 9, 1, 12.0)])).await;

    let shop = ctx.storefront().await;

    cart.assert_async().await;
    assert!(shop.session().is_authenticated().await);
    assert_eq!(
        shop.session().user().await.unwrap().email.as_str(),
        "ana@example.com"
    );
    assert!(shop.cart().is_in_cart(blitzshop_core::ProductId::new(9)).await);
}

#[tokio::test]
async fn test_logout_clears_all_persisted_keys() {
    let ctx = TestContext::new().await;
    ctx.seed_session(&shopper()).await;
    ctx.mock_cart(json!([cart_line(1, 3, 2, 4.5)])).await;

    let shop = ctx.storefront().await;
    assert_eq!(shop.cart().total_items().await, 2);

    shop.logout().await.unwrap();

    for key in keys::ALL {
        assert!(ctx.storage.get(key).await.unwrap().is_none(), "{key} kept");
    }
    assert!(!shop.session().is_authenticated().await);
    assert!(shop.session().user().await.is_none());
    assert_eq!(shop.cart().total_items().await, 0);
}

#[tokio::test]
async fn test_update_profile_refreshes_session_user() {
    let ctx = TestContext::new().await;
    ctx.seed_session(&shopper()).await;
    ctx.mock_cart(json!([])).await;

    let mut updated = shopper();
    updated["first_name"] = json!("Anabel");
    let mock = ctx
        .server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/users/profile")
                .header("authorization", BEARER)
                .json_body(json!({ "first_name": "Anabel" }));
            then.status(200)
                .json_body(json!({ "message": "Profile updated", "user": updated }));
        })
        .await;

    let shop = ctx.storefront().await;
    let update = blitzshop_core::ProfileUpdate {
        first_name: Some("Anabel".into()),
        ..Default::default()
    };
    shop.update_profile(&update).await.unwrap();

    mock.assert_async().await;
    let user = shop.session().user().await.unwrap();
    assert_eq!(user.first_name.as_deref(), Some("Anabel"));

    let stored = ctx.storage.get(keys::USER).await.unwrap().unwrap();
    assert!(stored.contains("Anabel"));
}

#[tokio::test]
async fn test_delete_account_signs_out() {
    let ctx = TestContext::new().await;
    ctx.seed_session(&shopper()).await;
    ctx.mock_cart(json!([])).await;
    let mock = ctx
        .server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path("/api/users/delete-account")
                .json_body(json!({ "password": "secret1" }));
            then.status(200)
                .json_body(json!({ "message": "Account deactivated successfully" }));
        })
        .await;

    let shop = ctx.storefront().await;
    shop.delete_account("secret1").await.unwrap();

    mock.assert_async().await;
    assert!(!shop.session().is_authenticated().await);
    assert!(ctx.storage.get(keys::TOKEN).await.unwrap().is_none());
}
