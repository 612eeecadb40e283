//! Integration tests for the admin gate, management calls and analytics.

use blitzshop_admin::{AdminClient, ExportRange};
use blitzshop_core::{CouponDraft, ExportKind, OrderId, OrderStatus, ProductId};
use blitzshop_integration_tests::{BEARER, TestContext, admin_user, shopper};
use blitzshop_storefront::{ClientError, Storefront};
use chrono::NaiveDate;
use httpmock::prelude::*;
use httpmock::Method::PATCH;
use rust_decimal_macros::dec;
use serde_json::json;

async fn admin_session(ctx: &TestContext) -> (Storefront, AdminClient) {
    ctx.seed_session(&admin_user()).await;
    ctx.mock_cart(json!([])).await;
    let shop = ctx.storefront().await;
    let admin = AdminClient::new(shop.api().clone(), shop.session_handle())
        .await
        .unwrap();
    (shop, admin)
}

#[tokio::test]
async fn test_shopper_is_refused_without_request() {
    let ctx = TestContext::new().await;
    ctx.seed_session(&shopper()).await;
    ctx.mock_cart(json!([])).await;
    let dashboard = ctx
        .server
        .mock_async(|when, then| {
            when.path("/api/analytics/dashboard");
            then.status(200).json_body(json!({}));
        })
        .await;
    let shop = ctx.storefront().await;

    let err = AdminClient::new(shop.api().clone(), shop.session_handle())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Forbidden));
    dashboard.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_signed_out_admin_client_is_unauthenticated() {
    let ctx = TestContext::new().await;
    let shop = ctx.storefront().await;

    let err = AdminClient::new(shop.api().clone(), shop.session_handle())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Unauthenticated));
}

#[tokio::test]
async fn test_sign_out_stops_admin_calls() {
    let ctx = TestContext::new().await;
    let (shop, admin) = admin_session(&ctx).await;
    let dashboard = ctx
        .server
        .mock_async(|when, then| {
            when.path("/api/analytics/dashboard");
            then.status(200).json_body(json!({}));
        })
        .await;

    shop.logout().await.unwrap();
    let err = admin.dashboard().await.unwrap_err();

    assert!(matches!(err, ClientError::Unauthenticated));
    dashboard.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_server_side_forbidden_maps_to_forbidden() {
    let ctx = TestContext::new().await;
    let (_shop, admin) = admin_session(&ctx).await;
    ctx.server
        .mock_async(|when, then| {
            when.method(GET).path("/api/admin/orders");
            then.status(403)
                .json_body(json!({ "error": "Admin access required" }));
        })
        .await;

    let err = admin.list_orders(None, None, None).await.unwrap_err();

    assert!(matches!(err, ClientError::Forbidden));
}

#[tokio::test]
async fn test_daily_revenue_clamps_days() {
    let ctx = TestContext::new().await;
    let (_shop, admin) = admin_session(&ctx).await;
    let revenue = ctx
        .server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/analytics/revenue/daily")
                .header("authorization", BEARER)
                .query_param("days", "365");
            then.status(200).json_body(json!([
                { "date": "2024-03-01", "revenue": 120.5, "orders": 3 },
                { "date": "2024-03-02", "revenue": 0, "orders": 0 }
            ]));
        })
        .await;

    let days = admin.daily_revenue(Some(5000)).await.unwrap();

    revenue.assert_async().await;
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].revenue, dec!(120.5));
}

#[tokio::test]
async fn test_low_stock_uses_default_threshold() {
    let ctx = TestContext::new().await;
    let (_shop, admin) = admin_session(&ctx).await;
    let low = ctx
        .server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/analytics/products/low-stock")
                .query_param("threshold", "10");
            then.status(200).json_body(json!([
                { "id": 3, "name": "Mug", "stock": 2, "price": 12.0, "category": "Kitchen" }
            ]));
        })
        .await;

    let products = admin.low_stock(None).await.unwrap();

    low.assert_async().await;
    assert_eq!(products[0].id, ProductId::new(3));
    assert_eq!(products[0].stock, 2);
}

#[tokio::test]
async fn test_export_returns_csv_text() {
    let ctx = TestContext::new().await;
    let (_shop, admin) = admin_session(&ctx).await;
    let csv = "Order ID,Customer,Total\n42,ana@example.com,90.00\n";
    let export = ctx
        .server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/analytics/export")
                .query_param("type", "orders")
                .query_param("start_date", "2024-01-01")
                .query_param("end_date", "2024-03-31");
            then.status(200)
                .header("Content-Type", "text/csv")
                .body(csv);
        })
        .await;

    let range = ExportRange::Dates {
        start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        end: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
    };
    let body = admin.export_csv(ExportKind::Orders, range).await.unwrap();

    export.assert_async().await;
    assert_eq!(body, csv);
}

#[tokio::test]
async fn test_inverted_export_range_sends_nothing() {
    let ctx = TestContext::new().await;
    let (_shop, admin) = admin_session(&ctx).await;
    let export = ctx
        .server
        .mock_async(|when, then| {
            when.path("/api/analytics/export");
            then.status(200).body("");
        })
        .await;

    let range = ExportRange::Dates {
        start: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    };
    let err = admin
        .export_csv(ExportKind::Customers, range)
        .await
        .unwrap_err();

    assert!(err.is_validation());
    export.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_toggle_status_invalidates_catalog_cache() {
    let ctx = TestContext::new().await;
    let (shop, admin) = admin_session(&ctx).await;
    let product = ctx
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/products/3");
            then.status(200).json_body(json!({
                "product": { "id": 3, "name": "Mug", "price": 12.0, "is_active": true }
            }));
        })
        .await;
    let toggle = ctx
        .server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/api/admin/products/3/toggle-status")
                .header("authorization", BEARER);
            then.status(200).json_body(json!({
                "message": "Product deactivated successfully",
                "is_active": false
            }));
        })
        .await;

    shop.api().product(ProductId::new(3)).await.unwrap();
    let result = admin.toggle_product_status(ProductId::new(3)).await.unwrap();
    shop.api().product(ProductId::new(3)).await.unwrap();

    toggle.assert_async().await;
    assert!(!result.is_active);
    product.assert_hits_async(2).await;
}

#[tokio::test]
async fn test_set_order_status() {
    let ctx = TestContext::new().await;
    let (_shop, admin) = admin_session(&ctx).await;
    let update = ctx
        .server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/admin/orders/42/status")
                .json_body(json!({ "status": "shipped" }));
            then.status(200).json_body(json!({
                "message": "Order status updated successfully",
                "order_id": 42,
                "new_status": "shipped"
            }));
        })
        .await;

    let change = admin
        .update_order_status(OrderId::new(42), OrderStatus::Shipped)
        .await
        .unwrap();

    update.assert_async().await;
    assert_eq!(change.order_id, OrderId::new(42));
    assert_eq!(change.new_status, OrderStatus::Shipped);
}

#[tokio::test]
async fn test_create_coupon_normalizes_code() {
    let ctx = TestContext::new().await;
    let (_shop, admin) = admin_session(&ctx).await;
    let create = ctx
        .server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/coupons")
                .json_body(json!({ "code": "SPRING15" }));
            then.status(201).json_body(json!({
                "message": "Coupon created successfully",
                "coupon": {
                    "id": 9,
                    "code": "SPRING15",
                    "discount_type": "percentage",
                    "discount_value": 0,
                    "usage_limit_per_user": 1,
                    "usage_count": 0,
                    "is_active": true
                }
            }));
        })
        .await;

    let draft = CouponDraft {
        code: Some(" spring15 ".into()),
        ..CouponDraft::default()
    };
    let coupon = admin.create_coupon(&draft).await.unwrap();

    create.assert_async().await;
    assert_eq!(coupon.code, "SPRING15");
    assert!(coupon.is_active);
}

#[tokio::test]
async fn test_duplicate_coupon_surfaces_message() {
    let ctx = TestContext::new().await;
    let (_shop, admin) = admin_session(&ctx).await;
    ctx.server
        .mock_async(|when, then| {
            when.method(POST).path("/api/coupons");
            then.status(400)
                .json_body(json!({ "error": "Coupon code already exists" }));
        })
        .await;

    let draft = CouponDraft {
        code: Some("SPRING15".into()),
        ..CouponDraft::default()
    };
    let err = admin.create_coupon(&draft).await.unwrap_err();

    assert_eq!(err.to_string(), "Coupon code already exists");
}

#[tokio::test]
async fn test_coupon_without_code_sends_nothing() {
    let ctx = TestContext::new().await;
    let (_shop, admin) = admin_session(&ctx).await;
    let create = ctx
        .server
        .mock_async(|when, then| {
            when.method(POST).path("/api/coupons");
            then.status(201);
        })
        .await;

    let err = admin
        .create_coupon(&CouponDraft::default())
        .await
        .unwrap_err();

    assert!(err.is_validation());
    create.assert_hits_async(0).await;
}
