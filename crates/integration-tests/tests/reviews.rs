//! Integration tests for product reviews.

use blitzshop_core::{OrderId, ProductId, ReviewDraft, ReviewId};
use blitzshop_integration_tests::{BEARER, TestContext};
use blitzshop_storefront::ClientError;
use httpmock::prelude::*;
use rust_decimal_macros::dec;
use secrecy::SecretString;
use serde_json::{Value, json};

fn token() -> SecretString {
    SecretString::from("test-token")
}

fn review(id: i32, rating: u8, comment: &str) -> Value {
    json!({
        "id": id,
        "product_id": 3,
        "user_id": 7,
        "order_id": null,
        "rating": rating,
        "title": "",
        "comment": comment,
        "is_verified_purchase": false,
        "created_at": "2024-03-01T10:00:00+00:00",
        "updated_at": "2024-03-01T10:00:00+00:00",
        "user_name": "ana",
        "user_email": "ana@example.com"
    })
}

fn draft(rating: Option<u8>, comment: Option<&str>) -> ReviewDraft {
    ReviewDraft {
        rating,
        comment: comment.map(String::from),
        ..ReviewDraft::default()
    }
}

#[tokio::test]
async fn test_listing_is_public_and_caps_page_size() {
    let ctx = TestContext::new().await;
    let list = ctx
        .server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/products/3/reviews")
                .query_param("page", "2")
                .query_param("per_page", "50");
            then.status(200).json_body(json!({
                "reviews": [review(11, 4, "Keeps coffee warm.")],
                "total": 11,
                "page": 2,
                "per_page": 50,
                "pages": 1,
                "average_rating": 4.25,
                "total_reviews": 11
            }));
        })
        .await;

    let page = ctx
        .api
        .product_reviews(ProductId::new(3), Some(2), Some(500))
        .await
        .unwrap();

    list.assert_async().await;
    assert_eq!(page.reviews.len(), 1);
    assert_eq!(page.average_rating, dec!(4.25));
    assert_eq!(page.total_reviews, 11);
}

#[tokio::test]
async fn test_reviews_of_unknown_product_use_server_message() {
    let ctx = TestContext::new().await;
    ctx.server
        .mock_async(|when, then| {
            when.method(GET).path("/api/products/404/reviews");
            then.status(404)
                .json_body(json!({ "error": "not_found", "message": "Product not found" }));
        })
        .await;

    let err = ctx
        .api
        .product_reviews(ProductId::new(404), None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::NotFound(ref m) if m == "Product not found"));
}

#[tokio::test]
async fn test_can_review_returns_existing_review() {
    let ctx = TestContext::new().await;
    ctx.server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/products/3/reviews/can-review")
                .header("authorization", BEARER);
            then.status(200).json_body(json!({
                "can_review": false,
                "reason": "already_reviewed",
                "existing_review": review(11, 4, "Keeps coffee warm.")
            }));
        })
        .await;

    let eligibility = ctx.api.can_review(&token(), ProductId::new(3)).await.unwrap();

    assert!(!eligibility.can_review);
    assert_eq!(eligibility.reason.as_deref(), Some("already_reviewed"));
    assert_eq!(eligibility.existing_review.unwrap().id, ReviewId::new(11));
}

#[tokio::test]
async fn test_create_review_sends_trimmed_fields() {
    let ctx = TestContext::new().await;
    let create = ctx
        .server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/products/3/reviews")
                .header("authorization", BEARER)
                .json_body(json!({
                    "rating": 5,
                    "title": "Great",
                    "comment": "Keeps coffee warm.",
                    "order_id": 42
                }));
            then.status(201).json_body(json!({
                "message": "Review created successfully",
                "review": review(12, 5, "Keeps coffee warm.")
            }));
        })
        .await;

    let draft = ReviewDraft {
        rating: Some(5),
        title: Some(" Great ".into()),
        comment: Some("  Keeps coffee warm.  ".into()),
        order_id: Some(OrderId::new(42)),
    };
    let created = ctx
        .api
        .create_review(&token(), ProductId::new(3), &draft)
        .await
        .unwrap();

    create.assert_async().await;
    assert_eq!(created.id, ReviewId::new(12));
    assert_eq!(created.rating, 5);
}

#[tokio::test]
async fn test_unrated_review_sends_nothing() {
    let ctx = TestContext::new().await;
    let create = ctx
        .server
        .mock_async(|when, then| {
            when.method(POST).path("/api/products/3/reviews");
            then.status(201);
        })
        .await;

    let err = ctx
        .api
        .create_review(&token(), ProductId::new(3), &draft(None, Some("Nice")))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    create.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_duplicate_review_surfaces_message() {
    let ctx = TestContext::new().await;
    ctx.server
        .mock_async(|when, then| {
            when.method(POST).path("/api/products/3/reviews");
            then.status(400).json_body(json!({
                "error": "already_reviewed",
                "message": "You have already reviewed this product"
            }));
        })
        .await;

    let err = ctx
        .api
        .create_review(&token(), ProductId::new(3), &draft(Some(4), Some("Again")))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "You have already reviewed this product");
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_update_review_sends_only_set_fields() {
    let ctx = TestContext::new().await;
    let update = ctx
        .server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/reviews/11")
                .header("authorization", BEARER)
                .json_body(json!({ "rating": 3 }));
            then.status(200).json_body(json!({
                "message": "Review updated successfully",
                "review": review(11, 3, "Keeps coffee warm.")
            }));
        })
        .await;

    let updated = ctx
        .api
        .update_review(&token(), ReviewId::new(11), &draft(Some(3), None))
        .await
        .unwrap();

    update.assert_async().await;
    assert_eq!(updated.rating, 3);
}

#[tokio::test]
async fn test_editing_foreign_review_keeps_message() {
    let ctx = TestContext::new().await;
    ctx.server
        .mock_async(|when, then| {
            when.method(PUT).path("/api/reviews/11");
            then.status(403).json_body(json!({
                "error": "forbidden",
                "message": "You can only edit your own reviews"
            }));
        })
        .await;

    let err = ctx
        .api
        .update_review(&token(), ReviewId::new(11), &draft(Some(1), None))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 403, .. }));
    assert_eq!(err.to_string(), "You can only edit your own reviews");
}

#[tokio::test]
async fn test_delete_review() {
    let ctx = TestContext::new().await;
    let delete = ctx
        .server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path("/api/reviews/11")
                .header("authorization", BEARER);
            then.status(200)
                .json_body(json!({ "message": "Review deleted successfully" }));
        })
        .await;

    let ack = ctx
        .api
        .delete_review(&token(), ReviewId::new(11))
        .await
        .unwrap();

    delete.assert_async().await;
    assert_eq!(ack.message.as_deref(), Some("Review deleted successfully"));
}

#[tokio::test]
async fn test_my_reviews_unwraps_list() {
    let ctx = TestContext::new().await;
    ctx.server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/users/me/reviews")
                .header("authorization", BEARER);
            then.status(200).json_body(json!({
                "reviews": [review(11, 4, "Keeps coffee warm."), review(9, 2, "Chipped.")],
                "total": 2
            }));
        })
        .await;

    let reviews = ctx.api.my_reviews(&token()).await.unwrap();

    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[1].rating, 2);
}
