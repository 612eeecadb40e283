//! Product reviews.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, ProductId, ReviewId, Timestamp, UserId};

/// Lowest star rating.
pub const MIN_RATING: u8 = 1;

/// Highest star rating.
pub const MAX_RATING: u8 = 5;

/// A shopper's rating and comment on a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_id: UserId,
    /// Set only when the order was verified to contain the product.
    pub order_id: Option<OrderId>,
    pub rating: u8,
    pub title: Option<String>,
    pub comment: Option<String>,
    #[serde(default)]
    pub is_verified_purchase: bool,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

/// One page of a product's reviews, newest first, with the product-wide
/// rating summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewPage {
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    #[serde(default)]
    pub pages: u32,
    /// Mean rating over every review of the product; zero when there are none.
    #[serde(default)]
    pub average_rating: Decimal,
    #[serde(default)]
    pub total_reviews: u64,
}

/// Answer of `GET /api/products/{id}/reviews/can-review`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEligibility {
    pub can_review: bool,
    /// `already_reviewed` when the shopper has a review on the product.
    pub reason: Option<String>,
    pub existing_review: Option<Review>,
    /// Whether a delivered order contained the product.
    #[serde(default)]
    pub has_purchased: bool,
}

/// Fields sent when writing a review. Unset fields are left out of the body,
/// so an update only touches what it names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Order proving the purchase; the server marks the review verified when
    /// it contains the product.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_review_page_with_summary() {
        let page: ReviewPage = serde_json::from_value(json!({
            "reviews": [{
                "id": 11,
                "product_id": 3,
                "user_id": 7,
                "order_id": null,
                "rating": 4,
                "title": "Solid mug",
                "comment": "Keeps coffee warm.",
                "is_verified_purchase": false,
                "created_at": "2024-03-01T10:00:00",
                "updated_at": "2024-03-01T10:00:00",
                "user_name": "ana",
                "user_email": "ana@example.com"
            }],
            "total": 1,
            "page": 1,
            "per_page": 10,
            "pages": 1,
            "average_rating": 4.5,
            "total_reviews": 2
        }))
        .unwrap();

        assert_eq!(page.reviews[0].id, ReviewId::new(11));
        assert_eq!(page.reviews[0].rating, 4);
        assert_eq!(page.average_rating, dec!(4.5));
        assert_eq!(page.total_reviews, 2);
    }

    #[test]
    fn test_eligibility_without_review() {
        let eligibility: ReviewEligibility = serde_json::from_value(json!({
            "can_review": true,
            "has_purchased": false
        }))
        .unwrap();
        assert!(eligibility.can_review);
        assert!(eligibility.existing_review.is_none());
        assert!(eligibility.reason.is_none());
    }

    #[test]
    fn test_draft_omits_unset_fields() {
        let draft = ReviewDraft {
            rating: Some(5),
            ..ReviewDraft::default()
        };
        assert_eq!(serde_json::to_value(&draft).unwrap(), json!({ "rating": 5 }));
    }
}
