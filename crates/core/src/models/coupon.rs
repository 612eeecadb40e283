//! Coupon records and checkout discount results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::PageInfo;
use crate::types::{CouponId, CouponUsageId, DiscountType, OrderId, Timestamp, UserId};

/// A coupon as managed from the admin console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: CouponId,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_purchase: Option<Decimal>,
    pub max_discount: Option<Decimal>,
    pub usage_limit: Option<u32>,
    pub usage_limit_per_user: Option<u32>,
    #[serde(default)]
    pub usage_count: u32,
    pub valid_from: Option<Timestamp>,
    pub valid_until: Option<Timestamp>,
    #[serde(default)]
    pub is_active: bool,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

/// Coupon quote returned by `POST /api/coupons/validate`.
///
/// `discount_amount` and `final_total` are computed by the server for the
/// cart total that was sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponQuote {
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub discount_amount: Decimal,
    pub final_total: Decimal,
}

/// Envelope of `POST /api/coupons/validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponValidation {
    pub valid: bool,
    pub coupon: Option<CouponQuote>,
}

/// Result of `POST /api/coupons/apply`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponApplication {
    #[serde(default)]
    pub success: bool,
    pub discount_applied: Decimal,
    pub final_total: Decimal,
}

/// Admin-side coupon definition for create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_type: Option<DiscountType>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub discount_value: Option<Decimal>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub min_purchase: Option<Decimal>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub max_discount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit_per_user: Option<u32>,
    /// `YYYY-MM-DD` or full ISO timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// One page of the admin coupon listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponPage {
    pub coupons: Vec<Coupon>,
    #[serde(flatten)]
    pub page: PageInfo,
}

/// A single redemption of a coupon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponUsage {
    pub id: CouponUsageId,
    pub user_id: UserId,
    pub user_email: Option<String>,
    pub order_id: OrderId,
    pub discount_applied: Decimal,
    pub used_at: Option<Timestamp>,
}

/// Response of `GET /api/coupons/{id}/usage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponUsageReport {
    pub coupon: Coupon,
    #[serde(default)]
    pub usage: Vec<CouponUsage>,
    #[serde(flatten)]
    pub page: PageInfo,
}

/// Entry of the most-used coupon ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponRanking {
    pub code: String,
    pub usage_count: u32,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
}

/// Response of `GET /api/coupons/stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponStats {
    pub total_coupons: u64,
    pub active_coupons: u64,
    pub total_usage: u64,
    pub total_discount_given: Decimal,
    #[serde(default)]
    pub most_used_coupons: Vec<CouponRanking>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_validation_envelope() {
        let validation: CouponValidation = serde_json::from_value(json!({
            "valid": true,
            "coupon": {
                "code": "SAVE10",
                "description": "10% off",
                "discount_type": "percentage",
                "discount_value": 10.0,
                "discount_amount": 5.0,
                "final_total": 45.0
            }
        }))
        .unwrap();
        let quote = validation.coupon.unwrap();
        assert_eq!(quote.discount_type, DiscountType::Percentage);
        assert_eq!(quote.final_total, dec!(45));
    }

    #[test]
    fn test_coupon_page_flattens_paging() {
        let page: CouponPage = serde_json::from_value(json!({
            "coupons": [],
            "total": 0, "pages": 0, "current_page": 1, "per_page": 20
        }))
        .unwrap();
        assert_eq!(page.page.current_page, 1);
        assert_eq!(page.page.per_page, Some(20));
    }
}
