//! Shopper coupon endpoints (`/api/coupons/validate`, `/api/coupons/apply`).

use blitzshop_core::{CouponApplication, CouponValidation, OrderId};
use reqwest::Method;
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::Serialize;
use tracing::instrument;

use super::ApiClient;
use crate::error::ClientError;

#[derive(Serialize)]
struct ValidateBody<'a> {
    code: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    cart_total: Decimal,
}

#[derive(Serialize)]
struct ApplyBody<'a> {
    code: &'a str,
    order_id: OrderId,
    #[serde(with = "rust_decimal::serde::float")]
    cart_total: Decimal,
}

impl ApiClient {
    /// Check a normalized coupon code against a cart total without using it.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for unknown codes and `ClientError::Api`
    /// when the coupon is expired, exhausted or below its minimum purchase.
    #[instrument(skip(self, token), fields(code = %code))]
    pub async fn validate_coupon(
        &self,
        token: &SecretString,
        code: &str,
        cart_total: Decimal,
    ) -> Result<CouponValidation, ClientError> {
        let request = self
            .request(Method::POST, "api/coupons/validate", &[], Some(token))?
            .json(&ValidateBody { code, cart_total });
        self.send(request, "Invalid coupon code").await
    }

    /// Apply a normalized coupon code to an order.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::validate_coupon`], plus "Coupon already applied to
    /// this order".
    #[instrument(skip(self, token), fields(code = %code, order_id = %order_id))]
    pub async fn apply_coupon(
        &self,
        token: &SecretString,
        code: &str,
        order_id: OrderId,
        cart_total: Decimal,
    ) -> Result<CouponApplication, ClientError> {
        let request = self
            .request(Method::POST, "api/coupons/apply", &[], Some(token))?
            .json(&ApplyBody {
                code,
                order_id,
                cart_total,
            });
        self.send(request, "Failed to apply coupon").await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_apply_body_sends_numbers() {
        let body = ApplyBody {
            code: "SAVE10",
            order_id: OrderId::new(7),
            cart_total: dec!(49.90),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "code": "SAVE10", "order_id": 7, "cart_total": 49.9 })
        );
    }
}
