//! Checkout: order placement, coupon discounts and card payment.
//!
//! Totals shown at checkout are derived client-side from the order subtotal
//! and the discount the server reported when the coupon was applied:
//! `total = subtotal - discount`. Removing the coupon restores the subtotal.

use std::sync::Arc;

use async_trait::async_trait;
use blitzshop_core::{CouponValidation, Order, OrderAddresses, OrderCouponUpdate, OrderId};
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use crate::api::{ApiClient, PaymentConfirmation, PaymentIntent};
use crate::cart::CartStore;
use crate::error::{Result, add_breadcrumb};
use crate::session::SessionStore;
use crate::validation::normalize_coupon_code;

/// Coupon accepted by the server for an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedCoupon {
    pub code: String,
    pub discount_amount: Decimal,
    pub final_total: Decimal,
}

/// Amounts displayed at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutTotals {
    subtotal: Decimal,
    applied: Option<AppliedCoupon>,
}

impl CheckoutTotals {
    #[must_use]
    pub const fn new(subtotal: Decimal) -> Self {
        Self {
            subtotal,
            applied: None,
        }
    }

    /// Totals for an order, including a coupon already recorded on it.
    #[must_use]
    pub fn from_order(order: &Order) -> Self {
        let applied = order
            .coupon_code
            .as_ref()
            .filter(|code| !code.is_empty())
            .map(|code| {
                let discount = order.discount_amount.unwrap_or(Decimal::ZERO);
                AppliedCoupon {
                    code: code.clone(),
                    discount_amount: discount,
                    final_total: order.final_amount.unwrap_or(order.total_amount - discount),
                }
            });
        Self {
            subtotal: order.total_amount,
            applied,
        }
    }

    /// Apply a coupon, replacing any previous one.
    pub fn apply(&mut self, coupon: AppliedCoupon) {
        self.applied = Some(coupon);
    }

    /// Drop the coupon, returning it.
    pub fn remove_coupon(&mut self) -> Option<AppliedCoupon> {
        self.applied.take()
    }

    #[must_use]
    pub const fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    #[must_use]
    pub fn discount(&self) -> Decimal {
        self.applied
            .as_ref()
            .map_or(Decimal::ZERO, |c| c.discount_amount)
    }

    /// Amount to charge.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.subtotal - self.discount()
    }

    #[must_use]
    pub const fn applied(&self) -> Option<&AppliedCoupon> {
        self.applied.as_ref()
    }
}

/// Card payment the hosted widget confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedPayment {
    pub payment_intent_id: String,
    pub status: String,
}

/// Hosted card tokenization and confirmation.
#[async_trait]
pub trait PaymentConfirmer: Send + Sync {
    /// Confirm the card payment for an intent.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Payment` when the card is declined or needs
    /// further action.
    async fn confirm_card_payment(&self, intent: &PaymentIntent) -> Result<ConfirmedPayment>;
}

/// Checkout workflow for the signed-in user.
#[derive(Debug, Clone)]
pub struct Checkout {
    api: ApiClient,
    session: Arc<SessionStore>,
    cart: Arc<CartStore>,
}

impl Checkout {
    #[must_use]
    pub const fn new(api: ApiClient, session: Arc<SessionStore>, cart: Arc<CartStore>) -> Self {
        Self { api, session, cart }
    }

    /// Turn the server cart into an order, then refetch the (now empty) cart.
    ///
    /// # Errors
    ///
    /// Returns "Cart is empty" or a stock message from the server.
    #[instrument(skip(self, addresses))]
    pub async fn place_order(&self, addresses: &OrderAddresses) -> Result<Order> {
        let token = self.session.require_token().await?;
        let order = self.api.create_order(&token, addresses).await?;
        info!(order_id = %order.id, total = %order.total_amount, "Order placed");

        if let Err(e) = self.cart.refresh().await {
            warn!(error = %e, "Cart refetch after order failed");
        }

        let order_id = order.id.to_string();
        add_breadcrumb(
            "checkout",
            "Order placed",
            Some(&[("order_id", order_id.as_str())][..]),
        );
        Ok(order)
    }

    /// Load an order and its checkout totals.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for orders of other users.
    pub async fn load(&self, order_id: OrderId) -> Result<(Order, CheckoutTotals)> {
        let token = self.session.require_token().await?;
        let order = self.api.order(&token, order_id).await?;
        let totals = CheckoutTotals::from_order(&order);
        Ok((order, totals))
    }

    /// Check a coupon against a cart total without using it.
    ///
    /// # Errors
    ///
    /// Returns `CouponCodeRequired` for blank input, without a request.
    pub async fn preview_coupon(&self, code: &str, cart_total: Decimal) -> Result<CouponValidation> {
        let token = self.session.require_token().await?;
        let code = normalize_coupon_code(code)?;
        self.api.validate_coupon(&token, &code, cart_total).await
    }

    /// Apply a coupon to an order and update `totals`.
    ///
    /// The coupon is then recorded on the order; that write is best-effort and
    /// only logged when it fails.
    ///
    /// # Errors
    ///
    /// Returns the server's rejection; `totals` is unchanged in that case.
    #[instrument(skip(self, totals), fields(order_id = %order_id))]
    pub async fn apply_coupon(
        &self,
        order_id: OrderId,
        totals: &mut CheckoutTotals,
        code: &str,
    ) -> Result<AppliedCoupon> {
        let token = self.session.require_token().await?;
        let code = normalize_coupon_code(code)?;

        let application = self
            .api
            .apply_coupon(&token, &code, order_id, totals.subtotal())
            .await?;

        let applied = AppliedCoupon {
            code,
            discount_amount: application.discount_applied,
            final_total: application.final_total,
        };
        totals.apply(applied.clone());
        info!(code = %applied.code, discount = %applied.discount_amount, "Coupon applied");

        let update = OrderCouponUpdate {
            coupon_code: Some(applied.code.clone()),
            discount_amount: applied.discount_amount,
            final_amount: totals.total(),
        };
        if let Err(e) = self.api.record_order_coupon(&token, order_id, &update).await {
            warn!(error = %e, "Failed to record coupon on order");
        }

        Ok(applied)
    }

    /// Remove the coupon from `totals` and clear it on the order (best-effort).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unauthenticated` when signed out.
    #[instrument(skip(self, totals), fields(order_id = %order_id))]
    pub async fn remove_coupon(
        &self,
        order_id: OrderId,
        totals: &mut CheckoutTotals,
    ) -> Result<Option<AppliedCoupon>> {
        let token = self.session.require_token().await?;
        let removed = totals.remove_coupon();

        let update = OrderCouponUpdate {
            coupon_code: None,
            discount_amount: Decimal::ZERO,
            final_amount: totals.subtotal(),
        };
        if let Err(e) = self.api.record_order_coupon(&token, order_id, &update).await {
            warn!(error = %e, "Failed to clear coupon on order");
        }

        Ok(removed)
    }

    /// Pay for an order: create an intent for the displayed total, have the
    /// card confirmed, then let the server verify it.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Payment` when the card step fails, or the
    /// server's message for intent creation and verification.
    #[instrument(skip(self, totals, confirmer), fields(order_id = %order_id))]
    pub async fn pay(
        &self,
        order_id: OrderId,
        totals: &CheckoutTotals,
        confirmer: &dyn PaymentConfirmer,
    ) -> Result<PaymentConfirmation> {
        let token = self.session.require_token().await?;

        let intent = self
            .api
            .create_payment_intent(&token, order_id, totals.total())
            .await?;
        let confirmed = confirmer.confirm_card_payment(&intent).await?;
        let confirmation = self
            .api
            .confirm_payment(&token, &confirmed.payment_intent_id)
            .await?;

        info!(status = %confirmation.order.status, "Payment confirmed");
        Ok(confirmation)
    }
}
