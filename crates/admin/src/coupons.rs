//! Coupon management (`/api/coupons`).

use blitzshop_core::{
    Coupon, CouponDraft, CouponId, CouponPage, CouponStats, CouponStatusFilter, CouponUsageReport,
};
use blitzshop_storefront::api::Ack;
use blitzshop_storefront::error::Result;
use blitzshop_storefront::validation::{ValidationError, normalize_coupon_code};
use reqwest::Method;
use tracing::{info, instrument};

use crate::client::{AdminClient, Envelope};

/// Filters for the coupon listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CouponQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub status: Option<CouponStatusFilter>,
}

/// Draft with its code trimmed and upper-cased; a present code must not be
/// blank.
fn normalized(draft: &CouponDraft) -> Result<CouponDraft> {
    let mut draft = draft.clone();
    if let Some(code) = draft.code.as_deref() {
        draft.code = Some(normalize_coupon_code(code)?);
    }
    Ok(draft)
}

impl AdminClient {
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_coupons(&self, query: &CouponQuery) -> Result<CouponPage> {
        let token = self.token().await?;
        let request = self.api.request(
            Method::GET,
            "api/coupons",
            &[
                ("page", query.page.map(|p| p.to_string())),
                ("per_page", query.per_page.map(|p| p.to_string())),
                ("search", query.search.clone().filter(|s| !s.is_empty())),
                ("status", query.status.map(|s| s.to_string())),
            ],
            Some(&token),
        )?;
        self.send(request, "Error fetching coupons").await
    }

    /// Create a coupon. Unset fields take the server defaults (percentage
    /// discount, one use per user, valid from now).
    ///
    /// # Errors
    ///
    /// Returns `CouponCodeRequired` without a request for a missing code, or
    /// "Coupon code already exists".
    #[instrument(skip(self, draft))]
    pub async fn create_coupon(&self, draft: &CouponDraft) -> Result<Coupon> {
        let draft = normalized(draft)?;
        if draft.code.is_none() {
            return Err(ValidationError::CouponCodeRequired.into());
        }
        let token = self.token().await?;
        let request = self
            .api
            .request(Method::POST, "api/coupons", &[], Some(&token))?
            .json(&draft);
        let created: Envelope<Coupon> = self.send(request, "Error creating coupon").await?;
        info!(code = %created.item.code, "Coupon created");
        Ok(created.item)
    }

    /// Update the fields set in `draft`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for unknown coupons.
    #[instrument(skip(self, draft), fields(coupon_id = %id))]
    pub async fn update_coupon(&self, id: CouponId, draft: &CouponDraft) -> Result<Coupon> {
        let draft = normalized(draft)?;
        let token = self.token().await?;
        let request = self
            .api
            .request(Method::PUT, &format!("api/coupons/{id}"), &[], Some(&token))?
            .json(&draft);
        let updated: Envelope<Coupon> = self.send(request, "Error updating coupon").await?;
        Ok(updated.item)
    }

    /// Delete a coupon. Coupons that were already redeemed are deactivated
    /// instead; the returned message says which happened.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for unknown coupons.
    #[instrument(skip(self), fields(coupon_id = %id))]
    pub async fn delete_coupon(&self, id: CouponId) -> Result<Ack> {
        let token = self.token().await?;
        let request =
            self.api
                .request(Method::DELETE, &format!("api/coupons/{id}"), &[], Some(&token))?;
        self.send(request, "Error deleting coupon").await
    }

    /// Redemption history of one coupon.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for unknown coupons.
    #[instrument(skip(self), fields(coupon_id = %id))]
    pub async fn coupon_usage(
        &self,
        id: CouponId,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<CouponUsageReport> {
        let token = self.token().await?;
        let request = self.api.request(
            Method::GET,
            &format!("api/coupons/{id}/usage"),
            &[
                ("page", page.map(|p| p.to_string())),
                ("per_page", per_page.map(|p| p.to_string())),
            ],
            Some(&token),
        )?;
        self.send(request, "Error fetching coupon usage").await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn coupon_stats(&self) -> Result<CouponStats> {
        let token = self.token().await?;
        let request = self
            .api
            .request(Method::GET, "api/coupons/stats", &[], Some(&token))?;
        self.send(request, "Error fetching coupon stats").await
    }
}
