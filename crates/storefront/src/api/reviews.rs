//! Product review endpoints (`/api/products/{id}/reviews*`, `/api/reviews/*`).
//!
//! Listing is public; writing needs a session. Reviews are not cached:
//! the rating summary changes with every write.

use blitzshop_core::{ProductId, Review, ReviewDraft, ReviewEligibility, ReviewId, ReviewPage};
use reqwest::Method;
use secrecy::SecretString;
use serde::Deserialize;
use tracing::{info, instrument};

use super::{Ack, ApiClient};
use crate::error::ClientError;
use crate::validation::validate_review;

/// Largest page the server will return.
pub const MAX_REVIEWS_PER_PAGE: u32 = 50;

#[derive(Deserialize)]
struct ReviewEnvelope {
    review: Review,
}

/// `{"reviews": [...], "total": n}` from `/api/users/me/reviews`.
#[derive(Deserialize)]
struct ReviewList {
    reviews: Vec<Review>,
}

impl ApiClient {
    /// Page through a product's reviews, newest first.
    ///
    /// `per_page` is capped at [`MAX_REVIEWS_PER_PAGE`].
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for unknown products.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn product_reviews(
        &self,
        product_id: ProductId,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<ReviewPage, ClientError> {
        let request = self.request(
            Method::GET,
            &format!("api/products/{product_id}/reviews"),
            &[
                ("page", page.map(|p| p.to_string())),
                (
                    "per_page",
                    per_page.map(|p| p.min(MAX_REVIEWS_PER_PAGE).to_string()),
                ),
            ],
            None,
        )?;
        self.send(request, "Error loading reviews").await
    }

    /// Whether the signed-in user may review a product, with their existing
    /// review if they already wrote one.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for unknown products.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn can_review(
        &self,
        token: &SecretString,
        product_id: ProductId,
    ) -> Result<ReviewEligibility, ClientError> {
        let request = self.request(
            Method::GET,
            &format!("api/products/{product_id}/reviews/can-review"),
            &[],
            Some(token),
        )?;
        self.send(request, "Error checking review eligibility").await
    }

    /// Reviews written by the signed-in user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn my_reviews(&self, token: &SecretString) -> Result<Vec<Review>, ClientError> {
        let request = self.request(Method::GET, "api/users/me/reviews", &[], Some(token))?;
        let list: ReviewList = self.send(request, "Error loading reviews").await?;
        Ok(list.reviews)
    }

    /// Review a product.
    ///
    /// # Errors
    ///
    /// Returns a validation error without sending a request when the rating
    /// or comment is missing, otherwise the server's message (for example
    /// "You have already reviewed this product").
    #[instrument(skip(self, token, draft), fields(product_id = %product_id))]
    pub async fn create_review(
        &self,
        token: &SecretString,
        product_id: ProductId,
        draft: &ReviewDraft,
    ) -> Result<Review, ClientError> {
        let draft = validate_review(draft, true)?;
        let request = self
            .request(
                Method::POST,
                &format!("api/products/{product_id}/reviews"),
                &[],
                Some(token),
            )?
            .json(&draft);
        let created: ReviewEnvelope = self.send(request, "Error submitting review").await?;
        info!(review_id = %created.review.id, "Review created");
        Ok(created.review)
    }

    /// Edit one of the signed-in user's reviews; only the fields set in
    /// `draft` change.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an out-of-range rating or blank
    /// comment, and `ClientError::Api` with status 403 for someone else's
    /// review.
    #[instrument(skip(self, token, draft), fields(review_id = %id))]
    pub async fn update_review(
        &self,
        token: &SecretString,
        id: ReviewId,
        draft: &ReviewDraft,
    ) -> Result<Review, ClientError> {
        let draft = validate_review(draft, false)?;
        let request = self
            .request(Method::PUT, &format!("api/reviews/{id}"), &[], Some(token))?
            .json(&draft);
        let updated: ReviewEnvelope = self.send(request, "Error submitting review").await?;
        Ok(updated.review)
    }

    /// Delete a review. Administrators may delete any review.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with status 403 for someone else's review.
    #[instrument(skip(self, token), fields(review_id = %id))]
    pub async fn delete_review(&self, token: &SecretString, id: ReviewId) -> Result<Ack, ClientError> {
        let request = self.request(Method::DELETE, &format!("api/reviews/{id}"), &[], Some(token))?;
        let ack = self.send(request, "Error deleting review").await?;
        info!("Review deleted");
        Ok(ack)
    }
}
