//! Cart endpoints (`/api/cart/*`).
//!
//! Every mutation answers with the full cart listing; the store ignores it
//! and keeps its own optimistic copy, refetching only where it has to.

use async_trait::async_trait;
use blitzshop_core::{CartItemId, CartSnapshot, ProductId};
use reqwest::Method;
use secrecy::SecretString;
use serde::Serialize;
use serde::de::IgnoredAny;
use tracing::instrument;

use super::ApiClient;
use crate::cart::CartApi;
use crate::error::ClientError;

#[derive(Serialize)]
struct AddBody {
    product_id: ProductId,
    quantity: u32,
}

#[derive(Serialize)]
struct UpdateBody {
    quantity: u32,
}

#[async_trait]
impl CartApi for ApiClient {
    #[instrument(skip(self, token))]
    async fn fetch_cart(&self, token: &SecretString) -> Result<CartSnapshot, ClientError> {
        let request = self.request(Method::GET, "api/cart/", &[], Some(token))?;
        self.send(request, "Failed to load cart").await
    }

    #[instrument(skip(self, token), fields(product_id = %product_id))]
    async fn add_item(
        &self,
        token: &SecretString,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), ClientError> {
        let request = self
            .request(Method::POST, "api/cart/add", &[], Some(token))?
            .json(&AddBody {
                product_id,
                quantity,
            });
        let _: IgnoredAny = self.send(request, "Failed to add to cart").await?;
        Ok(())
    }

    #[instrument(skip(self, token), fields(item_id = %item_id))]
    async fn update_item(
        &self,
        token: &SecretString,
        item_id: CartItemId,
        quantity: u32,
    ) -> Result<(), ClientError> {
        let request = self
            .request(
                Method::PUT,
                &format!("api/cart/update/{item_id}"),
                &[],
                Some(token),
            )?
            .json(&UpdateBody { quantity });
        let _: IgnoredAny = self.send(request, "Failed to update cart").await?;
        Ok(())
    }

    #[instrument(skip(self, token), fields(item_id = %item_id))]
    async fn remove_item(&self, token: &SecretString, item_id: CartItemId) -> Result<(), ClientError> {
        let request = self.request(
            Method::DELETE,
            &format!("api/cart/remove/{item_id}"),
            &[],
            Some(token),
        )?;
        let _: IgnoredAny = self.send(request, "Failed to remove from cart").await?;
        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn clear_cart(&self, token: &SecretString) -> Result<(), ClientError> {
        let request = self.request(Method::DELETE, "api/cart/clear", &[], Some(token))?;
        let _: IgnoredAny = self.send(request, "Failed to clear cart").await?;
        Ok(())
    }
}
