//! Product management (`/api/admin/products*`, `/api/admin/categories`).

use blitzshop_core::{Product, ProductDraft, ProductId, ProductPage};
use blitzshop_storefront::api::Ack;
use blitzshop_storefront::error::Result;
use blitzshop_storefront::validation::ValidationError;
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::client::{AdminClient, Envelope};

/// Admin product listing filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminProductQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub category: Option<String>,
}

/// Image uploaded alongside a new product.
#[derive(Clone)]
pub struct ProductImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ProductImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductImage")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Result of toggling a product's visibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductToggle {
    pub message: Option<String>,
    pub is_active: bool,
}

#[derive(Deserialize)]
struct Categories {
    #[serde(default)]
    categories: Vec<String>,
}

/// Reject drafts missing the fields the server requires on create.
fn validate_new_product(draft: &ProductDraft) -> std::result::Result<(), ValidationError> {
    if draft.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
        return Err(ValidationError::MissingField("Name"));
    }
    if draft.price.is_none() {
        return Err(ValidationError::MissingField("Price"));
    }
    if draft.category.as_deref().is_none_or(|c| c.trim().is_empty()) {
        return Err(ValidationError::MissingField("Category"));
    }
    Ok(())
}

fn product_form(draft: &ProductDraft, image: ProductImage) -> Result<Form> {
    let mut form = Form::new();
    if let Some(name) = &draft.name {
        form = form.text("name", name.clone());
    }
    if let Some(description) = &draft.description {
        form = form.text("description", description.clone());
    }
    if let Some(price) = draft.price {
        form = form.text("price", price.to_string());
    }
    if let Some(category) = &draft.category {
        form = form.text("category", category.clone());
    }
    if let Some(stock) = draft.stock_quantity {
        form = form.text("stock_quantity", stock.to_string());
    }
    if let Some(active) = draft.is_active {
        form = form.text("is_active", active.to_string());
    }

    let part = Part::bytes(image.bytes)
        .file_name(image.file_name)
        .mime_str(&image.content_type)?;
    Ok(form.part("image", part))
}

impl AdminClient {
    /// List products, including inactive ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: &AdminProductQuery) -> Result<ProductPage> {
        let token = self.token().await?;
        let request = self.api.request(
            Method::GET,
            "api/admin/products",
            &[
                ("page", query.page.map(|p| p.to_string())),
                ("per_page", query.per_page.map(|p| p.to_string())),
                ("search", query.search.clone()),
                ("category", query.category.clone()),
            ],
            Some(&token),
        )?;
        self.send(request, "Error fetching products").await
    }

    /// Create a product from JSON.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` without a request when name, price or category
    /// is missing.
    #[instrument(skip(self, draft))]
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<Product> {
        validate_new_product(draft)?;
        let token = self.token().await?;
        let request = self
            .api
            .request(Method::POST, "api/admin/products", &[], Some(&token))?
            .json(draft);
        let created: Envelope<Product> = self.send(request, "Error creating product").await?;
        self.api.invalidate_catalog().await;
        info!(product_id = %created.item.id, "Product created");
        Ok(created.item)
    }

    /// Create a product with an image, sent as multipart form data.
    ///
    /// # Errors
    ///
    /// Same as [`AdminClient::create_product`], plus `ClientError::Http` for
    /// an unparsable content type.
    #[instrument(skip(self, draft, image))]
    pub async fn create_product_with_image(
        &self,
        draft: &ProductDraft,
        image: ProductImage,
    ) -> Result<Product> {
        validate_new_product(draft)?;
        let token = self.token().await?;
        let form = product_form(draft, image)?;
        let request = self
            .api
            .request(Method::POST, "api/admin/products", &[], Some(&token))?
            .multipart(form);
        let created: Envelope<Product> = self.send(request, "Error creating product").await?;
        self.api.invalidate_catalog().await;
        info!(product_id = %created.item.id, "Product created");
        Ok(created.item)
    }

    /// Update the fields set in `draft`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for unknown products.
    #[instrument(skip(self, draft), fields(product_id = %id))]
    pub async fn update_product(&self, id: ProductId, draft: &ProductDraft) -> Result<Product> {
        let token = self.token().await?;
        let request = self
            .api
            .request(
                Method::PUT,
                &format!("api/admin/products/{id}"),
                &[],
                Some(&token),
            )?
            .json(draft);
        let updated: Envelope<Product> = self.send(request, "Error updating product").await?;
        self.api.invalidate_catalog().await;
        Ok(updated.item)
    }

    /// Delete a product permanently.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for unknown products.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<Ack> {
        let token = self.token().await?;
        let request = self.api.request(
            Method::DELETE,
            &format!("api/admin/products/{id}"),
            &[],
            Some(&token),
        )?;
        let ack = self.send(request, "Error deleting product").await?;
        self.api.invalidate_catalog().await;
        info!("Product deleted");
        Ok(ack)
    }

    /// Flip a product between active and inactive.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for unknown products.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn toggle_product_status(&self, id: ProductId) -> Result<ProductToggle> {
        let token = self.token().await?;
        let request = self.api.request(
            Method::PATCH,
            &format!("api/admin/products/{id}/toggle-status"),
            &[],
            Some(&token),
        )?;
        let toggle = self.send(request, "Error toggling product status").await?;
        self.api.invalidate_catalog().await;
        Ok(toggle)
    }

    /// Every category in use, including those of inactive products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn product_categories(&self) -> Result<Vec<String>> {
        let token = self.token().await?;
        let request = self
            .api
            .request(Method::GET, "api/admin/categories", &[], Some(&token))?;
        let categories: Categories = self.send(request, "Error fetching categories").await?;
        Ok(categories.categories)
    }
}
