//! Catalog endpoints (`/api/products*`) with response caching.

use blitzshop_core::{Product, ProductId, ProductPage};
use reqwest::Method;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::ApiClient;
use crate::error::ClientError;

/// Cached catalog responses.
#[derive(Debug, Clone)]
pub(super) enum CacheValue {
    Product(Box<Product>),
    Products(ProductPage),
    Categories(Vec<String>),
}

/// Product listing filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub in_stock: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ProductQuery {
    /// The `price` filter as `min:max`, `min:` or `:max`.
    #[must_use]
    pub fn price_range(&self) -> Option<String> {
        match (self.min_price, self.max_price) {
            (None, None) => None,
            (min, max) => Some(format!(
                "{}:{}",
                min.map(|d| d.normalize().to_string()).unwrap_or_default(),
                max.map(|d| d.normalize().to_string()).unwrap_or_default()
            )),
        }
    }

    fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    fn query_pairs(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("q", self.search_term().map(String::from)),
            (
                "category",
                self.category.clone().filter(|c| !c.trim().is_empty()),
            ),
            ("price", self.price_range()),
            ("in_stock", self.in_stock.map(|b| b.to_string())),
            ("page", self.page.map(|p| p.to_string())),
            ("per_page", self.per_page.map(|p| p.to_string())),
        ]
    }

    fn cache_key(&self) -> String {
        format!(
            "products:{}:{}:{}:{}:{}",
            self.category.as_deref().unwrap_or(""),
            self.price_range().unwrap_or_default(),
            self.in_stock.map(|b| b.to_string()).unwrap_or_default(),
            self.page.unwrap_or(1),
            self.per_page.map(|p| p.to_string()).unwrap_or_default(),
        )
    }
}

#[derive(Deserialize)]
struct ProductEnvelope {
    product: Product,
}

#[derive(Deserialize)]
struct CategoriesEnvelope {
    #[serde(default)]
    categories: Vec<String>,
}

impl ApiClient {
    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List active products.
    ///
    /// Results for queries without a search term are cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, ClientError> {
        let cacheable = query.search_term().is_none();
        let cache_key = query.cache_key();

        // Check cache (only for default queries without search)
        if cacheable
            && let Some(CacheValue::Products(page)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(page);
        }

        let request = self.request(Method::GET, "api/products/", &query.query_pairs(), None)?;
        let page: ProductPage = self.send(request, "Failed to load products").await?;

        if cacheable {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(page.clone()))
                .await;
        }

        Ok(page)
    }

    /// Get a single active product.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for unknown or inactive products.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product, ClientError> {
        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let request = self.request(Method::GET, &format!("api/products/{id}"), &[], None)?;
        let envelope: ProductEnvelope = self.send(request, "Product not found").await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(envelope.product.clone())))
            .await;

        Ok(envelope.product)
    }

    /// Distinct categories of active products, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<String>, ClientError> {
        let cache_key = "categories".to_string();

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let request = self.request(Method::GET, "api/products/categories", &[], None)?;
        let envelope: CategoriesEnvelope =
            self.send(request, "Failed to load categories").await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(envelope.categories.clone()))
            .await;

        Ok(envelope.categories)
    }

    /// Drop every cached catalog response.
    ///
    /// Admin product writes call this so later reads see the change.
    pub async fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
        debug!("Catalog cache invalidated");
    }
}
