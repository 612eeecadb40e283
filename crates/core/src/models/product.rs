//! Catalog records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Pagination;
use crate::types::{ProductId, Timestamp, round_cents};

const fn default_true() -> bool {
    true
}

/// A product as listed by the storefront and admin endpoints.
///
/// The storefront reports stock as `stock`, the admin listing as
/// `stock_quantity`; some responses carry both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub discount_percentage: Option<Decimal>,
    pub stock: Option<i32>,
    pub stock_quantity: Option<i32>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub in_stock: Option<bool>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

impl Product {
    /// Units available, whichever field the endpoint filled.
    #[must_use]
    pub fn available_stock(&self) -> i32 {
        self.stock.or(self.stock_quantity).unwrap_or(0)
    }

    /// Whether the product can be added to the cart.
    #[must_use]
    pub fn is_in_stock(&self) -> bool {
        self.in_stock.unwrap_or_else(|| self.available_stock() > 0)
    }

    /// Price after the product's own discount, rounded to cents.
    ///
    /// Display-only; the server prices the cart from `price`.
    #[must_use]
    pub fn sale_price(&self) -> Decimal {
        match self.discount_percentage {
            Some(pct) if pct > Decimal::ZERO => {
                round_cents(self.price * (Decimal::ONE_HUNDRED - pct) / Decimal::ONE_HUNDRED)
            }
            _ => self.price,
        }
    }
}

/// One page of `GET /api/products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

/// Fields for creating or updating a product from the admin console.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
