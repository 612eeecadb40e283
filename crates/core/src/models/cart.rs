//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CartItemId, ProductId};

/// Product summary embedded in a cart line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub stock: Option<i32>,
}

/// One product entry within the shopping cart.
///
/// `id` is the server's cart row id. The legacy cart listing can report it as
/// `null`, in which case the line cannot be updated or removed individually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: Option<CartItemId>,
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Decimal,
    #[serde(default)]
    pub total_price: Decimal,
    pub product: Option<CartProduct>,
}

impl CartItem {
    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// Set the quantity and recompute the line total.
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.total_price = self.line_total();
    }

    /// Product name for display.
    #[must_use]
    pub fn name(&self) -> &str {
        self.product
            .as_ref()
            .and_then(|p| p.name.as_deref())
            .unwrap_or("(unnamed product)")
    }
}

/// Response of `GET /api/cart/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    #[serde(default)]
    pub cart_items: Vec<CartItem>,
    pub total_items: Option<u32>,
    pub total_price: Option<Decimal>,
}
