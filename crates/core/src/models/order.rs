//! Order records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::PageInfo;
use crate::types::{Email, OrderId, OrderItemId, OrderStatus, ProductId, Timestamp, UserId};

/// Customer summary attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCustomer {
    pub id: UserId,
    pub display_name: Option<String>,
    pub email: Option<Email>,
}

/// A line of a placed order, priced at the time of purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Option<OrderItemId>,
    pub order_id: Option<OrderId>,
    /// Absent in the admin order listing.
    pub product_id: Option<ProductId>,
    pub product_name: Option<String>,
    pub product_image_url: Option<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

/// An order as returned by `/api/orders/*`.
///
/// Some endpoints return a reduced shape; everything beyond the id, total and
/// status is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub coupon_code: Option<String>,
    pub discount_amount: Option<Decimal>,
    pub final_amount: Option<Decimal>,
    pub stripe_payment_intent_id: Option<String>,
    pub shipping_address: Option<String>,
    pub billing_address: Option<String>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
    pub customer: Option<OrderCustomer>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Amount due: the discounted total if one was recorded, else the total.
    ///
    /// The backend reports `final_amount` as `0` for legacy rows without a
    /// coupon, which is treated as "not recorded".
    #[must_use]
    pub fn amount_due(&self) -> Decimal {
        match self.final_amount {
            Some(amount) if amount > Decimal::ZERO => amount,
            _ => self.total_amount,
        }
    }
}

/// Row of `GET /api/orders/my`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: OrderId,
    pub total_amount: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub items_count: u32,
}

/// Row of `GET /api/orders/admin/all`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminOrderSummary {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    pub email: Option<String>,
    pub total_amount: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    pub created_at: Option<Timestamp>,
}

/// Line of an order history entry (`/api/users/orders`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: Option<OrderItemId>,
    pub product_id: ProductId,
    pub product_name: Option<String>,
    pub product_image_url: Option<String>,
    pub quantity: u32,
    pub price: Decimal,
    pub total: Decimal,
}

/// Order history entry with a human order number (`ORD-000001`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHistoryEntry {
    pub id: OrderId,
    pub order_number: String,
    #[serde(default)]
    pub status: OrderStatus,
    pub total_amount: Decimal,
    #[serde(default)]
    pub items_count: u32,
    #[serde(default)]
    pub items: Vec<HistoryItem>,
    pub shipping_address: Option<String>,
    pub billing_address: Option<String>,
    pub payment_method: Option<String>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

/// One page of `/api/users/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHistoryPage {
    #[serde(default)]
    pub orders: Vec<OrderHistoryEntry>,
    #[serde(flatten)]
    pub page: PageInfo,
}

/// One page of the admin order listing (`/api/admin/orders`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminOrderPage {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(flatten)]
    pub page: PageInfo,
}

/// Acknowledgement of an admin status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusChange {
    pub message: Option<String>,
    pub order_id: OrderId,
    pub new_status: OrderStatus,
}

/// Addresses submitted when turning the cart into an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAddresses {
    pub shipping_address: String,
    pub billing_address: String,
}

/// Body of `PUT /api/orders/{id}` recording (or clearing) a coupon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCouponUpdate {
    pub coupon_code: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_amount: Decimal,
}
