//! Admin analytics reports.
//!
//! Each struct mirrors one `/api/analytics/*` response. Growth and
//! percentage figures arrive already rounded by the server.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, UserId};

/// Headline figures for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_revenue: Decimal,
    pub total_orders: u64,
    pub total_customers: u64,
    pub today_revenue: Decimal,
    pub yesterday_revenue: Decimal,
    pub growth_percentage: Decimal,
    pub avg_order_value: Decimal,
    /// Number of products at or below the low stock threshold.
    pub low_stock_alert: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRevenue {
    pub date: String,
    pub revenue: Decimal,
    pub orders: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: Decimal,
    pub orders: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    pub units_sold: u64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockProduct {
    pub id: ProductId,
    pub name: String,
    pub stock: i32,
    pub price: Decimal,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopCustomer {
    pub id: UserId,
    pub username: Option<String>,
    pub email: String,
    pub total_orders: u64,
    pub total_spent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPerformance {
    pub category: String,
    pub product_count: u64,
    pub units_sold: u64,
    pub revenue: Decimal,
    /// Share of total revenue, 0-100.
    pub percentage: Decimal,
}

/// Sales summary over a trailing window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub period_days: u32,
    pub start_date: String,
    pub end_date: String,
    pub total_orders: u64,
    pub total_revenue: Decimal,
    pub avg_order_value: Decimal,
    pub best_category: String,
    pub best_category_revenue: Decimal,
    pub new_customers: u64,
}
