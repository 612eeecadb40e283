//! Pagination envelopes.
//!
//! The API is not consistent about paging metadata, so each listing keeps
//! its own envelope with the fields it actually returns.

use serde::{Deserialize, Serialize};

/// Catalog-style pagination block (`{"pagination": {...}}`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub pages: u32,
    pub per_page: u32,
    pub total: u64,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
}

/// Flat paging fields used by the user order history, invoices and coupons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub current_page: u32,
    pub per_page: Option<u32>,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_prev: bool,
}

/// Limit-based paging used by `/api/orders/my` and `/api/orders/admin/all`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitPage<T> {
    pub page: u32,
    pub limit: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub items: Vec<T>,
}
