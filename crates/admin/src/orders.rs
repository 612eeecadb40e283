//! Order fulfilment.

use blitzshop_core::{
    AdminOrderPage, AdminOrderSummary, LimitPage, OrderId, OrderStatus, OrderStatusChange,
};
use blitzshop_storefront::error::Result;
use chrono::NaiveDate;
use reqwest::Method;
use serde::Serialize;
use tracing::{info, instrument};

use crate::client::AdminClient;

/// Filters for `GET /api/orders/admin/all`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSearch {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<OrderStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl OrderSearch {
    fn query_pairs(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("page", self.page.map(|p| p.to_string())),
            ("limit", self.limit.map(|l| l.to_string())),
            ("status", self.status.map(|s| s.to_string())),
            (
                "start_date",
                self.start_date.map(|d| d.format("%Y-%m-%d").to_string()),
            ),
            (
                "end_date",
                self.end_date.map(|d| d.format("%Y-%m-%d").to_string()),
            ),
        ]
    }
}

#[derive(Serialize)]
struct StatusBody {
    status: OrderStatus,
}

impl AdminClient {
    /// Orders with their lines, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        status: Option<OrderStatus>,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<AdminOrderPage> {
        let token = self.token().await?;
        let request = self.api.request(
            Method::GET,
            "api/admin/orders",
            &[
                ("status", status.map(|s| s.to_string())),
                ("page", page.map(|p| p.to_string())),
                ("per_page", per_page.map(|p| p.to_string())),
            ],
            Some(&token),
        )?;
        self.send(request, "Error fetching orders").await
    }

    /// Move an order to another status.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` for unknown orders.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<OrderStatusChange> {
        let token = self.token().await?;
        let request = self
            .api
            .request(
                Method::PUT,
                &format!("api/admin/orders/{id}/status"),
                &[],
                Some(&token),
            )?
            .json(&StatusBody { status });
        let change: OrderStatusChange = self.send(request, "Error updating order status").await?;
        info!(new_status = %change.new_status, "Order status updated");
        Ok(change)
    }

    /// Order search across all customers, filterable by status and date.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn all_orders(&self, search: &OrderSearch) -> Result<LimitPage<AdminOrderSummary>> {
        let token = self.token().await?;
        let request = self.api.request(
            Method::GET,
            "api/orders/admin/all",
            &search.query_pairs(),
            Some(&token),
        )?;
        self.send(request, "Failed to fetch orders").await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_search_formats_dates_and_status() {
        let search = OrderSearch {
            status: Some(OrderStatus::Shipped),
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 31),
            ..OrderSearch::default()
        };
        let pairs = search.query_pairs();
        assert!(pairs.contains(&("status", Some("shipped".to_string()))));
        assert!(pairs.contains(&("start_date", Some("2024-03-01".to_string()))));
        assert!(pairs.contains(&("end_date", Some("2024-03-31".to_string()))));
        assert!(pairs.contains(&("page", None)));
    }
}
