//! Sales analytics (`/api/analytics/*`).
//!
//! Numeric parameters are clamped to the ranges the server accepts, so an
//! out-of-range request degrades to the nearest valid report instead of a
//! 400.

use blitzshop_core::{
    CategoryPerformance, DailyRevenue, DashboardMetrics, ExportKind, LowStockProduct,
    MonthlyRevenue, SalesSummary, TopCustomer, TopProduct,
};
use blitzshop_storefront::error::Result;
use blitzshop_storefront::validation::ValidationError;
use chrono::NaiveDate;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::client::AdminClient;

pub const DEFAULT_REVENUE_DAYS: u32 = 7;
pub const DEFAULT_SUMMARY_DAYS: u32 = 30;
pub const DEFAULT_RANKING_LIMIT: u32 = 10;
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;

const MAX_DAYS: u32 = 365;
const MAX_RANKING_LIMIT: u32 = 100;
const MAX_LOW_STOCK_THRESHOLD: u32 = 100_000;

/// Clamp a reporting window to `1..=365` days.
#[must_use]
pub fn clamp_days(days: Option<u32>, default: u32) -> u32 {
    days.unwrap_or(default).clamp(1, MAX_DAYS)
}

/// Clamp a ranking size to `1..=100`.
#[must_use]
pub fn clamp_limit(limit: Option<u32>) -> u32 {
    limit
        .unwrap_or(DEFAULT_RANKING_LIMIT)
        .clamp(1, MAX_RANKING_LIMIT)
}

/// Period covered by a CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportRange {
    /// The last N days, today included.
    Days(u32),
    /// Explicit inclusive dates.
    Dates { start: NaiveDate, end: NaiveDate },
}

impl Default for ExportRange {
    fn default() -> Self {
        Self::Days(DEFAULT_REVENUE_DAYS)
    }
}

impl ExportRange {
    fn query_pairs(
        self,
    ) -> std::result::Result<Vec<(&'static str, Option<String>)>, ValidationError> {
        match self {
            Self::Days(days) => {
                let days = clamp_days(Some(days), DEFAULT_REVENUE_DAYS);
                Ok(vec![("days", Some(days.to_string()))])
            }
            Self::Dates { start, end } if start > end => Err(ValidationError::InvalidDateRange),
            Self::Dates { start, end } => Ok(vec![
                ("start_date", Some(start.format("%Y-%m-%d").to_string())),
                ("end_date", Some(end.format("%Y-%m-%d").to_string())),
            ]),
        }
    }
}

impl AdminClient {
    async fn report<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, Option<String>)],
        fallback: &str,
    ) -> Result<T> {
        let token = self.token().await?;
        let request = self.api.request(Method::GET, path, query, Some(&token))?;
        let report = self.send(request, fallback).await?;
        debug!(path, "Analytics report fetched");
        Ok(report)
    }

    /// Headline figures for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<DashboardMetrics> {
        self.report("api/analytics/dashboard", &[], "Error fetching dashboard")
            .await
    }

    /// Revenue per day over the last `days` days (default 7).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn daily_revenue(&self, days: Option<u32>) -> Result<Vec<DailyRevenue>> {
        let days = clamp_days(days, DEFAULT_REVENUE_DAYS);
        self.report(
            "api/analytics/revenue/daily",
            &[("days", Some(days.to_string()))],
            "Error fetching daily revenue",
        )
        .await
    }

    /// Revenue per month for the last twelve months.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn monthly_revenue(&self) -> Result<Vec<MonthlyRevenue>> {
        self.report(
            "api/analytics/revenue/monthly",
            &[],
            "Error fetching monthly revenue",
        )
        .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn top_products(&self, limit: Option<u32>) -> Result<Vec<TopProduct>> {
        self.report(
            "api/analytics/products/top",
            &[("limit", Some(clamp_limit(limit).to_string()))],
            "Error fetching top products",
        )
        .await
    }

    /// Active products whose stock is at or below `threshold` (default 10).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn low_stock(&self, threshold: Option<u32>) -> Result<Vec<LowStockProduct>> {
        let threshold = threshold
            .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD)
            .clamp(1, MAX_LOW_STOCK_THRESHOLD);
        self.report(
            "api/analytics/products/low-stock",
            &[("threshold", Some(threshold.to_string()))],
            "Error fetching low stock products",
        )
        .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn top_customers(&self, limit: Option<u32>) -> Result<Vec<TopCustomer>> {
        self.report(
            "api/analytics/customers/top",
            &[("limit", Some(clamp_limit(limit).to_string()))],
            "Error fetching top customers",
        )
        .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn category_performance(&self) -> Result<Vec<CategoryPerformance>> {
        self.report(
            "api/analytics/categories/performance",
            &[],
            "Error fetching category performance",
        )
        .await
    }

    /// Sales summary for the last `days` days (default 30).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn sales_summary(&self, days: Option<u32>) -> Result<SalesSummary> {
        let days = clamp_days(days, DEFAULT_SUMMARY_DAYS);
        self.report(
            "api/analytics/summary",
            &[("days", Some(days.to_string()))],
            "Error fetching summary",
        )
        .await
    }

    /// Export a dataset as CSV text.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` without a request when `start` is after
    /// `end`.
    #[instrument(skip(self))]
    pub async fn export_csv(&self, kind: ExportKind, range: ExportRange) -> Result<String> {
        let mut query = vec![("type", Some(kind.to_string()))];
        query.extend(range.query_pairs()?);

        let token = self.token().await?;
        let request = self
            .api
            .request(Method::GET, "api/analytics/export", &query, Some(&token))?;
        self.send_text(request, "Error exporting data").await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_days_are_clamped() {
        assert_eq!(clamp_days(None, DEFAULT_REVENUE_DAYS), 7);
        assert_eq!(clamp_days(None, DEFAULT_SUMMARY_DAYS), 30);
        assert_eq!(clamp_days(Some(0), DEFAULT_REVENUE_DAYS), 1);
        assert_eq!(clamp_days(Some(900), DEFAULT_REVENUE_DAYS), 365);
        assert_eq!(clamp_days(Some(90), DEFAULT_REVENUE_DAYS), 90);
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(clamp_limit(None), 10);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(250)), 100);
    }

    #[test]
    fn test_export_range_rejects_inverted_dates() {
        let range = ExportRange::Dates {
            start: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        };
        assert_eq!(range.query_pairs(), Err(ValidationError::InvalidDateRange));
    }

    #[test]
    fn test_export_range_days_is_clamped() {
        let pairs = ExportRange::Days(1000).query_pairs().unwrap();
        assert_eq!(pairs, vec![("days", Some("365".to_string()))]);
    }
}
