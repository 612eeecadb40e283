//! Status enums for various entities.
//!
//! All of these travel as lowercase strings on the wire and are accepted
//! from the command line through `FromStr`.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Orders are created `pending`, become `paid` once the payment is
/// confirmed, and are then moved along by an admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Paid,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the order can still be paid.
    #[must_use]
    pub const fn is_payable(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}

/// Invoice payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[default]
    Pending,
    Paid,
    Cancelled,
    Refunded,
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Paid => write!(f, "paid"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Refunded => write!(f, "refunded"),
        }
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "cancelled" => Ok(Self::Cancelled),
            "refunded" => Ok(Self::Refunded),
            _ => Err(format!("invalid invoice status: {s}")),
        }
    }
}

/// How a coupon's `discount_value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `discount_value` is a percentage of the cart total.
    Percentage,
    /// `discount_value` is a flat amount.
    Fixed,
}

impl std::fmt::Display for DiscountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Percentage => write!(f, "percentage"),
            Self::Fixed => write!(f, "fixed"),
        }
    }
}

impl std::str::FromStr for DiscountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(Self::Percentage),
            "fixed" => Ok(Self::Fixed),
            _ => Err(format!("invalid discount type: {s}")),
        }
    }
}

/// Coupon listing filter used by the admin console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CouponStatusFilter {
    #[default]
    All,
    Active,
    Expired,
    Inactive,
}

impl std::fmt::Display for CouponStatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Active => write!(f, "active"),
            Self::Expired => write!(f, "expired"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for CouponStatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "expired" => Ok(Self::Expired),
            "inactive" => Ok(Self::Inactive),
            _ => Err(format!("invalid coupon status filter: {s}")),
        }
    }
}

/// Dataset exported as CSV by the analytics endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    #[default]
    Orders,
    Products,
    Customers,
}

impl std::fmt::Display for ExportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Orders => write!(f, "orders"),
            Self::Products => write!(f, "products"),
            Self::Customers => write!(f, "customers"),
        }
    }
}

impl std::str::FromStr for ExportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "orders" => Ok(Self::Orders),
            "products" => Ok(Self::Products),
            "customers" => Ok(Self::Customers),
            _ => Err(format!("invalid export type: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_display_matches_wire() {
        for status in OrderStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
            assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_order_status_rejects_unknown() {
        assert!("refunded".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_only_pending_orders_are_payable() {
        assert!(OrderStatus::Pending.is_payable());
        assert!(!OrderStatus::Paid.is_payable());
        assert!(!OrderStatus::Cancelled.is_payable());
    }

    #[test]
    fn test_discount_type_deserializes() {
        let kind: DiscountType = serde_json::from_str("\"percentage\"").unwrap();
        assert_eq!(kind, DiscountType::Percentage);
        assert!(serde_json::from_str::<DiscountType>("\"bogus\"").is_err());
    }

    #[test]
    fn test_coupon_filter_default_is_all() {
        assert_eq!(CouponStatusFilter::default().to_string(), "all");
        assert_eq!(
            "expired".parse::<CouponStatusFilter>().unwrap(),
            CouponStatusFilter::Expired
        );
    }

    #[test]
    fn test_invoice_status_from_str() {
        assert_eq!("refunded".parse::<InvoiceStatus>().unwrap(), InvoiceStatus::Refunded);
        assert!("void".parse::<InvoiceStatus>().is_err());
    }
}
