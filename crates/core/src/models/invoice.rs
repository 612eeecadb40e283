//! Invoice records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::PageInfo;
use crate::types::{InvoiceId, InvoiceStatus, OrderId, Timestamp, UserId};

/// Billing party printed on an invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingDetails {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// Issuing company printed on an invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDetails {
    pub name: Option<String>,
    pub tax_id: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// An invoice generated for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub order_id: OrderId,
    pub user_id: UserId,
    pub issue_date: Option<Timestamp>,
    pub due_date: Option<Timestamp>,
    pub subtotal: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub shipping_cost: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub payment_method: Option<String>,
    pub payment_date: Option<Timestamp>,
    pub billing: Option<BillingDetails>,
    pub company: Option<CompanyDetails>,
    pub currency: Option<String>,
    pub notes: Option<String>,
    pub pdf_url: Option<String>,
    pub created_at: Option<Timestamp>,
}

/// One page of the shopper's invoices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePage {
    pub invoices: Vec<Invoice>,
    #[serde(flatten)]
    pub page: PageInfo,
    pub stats: Option<InvoiceStats>,
}

/// Aggregate block of the admin invoice listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceStats {
    pub total_invoiced: Decimal,
    pub total_invoices: u64,
}

/// Options for `POST /api/admin/invoices/create/{order_id}`.
///
/// Unset fields fall back to the invoice settings on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub tax_rate: Option<Decimal>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub shipping_cost: Option<Decimal>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub discount_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `PUT /api/admin/invoices/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InvoiceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

/// Company and numbering defaults used when generating invoices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSettings {
    pub company_name: Option<String>,
    pub company_tax_id: Option<String>,
    pub company_address: Option<String>,
    pub company_city: Option<String>,
    pub company_postal_code: Option<String>,
    pub company_country: Option<String>,
    pub company_email: Option<String>,
    pub company_phone: Option<String>,
    pub company_website: Option<String>,
    pub invoice_prefix: Option<String>,
    pub default_currency: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option", default)]
    pub default_tax_rate: Option<Decimal>,
    pub payment_terms_days: Option<u32>,
    pub terms_conditions: Option<String>,
    pub footer_text: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account: Option<String>,
    pub bank_iban: Option<String>,
    pub bank_swift: Option<String>,
    pub logo_url: Option<String>,
}
