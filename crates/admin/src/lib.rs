//! BlitzShop admin console library.
//!
//! Thin, admin-gated wrappers over the management and analytics endpoints,
//! sharing the storefront's API client and session.
//!
//! # Security
//!
//! Every operation requires a signed-in user with `is_admin`. The check runs
//! locally before each request; the server enforces it again and a 403 is
//! reported as [`ClientError::Forbidden`](blitzshop_storefront::ClientError).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod analytics;
pub mod client;
pub mod coupons;
pub mod invoices;
pub mod orders;
pub mod products;

pub use analytics::ExportRange;
pub use client::AdminClient;
pub use coupons::CouponQuery;
pub use invoices::InvoiceQuery;
pub use orders::OrderSearch;
pub use products::{AdminProductQuery, ProductImage, ProductToggle};
