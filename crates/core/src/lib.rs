//! BlitzShop Core - Shared types library.
//!
//! This crate provides common types used across all BlitzShop client components:
//! - `storefront` - Shopper-facing SDK (session, cart, catalog, checkout)
//! - `admin` - Admin console SDK (analytics, product/order/coupon/invoice management)
//! - `cli` - Command-line front end over both SDKs
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, timestamps and statuses
//! - [`models`] - Wire records returned by the BlitzShop REST API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
