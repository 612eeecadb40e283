//! Wire records returned by the BlitzShop REST API.
//!
//! Field names match the JSON produced by the backend exactly. These are
//! read-only projections: the server owns every record, the client only
//! displays them and, for the cart, mirrors them optimistically.

pub mod analytics;
pub mod cart;
pub mod coupon;
pub mod invoice;
pub mod order;
pub mod page;
pub mod product;
pub mod review;
pub mod user;

pub use analytics::*;
pub use cart::*;
pub use coupon::*;
pub use invoice::*;
pub use order::*;
pub use page::*;
pub use product::*;
pub use review::*;
pub use user::*;
