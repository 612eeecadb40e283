//! Command implementations and their argument types.

use std::path::PathBuf;
use std::sync::Arc;

use blitzshop_core::{CouponStatusFilter, ExportKind, InvoiceStatus, OrderStatus};
use blitzshop_storefront::config::ConfigError;
use blitzshop_storefront::storage::FileStore;
use blitzshop_storefront::{ClientConfig, ClientError, Storefront};
use clap::Subcommand;
use rust_decimal::Decimal;
use thiserror::Error;

pub mod account;
pub mod admin;
pub mod session;
pub mod shop;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// SDK failure; shown with its banner text.
    #[error("{}", .0.user_message())]
    Client(#[from] ClientError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not format output: {0}")]
    Output(#[from] serde_json::Error),

    /// Card payments need `STRIPE_PUBLISHABLE_KEY` and `STRIPE_PAYMENT_METHOD`.
    #[error(
        "Card payments are not configured (set STRIPE_PUBLISHABLE_KEY and STRIPE_PAYMENT_METHOD)"
    )]
    PaymentsNotConfigured,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Open the storefront with the session persisted under the state directory.
///
/// # Errors
///
/// Returns an error if the API client cannot be built or the state file
/// cannot be read.
pub async fn connect(config: &ClientConfig) -> Result<Storefront, CommandError> {
    let storage = Arc::new(FileStore::new(config.state_file()));
    Ok(Storefront::connect(config, storage).await?)
}

#[derive(Subcommand)]
pub enum ProductAction {
    /// List active products
    List {
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(long)]
        min_price: Option<Decimal>,

        #[arg(long)]
        max_price: Option<Decimal>,

        /// Only products with stock
        #[arg(long)]
        in_stock: bool,

        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        per_page: Option<u32>,
    },
    /// Show one product
    Show { id: i32 },
    /// List categories
    Categories,
    /// List a product's reviews with its average rating
    Reviews {
        id: i32,

        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        per_page: Option<u32>,
    },
    /// Check whether you can review a product
    CanReview { id: i32 },
    /// Review a product
    Review {
        id: i32,

        /// Stars, 1 to 5
        #[arg(short, long)]
        rating: u8,

        #[arg(short, long)]
        comment: String,

        #[arg(short, long)]
        title: Option<String>,

        /// Order containing the product, for a verified review
        #[arg(long)]
        order_id: Option<i32>,
    },
    /// Edit one of your reviews
    EditReview {
        review_id: i32,

        #[arg(short, long)]
        rating: Option<u8>,

        #[arg(short, long)]
        comment: Option<String>,

        #[arg(short, long)]
        title: Option<String>,
    },
    /// Delete one of your reviews
    DeleteReview { review_id: i32 },
    /// List the reviews you have written
    MyReviews,
}

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart and its totals
    Show,
    /// Add a product
    Add {
        product_id: i32,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a cart line (0 removes it)
    Update { item_id: i32, quantity: u32 },
    /// Remove a cart line
    Remove { item_id: i32 },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
pub enum OrderAction {
    /// Turn the cart into an order
    Place {
        #[arg(long)]
        shipping: String,

        /// Defaults to the shipping address
        #[arg(long)]
        billing: Option<String>,
    },
    /// List orders
    List {
        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        limit: Option<u32>,
    },
    /// Order history with line details
    History {
        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        per_page: Option<u32>,
    },
    /// Show one order
    Show { id: i32 },
}

#[derive(Subcommand)]
pub enum InvoiceAction {
    /// List invoices
    List {
        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        per_page: Option<u32>,
    },
    /// Show one invoice
    Show { id: i32 },
    /// Save an invoice PDF
    Download {
        id: i32,

        #[arg(short, long)]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum AccountAction {
    /// Show the profile
    Profile,
    /// Show saved addresses
    Address,
    /// Change the password
    Password {
        #[arg(long, env = "BLITZSHOP_PASSWORD", hide_env_values = true)]
        current: String,

        #[arg(long)]
        new: String,

        #[arg(long)]
        confirm: String,
    },
    /// Show or change email notifications
    Notifications {
        /// `on` or `off`; omit to show the current setting
        state: Option<String>,
    },
    /// Deactivate the account and sign out
    Delete {
        #[arg(long, env = "BLITZSHOP_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Subcommand)]
pub enum AdminAction {
    /// Dashboard headline figures
    Dashboard,
    /// Daily revenue
    Revenue {
        #[arg(long)]
        days: Option<u32>,
    },
    /// Revenue per month
    MonthlyRevenue,
    /// Best-selling products
    TopProducts {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Products running out of stock
    LowStock {
        #[arg(long)]
        threshold: Option<u32>,
    },
    /// Best customers
    TopCustomers {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Revenue per category
    Categories,
    /// Sales summary
    Summary {
        #[arg(long)]
        days: Option<u32>,
    },
    /// Export a dataset as CSV to stdout
    Export {
        kind: ExportKind,

        #[arg(long, conflicts_with_all = ["start", "end"])]
        days: Option<u32>,

        /// `YYYY-MM-DD`
        #[arg(long, requires = "end")]
        start: Option<chrono::NaiveDate>,

        /// `YYYY-MM-DD`
        #[arg(long, requires = "start")]
        end: Option<chrono::NaiveDate>,
    },
    /// List products, inactive ones included
    Products {
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(long)]
        page: Option<u32>,
    },
    /// Create a product
    CreateProduct {
        #[arg(long)]
        name: String,

        #[arg(long)]
        price: Decimal,

        #[arg(long)]
        category: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        stock: Option<i32>,

        /// Image file uploaded with the product
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Activate or deactivate a product
    ToggleProduct { id: i32 },
    /// Delete a product
    DeleteProduct { id: i32 },
    /// List orders
    Orders {
        #[arg(long)]
        status: Option<OrderStatus>,

        #[arg(long)]
        page: Option<u32>,
    },
    /// Change an order's status
    SetStatus { id: i32, status: OrderStatus },
    /// List coupons
    Coupons {
        #[arg(long)]
        status: Option<CouponStatusFilter>,

        #[arg(short, long)]
        search: Option<String>,
    },
    /// Create a coupon
    CreateCoupon {
        code: String,

        #[arg(long)]
        percent: Option<Decimal>,

        #[arg(long, conflicts_with = "percent")]
        amount: Option<Decimal>,

        #[arg(long)]
        min_purchase: Option<Decimal>,

        #[arg(long)]
        usage_limit: Option<u32>,
    },
    /// Coupon statistics
    CouponStats,
    /// List invoices
    Invoices {
        #[arg(long)]
        status: Option<InvoiceStatus>,
    },
    /// Issue the invoice of an order
    Invoice { order_id: i32 },
}
