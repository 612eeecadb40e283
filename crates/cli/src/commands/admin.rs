//! Admin console commands.
//!
//! # Usage
//!
//! ```bash
//! blitz admin dashboard
//! blitz admin low-stock --threshold 5
//! blitz admin set-status 42 shipped
//! blitz admin create-coupon SPRING15 --percent 15 --min-purchase 40
//! blitz admin export customers --start 2024-01-01 --end 2024-03-31 > q1.csv
//! ```
//!
//! All commands require the signed-in user to be an administrator.

use std::path::Path;

use blitzshop_admin::{
    AdminClient, AdminProductQuery, CouponQuery, ExportRange, InvoiceQuery, ProductImage,
};
use blitzshop_core::{
    CouponDraft, DiscountType, InvoiceDraft, OrderId, ProductDraft, ProductId,
};
use blitzshop_storefront::Storefront;
use tracing::info;

use super::{AdminAction, CommandError};
use crate::output;

/// Content type guessed from an image file extension.
fn image_content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

async fn read_image(path: &Path) -> Result<ProductImage, CommandError> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();
    Ok(ProductImage {
        file_name,
        content_type: image_content_type(path).to_string(),
        bytes,
    })
}

/// Run an admin command.
///
/// # Errors
///
/// Returns `Forbidden` for non-admin sessions, or the failing request's error.
#[allow(clippy::too_many_lines)]
pub async fn run(shop: &Storefront, action: AdminAction) -> Result<(), CommandError> {
    let admin = AdminClient::new(shop.api().clone(), shop.session_handle()).await?;

    match action {
        AdminAction::Dashboard => output::json(&admin.dashboard().await?),
        AdminAction::Revenue { days } => output::json(&admin.daily_revenue(days).await?),
        AdminAction::MonthlyRevenue => output::json(&admin.monthly_revenue().await?),
        AdminAction::TopProducts { limit } => output::json(&admin.top_products(limit).await?),
        AdminAction::LowStock { threshold } => output::json(&admin.low_stock(threshold).await?),
        AdminAction::TopCustomers { limit } => output::json(&admin.top_customers(limit).await?),
        AdminAction::Categories => output::json(&admin.category_performance().await?),
        AdminAction::Summary { days } => output::json(&admin.sales_summary(days).await?),
        AdminAction::Export {
            kind,
            days,
            start,
            end,
        } => {
            let range = match (start, end) {
                (Some(start), Some(end)) => ExportRange::Dates { start, end },
                _ => days.map_or_else(ExportRange::default, ExportRange::Days),
            };
            let csv = admin.export_csv(kind, range).await?;
            output::raw(csv.as_bytes())
        }
        AdminAction::Products {
            search,
            category,
            page,
        } => {
            let query = AdminProductQuery {
                page,
                search,
                category,
                ..AdminProductQuery::default()
            };
            output::json(&admin.list_products(&query).await?)
        }
        AdminAction::CreateProduct {
            name,
            price,
            category,
            description,
            stock,
            image,
        } => {
            let draft = ProductDraft {
                name: Some(name),
                price: Some(price),
                category: Some(category),
                description,
                stock_quantity: stock,
                is_active: Some(true),
                ..ProductDraft::default()
            };
            let product = match image {
                Some(path) => {
                    let image = read_image(&path).await?;
                    admin.create_product_with_image(&draft, image).await?
                }
                None => admin.create_product(&draft).await?,
            };
            output::line(&format!("Created product #{}", product.id))
        }
        AdminAction::ToggleProduct { id } => {
            let toggle = admin.toggle_product_status(ProductId::new(id)).await?;
            let state = if toggle.is_active { "active" } else { "inactive" };
            output::line(&format!("Product #{id} is now {state}"))
        }
        AdminAction::DeleteProduct { id } => {
            let ack = admin.delete_product(ProductId::new(id)).await?;
            output::line(ack.message.as_deref().unwrap_or("Product deleted"))
        }
        AdminAction::Orders { status, page } => {
            output::json(&admin.list_orders(status, page, None).await?)
        }
        AdminAction::SetStatus { id, status } => {
            let change = admin.update_order_status(OrderId::new(id), status).await?;
            info!(order_id = %change.order_id, "Status changed from the CLI");
            output::line(&format!(
                "Order #{} is now {}",
                change.order_id, change.new_status
            ))
        }
        AdminAction::Coupons { status, search } => {
            let query = CouponQuery {
                status,
                search,
                ..CouponQuery::default()
            };
            output::json(&admin.list_coupons(&query).await?)
        }
        AdminAction::CreateCoupon {
            code,
            percent,
            amount,
            min_purchase,
            usage_limit,
        } => {
            let (discount_type, discount_value) = match (percent, amount) {
                (_, Some(amount)) => (DiscountType::Fixed, amount),
                (Some(percent), None) => (DiscountType::Percentage, percent),
                (None, None) => {
                    return Err(CommandError::InvalidArgument(
                        "either --percent or --amount is required".to_string(),
                    ));
                }
            };
            let draft = CouponDraft {
                code: Some(code),
                discount_type: Some(discount_type),
                discount_value: Some(discount_value),
                min_purchase,
                usage_limit,
                ..CouponDraft::default()
            };
            let coupon = admin.create_coupon(&draft).await?;
            output::line(&format!("Created coupon {}", coupon.code))
        }
        AdminAction::CouponStats => output::json(&admin.coupon_stats().await?),
        AdminAction::Invoices { status } => {
            let query = InvoiceQuery {
                status,
                ..InvoiceQuery::default()
            };
            output::json(&admin.list_invoices(&query).await?)
        }
        AdminAction::Invoice { order_id } => {
            let invoice = admin
                .create_invoice(OrderId::new(order_id), &InvoiceDraft::default())
                .await?;
            output::line(&format!(
                "Issued invoice {} for {}",
                invoice.invoice_number, invoice.total_amount
            ))
        }
    }
}
