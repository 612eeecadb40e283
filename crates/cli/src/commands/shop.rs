//! Catalog, cart, orders and checkout.

use blitzshop_core::{CartItemId, OrderAddresses, OrderId, ProductId, ReviewDraft, ReviewId};
use blitzshop_storefront::api::ProductQuery;
use blitzshop_storefront::stripe::StripeConfirmer;
use blitzshop_storefront::{ClientConfig, Storefront};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::info;

use super::{CartAction, CommandError, OrderAction, ProductAction};
use crate::output;

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_ORDERS_PER_PAGE: u32 = 10;

/// Run a catalog command.
///
/// # Errors
///
/// Returns an error if a request fails.
pub async fn products(shop: &Storefront, action: ProductAction) -> Result<(), CommandError> {
    match action {
        ProductAction::List {
            search,
            category,
            min_price,
            max_price,
            in_stock,
            page,
            per_page,
        } => {
            let query = ProductQuery {
                search,
                category,
                min_price,
                max_price,
                in_stock: in_stock.then_some(true),
                page,
                per_page,
            };
            let page = shop.api().list_products(&query).await?;
            for product in &page.products {
                let stock = if product.is_in_stock() { "" } else { " (out of stock)" };
                output::line(&format!(
                    "#{:<5} {:<40} {:>10}{stock}",
                    product.id.as_i32(),
                    product.name,
                    product.sale_price()
                ))?;
            }
            output::line(&format!(
                "Page {} of {} ({} products)",
                page.pagination.page, page.pagination.pages, page.pagination.total
            ))
        }
        ProductAction::Show { id } => {
            let product = shop.api().product(ProductId::new(id)).await?;
            output::json(&product)
        }
        ProductAction::Categories => {
            for category in shop.api().categories().await? {
                output::line(&category)?;
            }
            Ok(())
        }
        ProductAction::Reviews { id, page, per_page } => {
            let reviews = shop
                .api()
                .product_reviews(ProductId::new(id), page, per_page)
                .await?;
            for review in &reviews.reviews {
                let author = review.user_name.as_deref().unwrap_or("anonymous");
                let verified = if review.is_verified_purchase { " (verified)" } else { "" };
                output::line(&format!(
                    "#{:<5} {}/5 by {author}{verified}: {}",
                    review.id.as_i32(),
                    review.rating,
                    review.comment.as_deref().unwrap_or("")
                ))?;
            }
            output::line(&format!(
                "Average {} from {} reviews (page {} of {})",
                reviews.average_rating.round_dp(1),
                reviews.total_reviews,
                reviews.page,
                reviews.pages
            ))
        }
        ProductAction::CanReview { id } => {
            let token = shop.session().require_token().await?;
            let eligibility = shop.api().can_review(&token, ProductId::new(id)).await?;
            output::json(&eligibility)
        }
        ProductAction::Review {
            id,
            rating,
            comment,
            title,
            order_id,
        } => {
            let token = shop.session().require_token().await?;
            let draft = ReviewDraft {
                rating: Some(rating),
                title,
                comment: Some(comment),
                order_id: order_id.map(OrderId::new),
            };
            let review = shop
                .api()
                .create_review(&token, ProductId::new(id), &draft)
                .await?;
            output::json(&review)
        }
        ProductAction::EditReview {
            review_id,
            rating,
            comment,
            title,
        } => {
            let token = shop.session().require_token().await?;
            let draft = ReviewDraft {
                rating,
                title,
                comment,
                order_id: None,
            };
            let review = shop
                .api()
                .update_review(&token, ReviewId::new(review_id), &draft)
                .await?;
            output::json(&review)
        }
        ProductAction::DeleteReview { review_id } => {
            let token = shop.session().require_token().await?;
            shop.api()
                .delete_review(&token, ReviewId::new(review_id))
                .await?;
            output::line(&format!("Review #{review_id} deleted"))
        }
        ProductAction::MyReviews => {
            let token = shop.session().require_token().await?;
            let reviews = shop.api().my_reviews(&token).await?;
            output::json(&reviews)
        }
    }
}

/// Run a cart command, then print the cart.
///
/// # Errors
///
/// Returns an error if signed out or a request fails; local state has
/// already been rolled back by then.
pub async fn cart(shop: &Storefront, action: CartAction) -> Result<(), CommandError> {
    let cart = shop.cart();
    match action {
        CartAction::Show => {}
        CartAction::Add {
            product_id,
            quantity,
        } => cart.add(ProductId::new(product_id), quantity).await?,
        CartAction::Update { item_id, quantity } => {
            cart.update(CartItemId::new(item_id), quantity).await?;
        }
        CartAction::Remove { item_id } => cart.remove(CartItemId::new(item_id)).await?,
        CartAction::Clear => cart.clear().await?,
    }

    output::json(&json!({
        "items": cart.items().await,
        "total_items": cart.total_items().await,
        "total_price": cart.total_price().await,
    }))
}

/// Check a coupon against `total`, or the cart total when omitted.
///
/// # Errors
///
/// Returns `CouponCodeRequired` for a blank code, or the server's rejection.
pub async fn coupon(
    shop: &Storefront,
    code: &str,
    total: Option<Decimal>,
) -> Result<(), CommandError> {
    let total = match total {
        Some(total) => total,
        None => shop.cart().total_price().await,
    };
    let validation = shop.checkout().preview_coupon(code, total).await?;
    output::json(&validation)
}

/// Run an order command.
///
/// # Errors
///
/// Returns an error if signed out or a request fails.
pub async fn orders(shop: &Storefront, action: OrderAction) -> Result<(), CommandError> {
    let session = shop.session();
    match action {
        OrderAction::Place { shipping, billing } => {
            let addresses = OrderAddresses {
                billing_address: billing.unwrap_or_else(|| shipping.clone()),
                shipping_address: shipping,
            };
            let order = shop.checkout().place_order(&addresses).await?;
            output::line(&format!(
                "Order #{} placed, total {}",
                order.id, order.total_amount
            ))
        }
        OrderAction::List { page, limit } => {
            let token = session.require_token().await?;
            let orders = shop
                .api()
                .my_orders(
                    &token,
                    page.unwrap_or(DEFAULT_PAGE),
                    limit.unwrap_or(DEFAULT_ORDERS_PER_PAGE),
                )
                .await?;
            output::json(&orders)
        }
        OrderAction::History { page, per_page } => {
            let token = session.require_token().await?;
            let history = shop
                .api()
                .order_history(
                    &token,
                    page.unwrap_or(DEFAULT_PAGE),
                    per_page.unwrap_or(DEFAULT_ORDERS_PER_PAGE),
                )
                .await?;
            output::json(&history)
        }
        OrderAction::Show { id } => {
            let token = session.require_token().await?;
            let order = shop.api().order(&token, OrderId::new(id)).await?;
            output::json(&order)
        }
    }
}

/// Apply an optional coupon to an order and pay for it by card.
///
/// # Errors
///
/// Returns `PaymentsNotConfigured` without a Stripe key, or the failure of
/// any checkout step.
pub async fn checkout(
    shop: &Storefront,
    config: &ClientConfig,
    order_id: i32,
    coupon: Option<&str>,
) -> Result<(), CommandError> {
    let stripe = config
        .stripe
        .clone()
        .ok_or(CommandError::PaymentsNotConfigured)?;
    let checkout = shop.checkout();
    let order_id = OrderId::new(order_id);

    let (order, mut totals) = checkout.load(order_id).await?;
    if !order.status.is_payable() {
        return Err(CommandError::InvalidArgument(format!(
            "order #{order_id} is {} and cannot be paid",
            order.status
        )));
    }

    if let Some(code) = coupon {
        let applied = checkout.apply_coupon(order_id, &mut totals, code).await?;
        output::line(&format!(
            "Coupon {} applied: -{}",
            applied.code, applied.discount_amount
        ))?;
    }

    output::line(&format!(
        "Subtotal {}  Discount {}  Total {}",
        totals.subtotal(),
        totals.discount(),
        totals.total()
    ))?;

    let confirmer = StripeConfirmer::new(stripe);
    let confirmation = checkout.pay(order_id, &totals, &confirmer).await?;
    info!(order_id = %order_id, "Order paid");
    output::line(&format!(
        "Payment confirmed, order #{} is now {}",
        confirmation.order.id, confirmation.order.status
    ))
}
