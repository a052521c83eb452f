//! Order intake: convert a cart payload into a persisted order.
//!
//! Validation and resolution short-circuit in a fixed order; nothing is
//! persisted until everything passed. The stock decrements and the order
//! insert run in one transaction, so a failed order leaves no partial state.
//! Confirmation email and operator notification run after commit and are
//! best-effort.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use giftly_core::{
    OrderId, OrderStatus, PaymentMethod, PaymentStatus, ProductId, Totals, generate_order_number,
};

use crate::db::{CouponRepository, OrderRepository, ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{Customization, Order, OrderItem, Product, ShippingAddress};
use crate::services::notify::OrderAlert;
use crate::state::AppState;

/// Inbound cart payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub items: Vec<CartItemInput>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One line of the inbound cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemInput {
    /// Structured product reference; tried first.
    #[serde(default)]
    pub product_id: Option<ProductId>,
    /// Fallback lookup by URL slug.
    #[serde(default)]
    pub slug: Option<String>,
    pub quantity: i32,
    /// Client-supplied price override; honored only for customized items,
    /// where personalization add-ons change the base price.
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub customization: Option<Customization>,
}

impl CartItemInput {
    fn describe(&self) -> String {
        self.slug.clone().map_or_else(
            || {
                self.product_id
                    .map_or_else(|| "unknown".to_string(), |id| id.to_string())
            },
            |slug| slug,
        )
    }
}

/// Created-order summary returned to the storefront.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    pub order_number: String,
    pub total: Decimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    /// Present for gateway payments; the checkout widget pays against this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_order_id: Option<String>,
}

/// Validate cart shape before touching the database.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for an empty cart, a non-positive
/// quantity, or an address missing its name or address line.
pub fn validate_request(request: &PlaceOrderRequest) -> Result<()> {
    if request.items.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".to_string()));
    }
    for item in &request.items {
        if item.quantity < 1 {
            return Err(AppError::BadRequest(format!(
                "Invalid quantity for {}",
                item.describe()
            )));
        }
    }
    let address = &request.shipping_address;
    if address.name.trim().is_empty() || address.address.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Shipping address requires a name and address line".to_string(),
        ));
    }
    Ok(())
}

/// Whether intake itself announces the order. Deferred methods are confirmed
/// on the spot; gateway orders announce once the capture event arrives, so
/// sending here too would notify twice.
#[must_use]
pub fn notify_at_intake(method: PaymentMethod) -> bool {
    method.is_deferred()
}

/// Unit price for a line: always the authoritative product price, except
/// that customized items may carry an explicit override.
#[must_use]
pub fn unit_price(input: &CartItemInput, product: &Product) -> Decimal {
    if input.customization.is_some() {
        input.price.unwrap_or(product.price)
    } else {
        product.price
    }
}

/// Snapshot a resolved product into an immutable order line.
#[must_use]
pub fn snapshot_item(input: &CartItemInput, product: &Product) -> OrderItem {
    OrderItem {
        product_id: product.id,
        name: product.name.clone(),
        slug: product.slug.clone(),
        image: product.image.clone(),
        price: unit_price(input, product),
        quantity: input.quantity,
        variant: input.variant.clone(),
        customization: input.customization.clone(),
    }
}

/// Place an order for `user` from the given cart payload.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for validation, resolution, stock, and
/// coupon failures (no partial state is committed), `AppError::Gateway` if
/// the gateway order cannot be created, and `AppError::Database` for
/// persistence failures.
pub async fn place_order(
    state: &AppState,
    user: &CurrentUser,
    request: PlaceOrderRequest,
) -> Result<OrderSummary> {
    validate_request(&request)?;

    let products = ProductRepository::new(state.pool());

    // Resolve every line against the catalog; any miss fails the whole cart.
    let mut items = Vec::with_capacity(request.items.len());
    let mut subtotal = Decimal::ZERO;
    for input in &request.items {
        let mut product = None;
        if let Some(id) = input.product_id {
            product = products.get_by_id(id).await?;
        }
        if product.is_none() {
            if let Some(slug) = input.slug.as_deref() {
                product = products.get_by_slug(slug).await?;
            }
        }
        let Some(product) = product else {
            return Err(AppError::BadRequest(format!(
                "Product not found: {}",
                input.describe()
            )));
        };

        if !product.has_stock(input.quantity) {
            return Err(AppError::BadRequest(format!(
                "Insufficient stock for {}",
                product.name
            )));
        }

        let item = snapshot_item(input, &product);
        subtotal += item.line_total();
        items.push(item);
    }

    // Coupon evaluation happens against the full subtotal.
    let coupon_code = request
        .coupon_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty());
    let discount = match coupon_code {
        Some(code) => {
            let coupon = CouponRepository::new(state.pool())
                .get_by_code(code)
                .await?
                .ok_or_else(|| AppError::BadRequest("Invalid coupon code".to_string()))?;
            coupon.evaluate(subtotal, Utc::now())?
        }
        None => Decimal::ZERO,
    };

    let totals = Totals::compute(subtotal, discount);
    let mut order = Order::place(
        generate_order_number(),
        user.id,
        items,
        totals,
        coupon_code.map(str::to_uppercase),
        request.payment_method,
        request.shipping_address,
        request.notes,
    );

    // Gateway payments need a gateway order before the widget can collect;
    // deferred methods are confirmed immediately.
    if request.payment_method == PaymentMethod::Razorpay {
        let gateway_order = state
            .gateway()
            .create_order(order.total, &order.order_number)
            .await?;
        order.payment.gateway_order_id = Some(gateway_order.id);
    } else if request.payment_method.is_deferred() {
        order.confirm_deferred();
    }

    // Stock decrements and the order insert are atomic: a conflicting
    // concurrent order rolls this one back instead of overselling.
    let mut tx = state.pool().begin().await.map_err(RepositoryError::from)?;
    for item in &order.items {
        let applied =
            ProductRepository::decrement_stock(&mut *tx, item.product_id, item.quantity).await?;
        if !applied {
            tx.rollback().await.map_err(RepositoryError::from)?;
            return Err(AppError::BadRequest(format!(
                "Insufficient stock for {}",
                item.name
            )));
        }
    }
    OrderRepository::insert(&mut *tx, &order).await?;
    tx.commit().await.map_err(RepositoryError::from)?;

    tracing::info!(
        order_number = %order.order_number,
        total = %order.total,
        method = %order.payment.method,
        "Order placed"
    );

    // Best-effort side effects; the order stands regardless. Gateway orders
    // are still awaiting payment here, so their email and ops alert are
    // deferred to the capture webhook.
    if notify_at_intake(order.payment.method) {
        if let Some(email_service) = state.email() {
            if let Some(customer_email) = user.email.as_deref() {
                if let Err(e) = email_service
                    .send_order_confirmation(customer_email, &order)
                    .await
                {
                    tracing::warn!(
                        order_number = %order.order_number,
                        error = %e,
                        "Failed to send confirmation email"
                    );
                }
            }
        }
        if let Some(notifier) = state.notifier() {
            if let Err(e) = notifier.send_order_alert(&OrderAlert::from_order(&order)).await {
                tracing::warn!(
                    order_number = %order.order_number,
                    error = %e,
                    "Failed to send operator notification"
                );
            }
        }
    }

    Ok(OrderSummary {
        id: order.id,
        order_number: order.order_number,
        total: order.total,
        status: order.status,
        payment_status: order.payment_status,
        gateway_order_id: order.payment.gateway_order_id,
    })
}
