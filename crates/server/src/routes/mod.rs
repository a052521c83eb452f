//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Liveness check
//! GET  /health/ready                  - Readiness check (pings the database)
//!
//! # Storefront API (customer identity via x-user-id / x-user-email)
//! POST /api/orders                    - Place an order
//! GET  /api/orders                    - List the customer's orders
//! GET  /api/orders/{id}               - Order detail (owner only)
//! POST /api/orders/{id}/cancel        - Customer cancellation
//! POST /api/coupons/validate          - Preview a coupon against a cart total
//!
//! # Payment gateway
//! POST /api/webhooks/razorpay         - Signed gateway event ingestion
//!
//! # Admin API (gated by x-admin-key)
//! GET  /api/admin/orders              - List orders (status filter, pagination)
//! PATCH /api/admin/orders/{id}/status - Force a status transition
//! PUT  /api/admin/orders/{id}/tracking - Attach tracking, move to shipped
//! ```

pub mod admin;
pub mod coupons;
pub mod orders;
pub mod webhooks;

use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::state::AppState;

/// Create the customer-facing order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::place).get(orders::list))
        .route("/{id}", get(orders::show))
        .route("/{id}/cancel", post(orders::cancel))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(admin::list_orders))
        .route("/orders/{id}/status", patch(admin::update_status))
        .route("/orders/{id}/tracking", put(admin::set_tracking))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/orders", order_routes())
        .route("/api/coupons/validate", post(coupons::validate))
        .route("/api/webhooks/razorpay", post(webhooks::razorpay))
        .nest("/api/admin", admin_routes())
}
