//! Customer-facing order endpoints.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use giftly_core::OrderId;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::Order;
use crate::response::ApiResponse;
use crate::services::intake::{self, OrderSummary, PlaceOrderRequest};
use crate::state::AppState;

/// POST /api/orders - place an order from a cart payload.
#[tracing::instrument(skip(state, request), fields(user_id = %user.id))]
pub async fn place(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<Json<ApiResponse<OrderSummary>>> {
    let summary = intake::place_order(&state, &user, request).await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// GET /api/orders - the customer's order history, newest first.
#[tracing::instrument(skip(state), fields(user_id = %user.id))]
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<Order>>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;
    Ok(Json(ApiResponse::ok(orders)))
}

/// GET /api/orders/{id} - order detail, visible only to its owner.
#[tracing::instrument(skip(state), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<OrderId>,
) -> Result<Json<ApiResponse<Order>>> {
    let order = fetch_owned(&state, &user, id).await?;
    Ok(Json(ApiResponse::ok(order)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

/// POST /api/orders/{id}/cancel - customer cancellation.
///
/// Allowed only while the order is `pending` or `confirmed`. Cancelling a
/// paid order also flips its payment status to `refunded` (status-only;
/// the actual gateway refund is an operator action).
#[tracing::instrument(skip(state), fields(user_id = %user.id))]
pub async fn cancel(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<OrderId>,
    Json(request): Json<CancelRequest>,
) -> Result<Json<ApiResponse<Order>>> {
    let mut order = fetch_owned(&state, &user, id).await?;

    order
        .cancel(request.reason.as_deref())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    OrderRepository::new(state.pool()).update(&order).await?;
    tracing::info!(order_number = %order.order_number, "Order cancelled by customer");

    Ok(Json(ApiResponse::ok(order)))
}

/// Fetch an order and enforce ownership. A foreign order id reads as not
/// found rather than forbidden, so order ids cannot be probed.
async fn fetch_owned(state: &AppState, user: &CurrentUser, id: OrderId) -> Result<Order> {
    let order = OrderRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("order".to_string()))?;
    if order.user_id != user.id {
        return Err(AppError::NotFound("order".to_string()));
    }
    Ok(order)
}
