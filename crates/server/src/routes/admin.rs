//! Back-office order management, gated by the admin API key.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use giftly_core::{OrderId, OrderStatus};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Order, TrackingInfo};
use crate::response::ApiResponse;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersQuery {
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

/// GET /api/admin/orders - list orders, newest first.
#[tracing::instrument(skip(state, _admin))]
pub async fn list_orders(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<ApiResponse<Vec<Order>>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);

    let orders = OrderRepository::new(state.pool())
        .list(query.status, limit, offset)
        .await?;
    Ok(Json(ApiResponse::ok(orders)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
    #[serde(default)]
    pub message: Option<String>,
}

/// PATCH /api/admin/orders/{id}/status - force a status transition.
///
/// The back-office can set any status; there is no eligibility check here.
/// Setting `refunded` also moves the payment status to refunded.
#[tracing::instrument(skip(state, _admin, request))]
pub async fn update_status(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<OrderId>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<Order>>> {
    let repository = OrderRepository::new(state.pool());
    let mut order = repository.get(id).await?.ok_or_else(|| AppError::NotFound("order".to_string()))?;

    order.admin_set_status(request.status, request.message.as_deref());
    repository.update(&order).await?;

    tracing::info!(
        order_number = %order.order_number,
        status = %order.status,
        "Order status updated by admin"
    );
    Ok(Json(ApiResponse::ok(order)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTrackingRequest {
    pub carrier: String,
    pub tracking_number: String,
    #[serde(default)]
    pub tracking_url: Option<String>,
}

/// PUT /api/admin/orders/{id}/tracking - attach tracking and mark shipped.
#[tracing::instrument(skip(state, _admin, request))]
pub async fn set_tracking(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<OrderId>,
    Json(request): Json<SetTrackingRequest>,
) -> Result<Json<ApiResponse<Order>>> {
    if request.carrier.trim().is_empty() || request.tracking_number.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Carrier and tracking number are required".to_string(),
        ));
    }

    let repository = OrderRepository::new(state.pool());
    let mut order = repository.get(id).await?.ok_or_else(|| AppError::NotFound("order".to_string()))?;

    order.set_tracking(TrackingInfo {
        carrier: request.carrier,
        tracking_number: request.tracking_number,
        tracking_url: request.tracking_url,
    });
    repository.update(&order).await?;

    tracing::info!(order_number = %order.order_number, "Tracking attached, order shipped");
    Ok(Json(ApiResponse::ok(order)))
}
