//! Coupon validation endpoint.
//!
//! Lets the cart page preview a discount before checkout. Evaluation here is
//! read-only and advisory; intake re-evaluates the coupon against the real
//! subtotal when the order is placed.

use axum::{Json, extract::State};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::CouponRepository;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCouponRequest {
    pub code: String,
    pub cart_total: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponPreview {
    pub code: String,
    pub discount: Decimal,
    /// Cart total after discount, before shipping and tax.
    pub discounted_total: Decimal,
}

/// POST /api/coupons/validate - evaluate a coupon against a cart total.
#[tracing::instrument(skip(state, request), fields(user_id = %user.id))]
pub async fn validate(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<ValidateCouponRequest>,
) -> Result<Json<ApiResponse<CouponPreview>>> {
    let code = request.code.trim();
    if code.is_empty() {
        return Err(AppError::BadRequest("Coupon code is required".to_string()));
    }

    let coupon = CouponRepository::new(state.pool())
        .get_by_code(code)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid coupon code".to_string()))?;

    let discount = coupon.evaluate(request.cart_total, Utc::now())?;

    Ok(Json(ApiResponse::ok(CouponPreview {
        code: coupon.code,
        discount,
        discounted_total: request.cart_total - discount,
    })))
}
