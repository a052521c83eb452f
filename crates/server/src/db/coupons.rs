//! Coupon repository: read-only to the order flow.
//!
//! Coupons are created and edited from the admin catalog surfaces; intake and
//! the validation endpoint only look them up by code and run the evaluator.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use giftly_core::{Coupon, CouponId, DiscountType};

use super::RepositoryError;

/// Repository for coupon lookups.
pub struct CouponRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CouponRepository<'a> {
    /// Create a new coupon repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a coupon by its code (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if the stored discount type is
    /// unrecognized.
    pub async fn get_by_code(&self, code: &str) -> Result<Option<Coupon>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, code, active, discount_type, value,
                   max_discount_amount, min_order_amount,
                   valid_from, valid_until,
                   usage_limit, used_count, per_user_limit
            FROM coupons
            WHERE upper(code) = upper($1)
            ",
        )
        .bind(code)
        .fetch_optional(self.pool)
        .await?;

        row.map(map_coupon_row).transpose()
    }
}

fn map_coupon_row(row: PgRow) -> Result<Coupon, RepositoryError> {
    let discount_type: String = row.try_get("discount_type")?;
    let discount_type = match discount_type.as_str() {
        "percentage" => DiscountType::Percentage,
        "fixed" => DiscountType::Fixed,
        other => {
            return Err(RepositoryError::DataCorruption(format!(
                "invalid discount type in database: {other}"
            )));
        }
    };

    Ok(Coupon {
        id: CouponId::new(row.try_get::<Uuid, _>("id")?),
        code: row.try_get("code")?,
        active: row.try_get("active")?,
        discount_type,
        value: row.try_get::<Decimal, _>("value")?,
        max_discount_amount: row.try_get::<Option<Decimal>, _>("max_discount_amount")?,
        min_order_amount: row.try_get::<Option<Decimal>, _>("min_order_amount")?,
        valid_from: row.try_get::<Option<DateTime<Utc>>, _>("valid_from")?,
        valid_until: row.try_get::<Option<DateTime<Utc>>, _>("valid_until")?,
        usage_limit: row.try_get("usage_limit")?,
        used_count: row.try_get("used_count")?,
        per_user_limit: row.try_get("per_user_limit")?,
    })
}
