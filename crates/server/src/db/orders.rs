//! Order repository.
//!
//! One row per order. Line items, timeline, shipping address, tracking, and
//! payment bookkeeping are stored as JSONB documents; updates rewrite the
//! mutable fields wholesale (last-write-wins, no version check - the same
//! write semantics the original document model had).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use giftly_core::{OrderId, OrderStatus, PaymentStatus, UserId};

use super::RepositoryError;
use crate::models::Order;

/// Repository for order persistence.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a freshly placed order.
    ///
    /// Takes an executor so intake can run the insert inside the same
    /// transaction as its stock decrements.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including
    /// order-number uniqueness violations).
    pub async fn insert(
        executor: impl sqlx::PgExecutor<'_>,
        order: &Order,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO orders (
                id, order_number, user_id, items,
                subtotal, shipping_cost, discount, tax, total, coupon_code,
                status, payment_status, payment, shipping_address,
                tracking, notes, timeline, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19)
            ",
        )
        .bind(order.id.as_uuid())
        .bind(&order.order_number)
        .bind(order.user_id.as_uuid())
        .bind(to_json(&order.items)?)
        .bind(order.subtotal)
        .bind(order.shipping_cost)
        .bind(order.discount)
        .bind(order.tax)
        .bind(order.total)
        .bind(&order.coupon_code)
        .bind(order.status.to_string())
        .bind(order.payment_status.to_string())
        .bind(to_json(&order.payment)?)
        .bind(to_json(&order.shipping_address)?)
        .bind(order.tracking.as_ref().map(to_json).transpose()?)
        .bind(&order.notes)
        .bind(to_json(&order.timeline)?)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Persist the mutable fields of an order after a state transition.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(&self, order: &Order) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            UPDATE orders
            SET status = $2,
                payment_status = $3,
                payment = $4,
                tracking = $5,
                timeline = $6,
                updated_at = $7
            WHERE id = $1
            ",
        )
        .bind(order.id.as_uuid())
        .bind(order.status.to_string())
        .bind(order.payment_status.to_string())
        .bind(to_json(&order.payment)?)
        .bind(order.tracking.as_ref().map(to_json).transpose()?)
        .bind(to_json(&order.timeline)?)
        .bind(order.updated_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Get an order by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored document fails to decode.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query(&select_query("WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(self.pool)
            .await?;

        row.map(map_order_row).transpose()
    }

    /// Find the order a gateway event refers to via its gateway order id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_gateway_order_id(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query(&select_query(&format!(
            "WHERE payment->>'{GATEWAY_ORDER_ID_KEY}' = $1"
        )))
        .bind(gateway_order_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(map_order_row).transpose()
    }

    /// Find the order a refund event refers to via its gateway payment id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_gateway_payment_id(
        &self,
        gateway_payment_id: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query(&select_query(&format!(
            "WHERE payment->>'{GATEWAY_PAYMENT_ID_KEY}' = $1"
        )))
        .bind(gateway_payment_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(map_order_row).transpose()
    }

    /// List a customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query(&select_query("WHERE user_id = $1 ORDER BY created_at DESC"))
            .bind(user_id.as_uuid())
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(map_order_row).collect()
    }

    /// Admin listing with optional status filter and pagination.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        status: Option<OrderStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = match status {
            Some(status) => {
                sqlx::query(&select_query(
                    "WHERE status = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
                ))
                .bind(status.to_string())
                .bind(limit)
                .bind(offset)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query(&select_query("ORDER BY created_at DESC LIMIT $1 OFFSET $2"))
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(self.pool)
                    .await?
            }
        };

        rows.into_iter().map(map_order_row).collect()
    }
}

const ORDER_COLUMNS: &str = "id, order_number, user_id, items, \
     subtotal, shipping_cost, discount, tax, total, coupon_code, \
     status, payment_status, payment, shipping_address, \
     tracking, notes, timeline, created_at, updated_at";

// JSONB keys inside the payment document. The document serializes with
// serde's camelCase rename, so the SQL predicates must use the camelCase
// keys, not the Rust field names.
const GATEWAY_ORDER_ID_KEY: &str = "gatewayOrderId";
const GATEWAY_PAYMENT_ID_KEY: &str = "gatewayPaymentId";

fn select_query(suffix: &str) -> String {
    format!("SELECT {ORDER_COLUMNS} FROM orders {suffix}")
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, RepositoryError> {
    serde_json::to_value(value)
        .map_err(|e| RepositoryError::DataCorruption(format!("failed to encode document: {e}")))
}

fn from_json<T: serde::de::DeserializeOwned>(
    value: serde_json::Value,
    field: &str,
) -> Result<T, RepositoryError> {
    serde_json::from_value(value).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid {field} document in database: {e}"))
    })
}

fn map_order_row(row: PgRow) -> Result<Order, RepositoryError> {
    let status: String = row.try_get("status")?;
    let status: OrderStatus = status
        .parse()
        .map_err(RepositoryError::DataCorruption)?;
    let payment_status: String = row.try_get("payment_status")?;
    let payment_status: PaymentStatus = payment_status
        .parse()
        .map_err(RepositoryError::DataCorruption)?;

    let tracking = row
        .try_get::<Option<serde_json::Value>, _>("tracking")?
        .map(|value| from_json(value, "tracking"))
        .transpose()?;

    Ok(Order {
        id: OrderId::new(row.try_get::<Uuid, _>("id")?),
        order_number: row.try_get("order_number")?,
        user_id: UserId::new(row.try_get::<Uuid, _>("user_id")?),
        items: from_json(row.try_get("items")?, "items")?,
        subtotal: row.try_get::<Decimal, _>("subtotal")?,
        shipping_cost: row.try_get::<Decimal, _>("shipping_cost")?,
        discount: row.try_get::<Decimal, _>("discount")?,
        tax: row.try_get::<Decimal, _>("tax")?,
        total: row.try_get::<Decimal, _>("total")?,
        coupon_code: row.try_get("coupon_code")?,
        status,
        payment_status,
        payment: from_json(row.try_get("payment")?, "payment")?,
        shipping_address: from_json(row.try_get("shipping_address")?, "shipping_address")?,
        tracking,
        notes: row.try_get("notes")?,
        timeline: from_json(row.try_get("timeline")?, "timeline")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}
