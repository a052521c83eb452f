//! Product repository: resolution and stock decrement for order intake.

use rust_decimal::Decimal;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use giftly_core::ProductId;

use super::RepositoryError;
use crate::models::Product;

/// Repository for product reads and the intake stock decrement.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an active product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, name, slug, price, image, stock, track_inventory, active
            FROM products
            WHERE id = $1 AND active
            ",
        )
        .bind(id.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        row.map(map_product_row).transpose()
    }

    /// Get an active product by its URL slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT id, name, slug, price, image, stock, track_inventory, active
            FROM products
            WHERE slug = $1 AND active
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        row.map(map_product_row).transpose()
    }

    /// Atomically decrement stock for one line item.
    ///
    /// The decrement only applies when inventory is tracked and sufficient;
    /// untracked products match unconditionally and keep their counter.
    /// Returns `false` when the guard failed (insufficient stock), in which
    /// case nothing was written.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn decrement_stock(
        executor: impl sqlx::PgExecutor<'_>,
        id: ProductId,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE products
            SET stock = CASE WHEN track_inventory THEN stock - $2 ELSE stock END,
                updated_at = now()
            WHERE id = $1 AND (NOT track_inventory OR stock >= $2)
            ",
        )
        .bind(id.as_uuid())
        .bind(quantity)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_product_row(row: PgRow) -> Result<Product, RepositoryError> {
    Ok(Product {
        id: ProductId::new(row.try_get::<Uuid, _>("id")?),
        name: row.try_get("name")?,
        slug: row.try_get("slug")?,
        price: row.try_get::<Decimal, _>("price")?,
        image: row.try_get("image")?,
        stock: row.try_get("stock")?,
        track_inventory: row.try_get("track_inventory")?,
        active: row.try_get("active")?,
    })
}
