//! Database operations for the Giftly `PostgreSQL` database.
//!
//! # Tables
//!
//! - `products` - Catalog with stock counters (decremented at intake)
//! - `coupons` - Promotional codes read by the coupon evaluator
//! - `orders` - One row per order; items, timeline, address, and payment
//!   bookkeeping are JSONB documents so the embedded-array semantics of the
//!   order record survive intact
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p giftly-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod coupons;
pub mod orders;
pub mod products;

pub use coupons::CouponRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored value could not be decoded into its domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}
