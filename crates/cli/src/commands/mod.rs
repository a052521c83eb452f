//! CLI command implementations.

pub mod migrate;
pub mod seed;

use thiserror::Error;

/// Errors shared by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Connect to the database named by `GIFTLY_DATABASE_URL`.
pub async fn connect() -> Result<sqlx::PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("GIFTLY_DATABASE_URL")
        .map_err(|_| CommandError::MissingEnvVar("GIFTLY_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    Ok(sqlx::PgPool::connect(&database_url).await?)
}
