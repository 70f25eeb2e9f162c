//! Database operations for storefront `PostgreSQL`.
//!
//! # Database: `dahlia_storefront`
//!
//! ## Tables
//!
//! - `storefront.orders` - Orders, including guest orders (`owner_id` null).
//!   Line items and the shipping address are stored as JSON snapshots on the
//!   row; they are immutable after checkout.
//! - `storefront.sessions` - Tower-sessions storage
//! - `storefront.user` - Accounts, owned by the identity provider; this
//!   service only joins against its `id`
//!
//! # Migrations
//!
//! Migrations are owned by the identity/checkout services and run from their
//! deploy pipeline; this service assumes the schema above exists.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub mod orders;

pub use orders::OrderRepository;

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate claim).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
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
