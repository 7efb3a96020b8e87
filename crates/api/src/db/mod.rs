//! Database operations for the storefront `PostgreSQL`.
//!
//! # Database: `sungrove`
//!
//! ## Tables
//!
//! - `users` - Accounts, password hashes, roles, password-change timestamps
//! - `products` - Catalog rows; this service only reads `price` and adjusts
//!   the `quantity`/`sold` counters at checkout
//! - `carts` / `cart_items` - One active cart per user
//! - `coupons` - Discount codes (written by external catalog tooling)
//! - `orders` / `order_items` - Placed orders
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run explicitly via
//! `sqlx migrate run`; they are never applied on startup.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod carts;
pub mod coupons;
pub mod orders;
pub mod products;
pub mod users;

pub use carts::CartRepository;
pub use coupons::CouponRepository;
pub use orders::OrderRepository;
pub use products::{InventoryAdjustment, InventoryError, ProductRepository};
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
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

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

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
