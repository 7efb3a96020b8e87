//! Cart repository for database operations.
//!
//! Carts hold the only mutable pre-checkout state in the system. A user has
//! at most one active cart (unique index on `carts.user_id`); the cart is
//! created implicitly on the first item add and deleted at checkout.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use sungrove_core::{CartId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Cart, CartItem};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` cart queries.
#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: i32,
    user_id: i32,
    total_price: Decimal,
    total_after_discount: Option<Decimal>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Internal row type for cart line items.
#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    product_id: i32,
    quantity: i32,
    unit_price: Decimal,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        Self {
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user's active cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let row: Option<CartRow> = sqlx::query_as(
            "SELECT id, user_id, total_price, total_after_discount, created_at, updated_at \
             FROM carts WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.with_items(row).await?)),
            None => Ok(None),
        }
    }

    /// Get a cart by id, scoped to its owner.
    ///
    /// Returns `None` both when the cart does not exist and when it belongs
    /// to a different user, so callers cannot distinguish the two.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_user(
        &self,
        cart_id: CartId,
        user_id: UserId,
    ) -> Result<Option<Cart>, RepositoryError> {
        let row: Option<CartRow> = sqlx::query_as(
            "SELECT id, user_id, total_price, total_after_discount, created_at, updated_at \
             FROM carts WHERE id = $1 AND user_id = $2",
        )
        .bind(cart_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.with_items(row).await?)),
            None => Ok(None),
        }
    }

    /// Add `quantity` units of a product to the user's cart, creating the
    /// cart if it does not exist yet.
    ///
    /// Recomputes `total_price` and clears any previously applied discount:
    /// a mutated cart must be re-couponed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Cart, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let unit_price: Option<(Decimal,)> =
            sqlx::query_as("SELECT price FROM products WHERE id = $1")
                .bind(product_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((unit_price,)) = unit_price else {
            return Err(RepositoryError::NotFound);
        };

        let (cart_id,): (i32,) = sqlx::query_as(
            "INSERT INTO carts (user_id) VALUES ($1) \
             ON CONFLICT (user_id) DO UPDATE SET updated_at = now() \
             RETURNING id",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO cart_items (cart_id, product_id, quantity, unit_price) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (cart_id, product_id) \
             DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE carts SET \
                total_price = ( \
                    SELECT COALESCE(SUM(quantity * unit_price), 0) \
                    FROM cart_items WHERE cart_id = $1 \
                ), \
                total_after_discount = NULL, \
                updated_at = now() \
             WHERE id = $1",
        )
        .bind(cart_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_by_user(user_id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Persist the coupon-adjusted total onto the cart.
    ///
    /// Last writer wins; concurrent coupon applications by the same user
    /// race benignly on this single field.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cart no longer exists.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_discounted_total(
        &self,
        cart_id: CartId,
        total_after_discount: Decimal,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE carts SET total_after_discount = $2, updated_at = now() WHERE id = $1",
        )
        .bind(cart_id)
        .bind(total_after_discount)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a user's active cart.
    ///
    /// # Returns
    ///
    /// Returns `true` if a cart was deleted, `false` if none existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_by_user(&self, user_id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM carts WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a cart by id inside an open transaction (checkout step 5).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_in(
        conn: &mut PgConnection,
        cart_id: CartId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM carts WHERE id = $1")
            .bind(cart_id)
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Load line items for a cart row and assemble the domain type.
    async fn with_items(&self, row: CartRow) -> Result<Cart, RepositoryError> {
        let items: Vec<CartItemRow> = sqlx::query_as(
            "SELECT product_id, quantity, unit_price \
             FROM cart_items WHERE cart_id = $1 ORDER BY id",
        )
        .bind(row.id)
        .fetch_all(self.pool)
        .await?;

        Ok(Cart {
            id: CartId::new(row.id),
            user_id: UserId::new(row.user_id),
            items: items.into_iter().map(Into::into).collect(),
            total_price: row.total_price,
            total_after_discount: row.total_after_discount,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
