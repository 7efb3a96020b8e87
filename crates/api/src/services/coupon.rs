//! Coupon evaluation.
//!
//! Validates a coupon code against its expiry and persists the discounted
//! total onto the caller's cart. The persisted value is the authoritative
//! checkout total until the cart is next mutated; checkout itself never
//! re-validates the coupon.

use chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;

use sungrove_core::UserId;

use crate::db::{CartRepository, CouponRepository, RepositoryError};
use crate::models::Cart;

/// Errors that can occur while applying a coupon.
#[derive(Debug, Error)]
pub enum CouponError {
    /// The caller has no active cart.
    #[error("no active cart")]
    CartNotFound,

    /// No coupon exists with the supplied code.
    #[error("coupon not found")]
    CouponNotFound,

    /// The coupon's expiry is in the past.
    #[error("coupon expired")]
    Expired,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Coupon evaluation service.
pub struct CouponService<'a> {
    carts: CartRepository<'a>,
    coupons: CouponRepository<'a>,
}

impl<'a> CouponService<'a> {
    /// Create a new coupon service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
            coupons: CouponRepository::new(pool),
        }
    }

    /// Apply the coupon `code` to the user's active cart.
    ///
    /// On success the cart's `total_after_discount` is persisted and the
    /// updated cart returned. An expired coupon leaves the cart untouched.
    /// Re-applying the same coupon is idempotent: the discount is always
    /// computed from the undiscounted total.
    ///
    /// # Errors
    ///
    /// Returns `CouponError::CouponNotFound` for an unknown code,
    /// `CouponError::Expired` for a coupon past its expiry, and
    /// `CouponError::CartNotFound` if the user has no active cart.
    pub async fn apply(&self, user_id: UserId, code: &str) -> Result<Cart, CouponError> {
        let coupon = self
            .coupons
            .get_by_code(code)
            .await?
            .ok_or(CouponError::CouponNotFound)?;

        if coupon.is_expired_at(Utc::now()) {
            return Err(CouponError::Expired);
        }

        let mut cart = self
            .carts
            .get_by_user(user_id)
            .await?
            .ok_or(CouponError::CartNotFound)?;

        let discounted = coupon.discount.apply_to(cart.total_price);
        self.carts.set_discounted_total(cart.id, discounted).await?;
        cart.total_after_discount = Some(discounted);

        tracing::info!(
            cart_id = %cart.id,
            user_id = %user_id,
            coupon = %coupon.code,
            total = %cart.total_price,
            discounted = %discounted,
            "coupon applied"
        );

        Ok(cart)
    }
}
