//! Coupon repository.
//!
//! Coupons are written by external catalog tooling; this service only reads
//! them by code.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use sungrove_core::{CouponId, Discount};

use super::RepositoryError;
use crate::models::Coupon;

/// Internal row type for `PostgreSQL` coupon queries.
///
/// `discount_kind` is a text column constrained to `amount`/`percent`.
#[derive(Debug, sqlx::FromRow)]
struct CouponRow {
    id: i32,
    code: String,
    discount_kind: String,
    discount_value: Decimal,
    expires_at: DateTime<Utc>,
}

impl TryFrom<CouponRow> for Coupon {
    type Error = RepositoryError;

    fn try_from(row: CouponRow) -> Result<Self, Self::Error> {
        let discount = match row.discount_kind.as_str() {
            "amount" => Discount::Amount(row.discount_value),
            "percent" => Discount::Percent(row.discount_value),
            other => {
                return Err(RepositoryError::DataCorruption(format!(
                    "invalid discount kind in database: {other}"
                )));
            }
        };

        Ok(Self {
            id: CouponId::new(row.id),
            code: row.code,
            discount,
            expires_at: row.expires_at,
        })
    }
}

/// Repository for coupon database operations.
pub struct CouponRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CouponRepository<'a> {
    /// Create a new coupon repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a coupon by its code (case-sensitive).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored kind is invalid.
    pub async fn get_by_code(&self, code: &str) -> Result<Option<Coupon>, RepositoryError> {
        let row: Option<CouponRow> = sqlx::query_as(
            "SELECT id, code, discount_kind, discount_value, expires_at \
             FROM coupons WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }
}
