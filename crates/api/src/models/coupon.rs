//! Coupon domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use sungrove_core::{CouponId, Discount};

/// A time-bounded discount code.
///
/// Coupons are managed by external catalog tooling; this service only reads
/// them. A coupon is usable strictly before `expires_at`.
#[derive(Debug, Clone, Serialize)]
pub struct Coupon {
    /// Unique coupon ID.
    pub id: CouponId,
    /// The code shoppers type in. Unique, case-sensitive.
    pub code: String,
    /// Declared discount (flat amount or percentage).
    pub discount: Discount,
    /// Instant the coupon stops being usable.
    pub expires_at: DateTime<Utc>,
}

impl Coupon {
    /// Whether the coupon is expired at `now`.
    ///
    /// Expiry is exclusive: a coupon is usable only strictly before
    /// `expires_at`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
