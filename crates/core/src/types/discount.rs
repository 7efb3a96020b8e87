//! Coupon discount math.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A coupon's declared discount.
///
/// Either a flat amount off the cart total or a percentage of it. All math
/// uses [`Decimal`] so totals never pick up float rounding noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Discount {
    /// Flat amount off, in the store currency.
    Amount(Decimal),
    /// Percentage off, 0-100.
    Percent(Decimal),
}

impl Discount {
    /// Apply this discount to `total`, clamping the result at zero.
    ///
    /// Clamping means a coupon worth more than the cart can never produce a
    /// negative total.
    #[must_use]
    pub fn apply_to(self, total: Decimal) -> Decimal {
        let discounted = match self {
            Self::Amount(amount) => total - amount,
            Self::Percent(percent) => total - (total * percent / Decimal::ONE_HUNDRED),
        };

        discounted.max(Decimal::ZERO)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_flat_amount() {
        let discount = Discount::Amount(dec!(10));
        assert_eq!(discount.apply_to(dec!(50)), dec!(40));
    }

    #[test]
    fn test_percentage() {
        let discount = Discount::Percent(dec!(20));
        assert_eq!(discount.apply_to(dec!(50)), dec!(40));
    }

    #[test]
    fn test_clamped_at_zero() {
        let discount = Discount::Amount(dec!(75));
        assert_eq!(discount.apply_to(dec!(50)), Decimal::ZERO);
    }

    #[test]
    fn test_deterministic_and_idempotent_input() {
        // Applying the same discount to the same total always yields the
        // same result; the evaluator relies on this to make repeated coupon
        // application idempotent.
        let discount = Discount::Percent(dec!(15));
        assert_eq!(discount.apply_to(dec!(200)), discount.apply_to(dec!(200)));
    }
}
