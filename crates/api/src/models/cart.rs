//! Cart domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use sungrove_core::{CartId, ProductId, UserId};

/// A line item in a cart.
#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Units of the product in the cart. Always positive.
    pub quantity: i32,
    /// Unit price captured when the item was added.
    pub unit_price: Decimal,
}

impl CartItem {
    /// Price of this line (`quantity * unit_price`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// A user's active cart.
///
/// At most one active cart exists per user (enforced by a unique index on
/// `carts.user_id`). `total_after_discount` is set only by coupon
/// application and cleared whenever the cart is mutated.
#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    /// Unique cart ID.
    pub id: CartId,
    /// Owner of the cart.
    pub user_id: UserId,
    /// Line items, ordered by insertion.
    pub items: Vec<CartItem>,
    /// Sum of all line totals.
    pub total_price: Decimal,
    /// Coupon-adjusted total, if a coupon was applied since the last
    /// cart mutation.
    pub total_after_discount: Option<Decimal>,
    /// When the cart was created.
    pub created_at: DateTime<Utc>,
    /// When the cart was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// The total a checkout of this cart charges: the discounted total when
    /// a coupon was applied, otherwise the plain total.
    #[must_use]
    pub fn checkout_total(&self) -> Decimal {
        self.total_after_discount.unwrap_or(self.total_price)
    }

    /// Recompute the plain total from the line items.
    #[must_use]
    pub fn computed_total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn two_item_cart() -> Cart {
        Cart {
            id: CartId::new(1),
            user_id: UserId::new(1),
            items: vec![
                CartItem {
                    product_id: ProductId::new(10),
                    quantity: 3,
                    unit_price: dec!(10),
                },
                CartItem {
                    product_id: ProductId::new(11),
                    quantity: 1,
                    unit_price: dec!(20),
                },
            ],
            total_price: dec!(50),
            total_after_discount: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_line_totals_aggregate() {
        let cart = two_item_cart();
        assert_eq!(cart.computed_total(), dec!(50));
    }

    #[test]
    fn test_checkout_total_prefers_discounted() {
        let mut cart = two_item_cart();
        assert_eq!(cart.checkout_total(), dec!(50));

        cart.total_after_discount = Some(dec!(40));
        assert_eq!(cart.checkout_total(), dec!(40));
    }
}
