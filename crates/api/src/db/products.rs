//! Product inventory adjustments.
//!
//! The catalog is owned by external CRUD tooling; this service touches
//! products in exactly one way: the bulk counter adjustment at checkout.

use sqlx::PgConnection;
use thiserror::Error;

use sungrove_core::ProductId;

use crate::models::cart::CartItem;

/// One product's counter adjustment at checkout: `sold` is incremented and
/// `quantity` decremented by the same amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryAdjustment {
    /// Product to adjust.
    pub product_id: ProductId,
    /// Units sold. Always positive.
    pub quantity: i32,
}

impl InventoryAdjustment {
    /// Build the adjustment list for a cart's line items.
    #[must_use]
    pub fn from_cart_items(items: &[CartItem]) -> Vec<Self> {
        items
            .iter()
            .map(|item| Self {
                product_id: item.product_id,
                quantity: item.quantity,
            })
            .collect()
    }
}

/// Errors from the inventory adjustment.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// A product had fewer units on hand than the cart requested. The
    /// decrement is conditional, so `quantity` can never go negative even
    /// under concurrent checkouts of the same product.
    #[error("insufficient stock for product {0}")]
    Insufficient(ProductId),

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Repository for product inventory operations.
pub struct ProductRepository;

impl ProductRepository {
    /// Apply a batch of inventory adjustments inside an open transaction
    /// (checkout step 4).
    ///
    /// Each UPDATE only matches when enough stock is on hand; a miss means
    /// another checkout won the remaining units, and the whole batch is
    /// abandoned for the caller to roll back.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::Insufficient` on the first under-stocked
    /// product. Returns `InventoryError::Database` if a query fails.
    pub async fn adjust_inventory_in(
        conn: &mut PgConnection,
        adjustments: &[InventoryAdjustment],
    ) -> Result<(), InventoryError> {
        for adjustment in adjustments {
            let result = sqlx::query(
                "UPDATE products SET \
                    quantity = quantity - $2, \
                    sold = sold + $2, \
                    updated_at = now() \
                 WHERE id = $1 AND quantity >= $2",
            )
            .bind(adjustment.product_id)
            .bind(adjustment.quantity)
            .execute(&mut *conn)
            .await?;

            if result.rows_affected() == 0 {
                return Err(InventoryError::Insufficient(adjustment.product_id));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_adjustments_mirror_line_quantities() {
        let items = vec![
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
        ];

        let adjustments = InventoryAdjustment::from_cart_items(&items);
        assert_eq!(
            adjustments,
            vec![
                InventoryAdjustment {
                    product_id: ProductId::new(10),
                    quantity: 3,
                },
                InventoryAdjustment {
                    product_id: ProductId::new(11),
                    quantity: 1,
                },
            ]
        );
    }
}
