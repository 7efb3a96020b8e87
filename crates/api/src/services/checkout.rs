//! Checkout orchestration.
//!
//! Converts a cart into an order. The transition runs in a fixed order -
//! create the order, adjust inventory, retire the cart - and the three
//! mutations execute inside a single database transaction, so a failure at
//! any step leaves the cart intact and the checkout retryable.

use sqlx::PgPool;
use thiserror::Error;

use sungrove_core::{CartId, ProductId, UserId};

use crate::db::{
    CartRepository, InventoryAdjustment, InventoryError, OrderRepository, ProductRepository,
    RepositoryError,
};
use crate::models::{Cart, Order, OrderItem, ShippingAddress};

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart does not exist or belongs to a different user. The two are
    /// deliberately indistinguishable.
    #[error("cart not found")]
    CartNotFound,

    /// A line item asked for more units than the product has on hand.
    #[error("insufficient stock for product {0}")]
    OutOfStock(ProductId),

    /// Repository/database error. Retryable: the transaction rolled back
    /// and no partial state was committed.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<InventoryError> for CheckoutError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::Insufficient(product_id) => Self::OutOfStock(product_id),
            InventoryError::Database(e) => Self::Repository(RepositoryError::Database(e)),
        }
    }
}

impl From<sqlx::Error> for CheckoutError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}

/// Checkout orchestration service.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Convert the cart into an order.
    ///
    /// 1. Load the cart scoped to its owner.
    /// 2. Select the total: the coupon-adjusted total when present, else the
    ///    plain total. No coupon re-validation happens here; a coupon applied
    ///    just before expiry stays honored.
    /// 3. Create the order snapshotting the cart's line items.
    /// 4. For every line item, increment the product's `sold` and decrement
    ///    its `quantity` by the line quantity. Decrements are conditional on
    ///    sufficient stock.
    /// 5. Delete the cart.
    ///
    /// Steps 3-5 run inside one transaction. On any failure the transaction
    /// rolls back, the failed step is logged with the cart and user ids for
    /// reconciliation, and the caller may retry.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::CartNotFound` for a missing or foreign cart
    /// (no mutations performed), `CheckoutError::OutOfStock` when a product
    /// has too few units, and `CheckoutError::Repository` on database
    /// failures.
    pub async fn checkout(
        &self,
        cart_id: CartId,
        user_id: UserId,
        shipping_address: &ShippingAddress,
    ) -> Result<Order, CheckoutError> {
        let cart = CartRepository::new(self.pool)
            .get_for_user(cart_id, user_id)
            .await?
            .ok_or(CheckoutError::CartNotFound)?;

        let total_price = cart.checkout_total();
        let items = order_items_from(&cart);
        let adjustments = InventoryAdjustment::from_cart_items(&cart.items);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| step_failed(cart_id, user_id, "begin", e))?;

        let order = OrderRepository::create_in(
            &mut tx,
            user_id,
            &items,
            total_price,
            shipping_address,
        )
        .await
        .map_err(|e| step_failed(cart_id, user_id, "create_order", e))?;

        ProductRepository::adjust_inventory_in(&mut tx, &adjustments)
            .await
            .map_err(|e| step_failed(cart_id, user_id, "adjust_inventory", e))?;

        CartRepository::delete_in(&mut tx, cart.id)
            .await
            .map_err(|e| step_failed(cart_id, user_id, "retire_cart", e))?;

        tx.commit()
            .await
            .map_err(|e| step_failed(cart_id, user_id, "commit", e))?;

        tracing::info!(
            order_id = %order.id,
            cart_id = %cart_id,
            user_id = %user_id,
            total = %total_price,
            "checkout committed"
        );

        Ok(order)
    }

}

/// Log a failed checkout step with enough context for reconciliation.
fn step_failed<E>(cart_id: CartId, user_id: UserId, step: &'static str, err: E) -> CheckoutError
where
    E: Into<CheckoutError>,
{
    let err = err.into();
    tracing::error!(
        cart_id = %cart_id,
        user_id = %user_id,
        step = step,
        error = %err,
        "checkout step failed, transaction rolled back"
    );
    err
}

/// Snapshot a cart's line items for the order.
fn order_items_from(cart: &Cart) -> Vec<OrderItem> {
    cart.items
        .iter()
        .map(|item| OrderItem {
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::dec;
    use sungrove_core::Discount;

    fn fifty_dollar_cart() -> Cart {
        Cart {
            id: CartId::new(1),
            user_id: UserId::new(1),
            items: vec![
                crate::models::CartItem {
                    product_id: ProductId::new(10),
                    quantity: 3,
                    unit_price: dec!(10),
                },
                crate::models::CartItem {
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
    fn test_order_snapshot_mirrors_cart_lines() {
        let cart = fifty_dollar_cart();
        let items = order_items_from(&cart);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_id, ProductId::new(10));
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[0].unit_price, dec!(10));
        assert_eq!(items[1].product_id, ProductId::new(11));
        assert_eq!(items[1].quantity, 1);
    }

    #[test]
    fn test_discounted_cart_charges_discounted_total() {
        // The SAVE10 scenario: $50 cart, $10 off, order charges $40 and
        // the inventory deltas mirror the line quantities.
        let mut cart = fifty_dollar_cart();
        cart.total_after_discount = Some(Discount::Amount(dec!(10)).apply_to(cart.total_price));

        assert_eq!(cart.checkout_total(), dec!(40));

        let adjustments = InventoryAdjustment::from_cart_items(&cart.items);
        assert_eq!(adjustments[0].quantity, 3);
        assert_eq!(adjustments[1].quantity, 1);
    }

    #[test]
    fn test_undiscounted_cart_charges_plain_total() {
        // The EXPIRED2023 scenario: the evaluator refused the coupon, so
        // no discounted total was ever set and checkout charges $50.
        let cart = fifty_dollar_cart();
        assert!(cart.total_after_discount.is_none());
        assert_eq!(cart.checkout_total(), dec!(50));
    }
}
