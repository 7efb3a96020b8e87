//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sungrove_core::{OrderId, ProductId, UserId};

/// Shipping address supplied at checkout time.
///
/// Snapshotted onto the order; later edits to a user's address book never
/// touch placed orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// A line item snapshotted from the cart at checkout.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Units purchased.
    pub quantity: i32,
    /// Unit price at checkout time.
    pub unit_price: Decimal,
}

/// A placed order.
///
/// Immutable once created except for the delivery/payment flags, which are
/// maintained by fulfillment tooling outside this service.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// User who placed the order.
    pub user_id: UserId,
    /// Snapshot of the cart's line items.
    pub items: Vec<OrderItem>,
    /// Total charged, discounted if a coupon was applied to the cart.
    pub total_price: Decimal,
    /// Where the order ships to.
    pub shipping_address: ShippingAddress,
    /// Whether payment has been recorded.
    pub is_paid: bool,
    /// Whether delivery has been recorded.
    pub is_delivered: bool,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}
