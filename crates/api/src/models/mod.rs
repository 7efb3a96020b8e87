//! Domain models for the storefront API.
//!
//! These types represent validated domain objects separate from database
//! row types (see the `db` module for the row-type conversions).

pub mod cart;
pub mod coupon;
pub mod order;
pub mod user;

pub use cart::{Cart, CartItem};
pub use coupon::Coupon;
pub use order::{Order, OrderItem, ShippingAddress};
pub use user::User;
