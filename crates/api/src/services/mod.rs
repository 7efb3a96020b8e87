//! Business services for the storefront API.
//!
//! Services own the multi-step logic; repositories own the SQL. Handlers
//! construct services per-request over the shared pool, the same way the
//! repositories are constructed.

pub mod auth;
pub mod checkout;
pub mod coupon;
pub mod token;

pub use auth::{AuthError, AuthService};
pub use checkout::{CheckoutError, CheckoutService};
pub use coupon::{CouponError, CouponService};
pub use token::{Claims, TokenService};
