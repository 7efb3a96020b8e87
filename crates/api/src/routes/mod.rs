//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Liveness check
//! GET    /health/ready           - Readiness check (verifies database)
//!
//! # Auth
//! POST   /auth/signup            - Register and receive a credential
//! POST   /auth/signin            - Login and receive a credential
//! POST   /auth/change-password   - Change password (requires auth)
//!
//! # Cart (requires auth)
//! GET    /carts                  - Current user's cart
//! POST   /carts/items            - Add an item to the cart
//! POST   /carts/apply-coupon     - Apply a coupon code to the cart
//! DELETE /carts                  - Clear the cart
//!
//! # Orders (requires auth)
//! POST   /orders/{cart_id}       - Checkout: convert the cart into an order
//! GET    /orders                 - Current user's orders
//! GET    /orders/all             - All orders (admin only)
//! ```

pub mod auth;
pub mod carts;
pub mod orders;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/signin", post(auth::signin))
        .route("/change-password", post(auth::change_password))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(carts::show).delete(carts::clear))
        .route("/items", post(carts::add_item))
        .route("/apply-coupon", post(carts::apply_coupon))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list_mine))
        .route("/all", get(orders::list_all))
        .route("/{cart_id}", post(orders::checkout))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/carts", cart_routes())
        .nest("/orders", order_routes())
}
