//! Order route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use sungrove_core::CartId;

use crate::db::OrderRepository;
use crate::error::Result;
use crate::middleware::{CurrentUser, RequireAdmin};
use crate::models::{Order, ShippingAddress};
use crate::services::CheckoutService;
use crate::state::AppState;

/// Checkout request body.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub shipping_address: ShippingAddress,
}

/// `POST /orders/{cart_id}` - convert the cart into an order.
pub async fn checkout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(cart_id): Path<CartId>,
    Json(req): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = CheckoutService::new(state.pool())
        .checkout(cart_id, user.id, &req.shipping_address)
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /orders` - the current user's orders, newest first.
pub async fn list_mine(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(Json(orders))
}

/// `GET /orders/all` - every order in the store. Admin only.
pub async fn list_all(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;

    Ok(Json(orders))
}
