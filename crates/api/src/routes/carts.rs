//! Cart route handlers.
//!
//! Every route is scoped to the authenticated user's own cart; there is no
//! way to address another user's cart from here.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use sungrove_core::ProductId;

use crate::db::CartRepository;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::Cart;
use crate::services::CouponService;
use crate::state::AppState;

/// Add-item request body.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Apply-coupon request body.
#[derive(Debug, Deserialize)]
pub struct ApplyCouponRequest {
    pub code: String,
}

/// `GET /carts` - the current user's cart.
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Cart>> {
    let cart = CartRepository::new(state.pool())
        .get_by_user(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("no active cart".to_string()))?;

    Ok(Json(cart))
}

/// `POST /carts/items` - add an item to the current user's cart.
///
/// Creates the cart if the user has none. Adding a product already in the
/// cart increments its quantity.
pub async fn add_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<Cart>> {
    if req.quantity < 1 {
        return Err(AppError::BadRequest(
            "quantity must be at least 1".to_string(),
        ));
    }

    let cart = CartRepository::new(state.pool())
        .add_item(user.id, req.product_id, req.quantity)
        .await?;

    Ok(Json(cart))
}

/// `POST /carts/apply-coupon` - apply a coupon code to the current cart.
pub async fn apply_coupon(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<ApplyCouponRequest>,
) -> Result<Json<Cart>> {
    let cart = CouponService::new(state.pool())
        .apply(user.id, &req.code)
        .await?;

    Ok(Json(cart))
}

/// `DELETE /carts` - clear the current user's cart.
///
/// Idempotent: deleting an absent cart is still a success.
pub async fn clear(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode> {
    CartRepository::new(state.pool())
        .delete_by_user(user.id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
