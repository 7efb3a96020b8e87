//! Authentication route handlers.
//!
//! Signup, signin, and password change. All three respond with a freshly
//! issued bearer credential; the client replaces whatever it held before.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::User;
use crate::services::AuthService;
use crate::state::AppState;

/// Signup/signin request body.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Password change request body.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Response carrying the user and their bearer credential.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: User,
    pub token: String,
}

/// Response carrying only a fresh bearer credential.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// `POST /auth/signup` - register a new account.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let (user, token) = AuthService::new(state.pool(), state.tokens())
        .register(&req.email, &req.password)
        .await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((StatusCode::CREATED, Json(SessionResponse { user, token })))
}

/// `POST /auth/signin` - login with email and password.
pub async fn signin(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<SessionResponse>> {
    let (user, token) = AuthService::new(state.pool(), state.tokens())
        .login(&req.email, &req.password)
        .await?;

    Ok(Json(SessionResponse { user, token }))
}

/// `POST /auth/change-password` - change the current user's password.
///
/// Invalidates every previously issued credential for this user and returns
/// a fresh one so the caller stays signed in.
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<TokenResponse>> {
    let token = AuthService::new(state.pool(), state.tokens())
        .change_password(&user, &req.current_password, &req.new_password)
        .await?;

    tracing::info!(user_id = %user.id, "password changed");

    Ok(Json(TokenResponse { token }))
}
