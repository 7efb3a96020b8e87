//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AuthError, CheckoutError, CouponError};

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Coupon evaluation failed.
    #[error("Coupon error: {0}")]
    Coupon(#[from] CouponError),

    /// Checkout failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User is authenticated but lacks the required role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials
                | AuthError::UserNotFound
                | AuthError::InvalidToken
                | AuthError::StaleToken => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::WeakPassword(_) | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash | AuthError::TokenSigning => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Coupon(err) => match err {
                CouponError::CartNotFound | CouponError::CouponNotFound => StatusCode::NOT_FOUND,
                CouponError::Expired => StatusCode::GONE,
                CouponError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Checkout(err) => match err {
                CheckoutError::CartNotFound => StatusCode::NOT_FOUND,
                CheckoutError::OutOfStock(_) => StatusCode::CONFLICT,
                CheckoutError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing message. Internal details are never exposed.
    fn message(&self) -> String {
        match self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Auth(err) => match err {
                // All credential rejections read the same to the client.
                AuthError::InvalidCredentials
                | AuthError::UserNotFound
                | AuthError::InvalidToken
                | AuthError::StaleToken => "Invalid credentials".to_string(),
                AuthError::UserAlreadyExists => {
                    "An account with this email already exists".to_string()
                }
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::Repository(_) | AuthError::PasswordHash | AuthError::TokenSigning => {
                    "Internal server error".to_string()
                }
            },
            Self::Coupon(err) => match err {
                CouponError::CartNotFound => "No active cart".to_string(),
                CouponError::CouponNotFound => "Coupon not found".to_string(),
                CouponError::Expired => "Coupon has expired".to_string(),
                CouponError::Repository(_) => "Internal server error".to_string(),
            },
            Self::Checkout(err) => match err {
                CheckoutError::CartNotFound => "Cart not found".to_string(),
                CheckoutError::OutOfStock(product_id) => {
                    format!("Insufficient stock for product {product_id}")
                }
                CheckoutError::Repository(_) => "Internal server error".to_string(),
            },
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorBody {
            error: self.message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use sungrove_core::ProductId;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("cart-123".to_string());
        assert_eq!(err.to_string(), "Not found: cart-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("test".to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Unauthorized("test".to_string()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden("test".to_string()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::BadRequest("test".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("test".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_rejections_are_unauthorized() {
        for err in [
            AuthError::InvalidCredentials,
            AuthError::UserNotFound,
            AuthError::InvalidToken,
            AuthError::StaleToken,
        ] {
            let app_err = AppError::Auth(err);
            assert_eq!(app_err.status(), StatusCode::UNAUTHORIZED);
            // Rejections must be indistinguishable to the client.
            assert_eq!(app_err.message(), "Invalid credentials");
        }
    }

    #[test]
    fn test_duplicate_signup_conflicts() {
        assert_eq!(
            AppError::Auth(AuthError::UserAlreadyExists).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_coupon_status_codes() {
        assert_eq!(
            AppError::Coupon(CouponError::Expired).status(),
            StatusCode::GONE
        );
        assert_eq!(
            AppError::Coupon(CouponError::CouponNotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Coupon(CouponError::CartNotFound).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_checkout_status_codes() {
        assert_eq!(
            AppError::Checkout(CheckoutError::CartNotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Checkout(CheckoutError::OutOfStock(ProductId::new(7))).status(),
            StatusCode::CONFLICT
        );
    }
}
