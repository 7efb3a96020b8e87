//! Authentication extractors and the role guard.
//!
//! `CurrentUser` runs the full per-request session validation chain:
//! bearer-token extraction, signature verification, live user lookup, and
//! the stale-credential check. `RequireAdmin` layers the role guard on top.
//! The guard itself is the pure predicate [`role_allowed`]; extractors are
//! thin composition over it.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use sungrove_core::UserRole;

use crate::error::AppError;
use crate::models::User;
use crate::services::AuthService;
use crate::state::AppState;

/// Extract the bearer token from an `Authorization` header value.
///
/// Returns `None` for a missing scheme, wrong scheme, or empty token.
#[must_use]
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let token = header_value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

/// Whether `role` is a member of the caller-declared `allowed` set.
///
/// This is the whole access-control decision; nothing else affects it.
#[must_use]
pub fn role_allowed(role: UserRole, allowed: &[UserRole]) -> bool {
    role.is_allowed(allowed)
}

/// Extractor that requires a valid, non-stale credential.
///
/// Rejections collapse to `Unauthorized` regardless of whether the token was
/// missing, malformed, forged, stale, or pointing at a deleted user, so a
/// caller cannot probe which of those it was.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     CurrentUser(user): CurrentUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| AppError::Unauthorized("missing credential".to_string()))?;

        let user = AuthService::new(state.pool(), state.tokens())
            .resolve_session(token)
            .await?;

        Ok(Self(user))
    }
}

/// Extractor that requires a valid credential *and* the admin role.
///
/// # Example
///
/// ```rust,ignore
/// async fn admin_handler(
///     RequireAdmin(admin): RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.email)
/// }
/// ```
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if !role_allowed(user.role, &[UserRole::Admin]) {
            return Err(AppError::Forbidden(
                "insufficient role for this resource".to_string(),
            ));
        }

        Ok(Self(user))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("abc.def.ghi"), None);
        assert_eq!(bearer_token(""), None);
    }

    #[test]
    fn test_role_guard_is_pure_membership() {
        assert!(role_allowed(UserRole::Admin, &[UserRole::Admin]));
        assert!(role_allowed(
            UserRole::User,
            &[UserRole::User, UserRole::Admin]
        ));
        assert!(!role_allowed(UserRole::User, &[UserRole::Admin]));
        assert!(!role_allowed(UserRole::Admin, &[]));
    }
}
