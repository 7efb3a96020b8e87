//! Database-backed authentication tests.
//!
//! `#[sqlx::test]` provisions an isolated database per test (requires
//! `DATABASE_URL` pointing at a running `PostgreSQL`) and applies the
//! migrations in `crates/api/migrations/` before each one.

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;
use sqlx::PgPool;

use sungrove_api::services::{AuthError, AuthService, TokenService};

fn test_tokens() -> TokenService {
    TokenService::new(&SecretString::from(
        "kR9mP2xQ7wN4vB8jL5tY1hG6fD3sZ0cA-Ue".to_string(),
    ))
}

#[sqlx::test]
async fn change_password_returns_an_immediately_usable_token(pool: PgPool) {
    let tokens = test_tokens();
    let auth = AuthService::new(&pool, &tokens);

    let (user, _) = auth
        .register("shopper@example.com", "first password")
        .await
        .unwrap();

    // The fresh token must survive the staleness check stamped by the very
    // change that produced it, regardless of database clock skew.
    let fresh = auth
        .change_password(&user, "first password", "second password")
        .await
        .unwrap();

    let resolved = auth.resolve_session(&fresh).await.unwrap();
    assert_eq!(resolved.id, user.id);

    let (_, relogin) = auth
        .login("shopper@example.com", "second password")
        .await
        .unwrap();
    assert!(auth.resolve_session(&relogin).await.is_ok());
}

#[sqlx::test]
async fn tokens_issued_before_a_password_change_go_stale(pool: PgPool) {
    let tokens = test_tokens();
    let auth = AuthService::new(&pool, &tokens);

    let (user, old_token) = auth
        .register("shopper@example.com", "first password")
        .await
        .unwrap();
    assert!(auth.resolve_session(&old_token).await.is_ok());

    // Force the change stamp past the old token's issuance second; a real
    // change in the same second as issuance deliberately leaves it valid.
    sqlx::query("UPDATE users SET password_changed_at = now() + interval '1 hour' WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let err = auth.resolve_session(&old_token).await.unwrap_err();
    assert!(matches!(err, AuthError::StaleToken));
}
