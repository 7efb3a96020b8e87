//! Stateless credential issuance and verification.
//!
//! Credentials are HS256-signed tokens carrying `{sub, role, iat}` and
//! nothing else. They are never persisted server-side and carry no expiry:
//! the only revocation mechanism is the issued-before-password-change check
//! performed against the live user record on every request.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use sungrove_core::{UserId, UserRole};

/// Claims embedded in every issued credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: String,
    /// Role at issuance time. Informational only; authorization always uses
    /// the role on the live user record.
    pub role: UserRole,
    /// Issued-at (unix timestamp, seconds).
    pub iat: i64,
}

impl Claims {
    /// Parse the subject back into a [`UserId`].
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse::<i32>().ok().map(UserId::new)
    }
}

/// Issues and verifies signed credentials.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    /// Create a new `TokenService` signing with the given secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let secret = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a credential binding `user_id` and `role` at the current
    /// instant.
    ///
    /// Issuance is unconditional given an authenticated identity.
    ///
    /// # Errors
    ///
    /// Returns a `jsonwebtoken` error only if signing itself fails.
    pub fn issue(
        &self,
        user_id: UserId,
        role: UserRole,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            iat: Utc::now().timestamp(),
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Verify a credential's signature and decode its claims.
    ///
    /// # Errors
    ///
    /// Returns a `jsonwebtoken` error if the signature is invalid or the
    /// token is malformed.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        // No expiry claim exists; staleness is checked against the user
        // record, not the clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}

/// Whether a credential issued at `issued_at` (unix seconds) predates the
/// user's last password change.
///
/// The change timestamp is truncated to whole seconds before the comparison,
/// so a token issued in the same second as the change is still accepted;
/// anything issued strictly earlier is stale.
#[must_use]
pub fn issued_before_password_change(
    issued_at: i64,
    password_changed_at: Option<DateTime<Utc>>,
) -> bool {
    password_changed_at.is_some_and(|changed_at| changed_at.timestamp() > issued_at)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_tokens() -> TokenService {
        TokenService::new(&SecretString::from(
            "kR9mP2xQ7wN4vB8jL5tY1hG6fD3sZ0cA-Ue".to_string(),
        ))
    }

    #[test]
    fn issue_and_verify() {
        let tokens = test_tokens();
        let token = tokens.issue(UserId::new(7), UserRole::Admin).unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.user_id(), Some(UserId::new(7)));
        assert_eq!(claims.role, UserRole::Admin);
        assert!(claims.iat <= Utc::now().timestamp());
    }

    #[test]
    fn garbage_token_fails_verification() {
        let tokens = test_tokens();
        assert!(tokens.verify("not-a-valid-token").is_err());
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let tokens = test_tokens();
        let other = TokenService::new(&SecretString::from(
            "qA3zX8vC1bN6mK9dF4gH7jL2sP5wE0rT-Yu".to_string(),
        ));

        let token = tokens.issue(UserId::new(1), UserRole::User).unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn tokens_without_expiry_still_verify() {
        // Validation must not demand an `exp` claim the issuer never sets.
        let tokens = test_tokens();
        let token = tokens.issue(UserId::new(1), UserRole::User).unwrap();
        assert!(tokens.verify(&token).is_ok());
    }

    #[test]
    fn token_issued_before_change_is_stale() {
        let issued_at = 1_700_000_000;
        let changed_at = Utc.timestamp_opt(issued_at + 5, 0).single();

        assert!(issued_before_password_change(issued_at, changed_at));
    }

    #[test]
    fn token_issued_same_second_as_change_is_not_stale() {
        // Sub-second precision on the change timestamp is truncated, so a
        // token minted in the same second survives.
        let issued_at = 1_700_000_000;
        let changed_at = Utc.timestamp_opt(issued_at, 500_000_000).single();

        assert!(!issued_before_password_change(issued_at, changed_at));
    }

    #[test]
    fn token_issued_after_change_is_not_stale() {
        let issued_at = 1_700_000_000;
        let changed_at = Utc.timestamp_opt(issued_at - 30, 0).single();

        assert!(!issued_before_password_change(issued_at, changed_at));
    }

    #[test]
    fn never_changed_password_is_never_stale() {
        assert!(!issued_before_password_change(0, None));
    }

    #[test]
    fn token_minted_after_change_on_the_same_clock_is_never_stale() {
        // A password change stamps `password_changed_at` from the app clock
        // and only then issues the replacement token, so the token's iat can
        // never predate the stamp. Truncation keeps that ordering even when
        // both fall inside the same second.
        let changed_at = Utc::now();
        let iat = Utc::now().timestamp();

        assert!(!issued_before_password_change(iat, Some(changed_at)));
    }
}
