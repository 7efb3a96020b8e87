//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use sungrove_core::{Email, UserId, UserRole};

/// A storefront user (domain type).
///
/// The password hash never leaves the `db` layer; this type is safe to
/// attach to request context and serialize into responses.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Role granted to this user.
    pub role: UserRole,
    /// When the user last changed their password, if ever.
    ///
    /// Credentials issued before this instant (truncated to whole seconds)
    /// are stale and must be rejected.
    #[serde(skip)]
    pub password_changed_at: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
