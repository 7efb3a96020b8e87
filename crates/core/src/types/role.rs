//! User roles.

use serde::{Deserialize, Serialize};

/// Role granted to an authenticated user.
///
/// Carried inside issued credentials, but authorization decisions are always
/// made against the role on the live user record, so a demoted admin loses
/// access without waiting for their token to be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular shopper: own cart and orders only.
    #[default]
    User,
    /// Store operator: everything a user can, plus store-wide reads.
    Admin,
}

impl UserRole {
    /// Whether this role is a member of `allowed`.
    #[must_use]
    pub fn is_allowed(self, allowed: &[Self]) -> bool {
        allowed.contains(&self)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_is_the_only_condition() {
        assert!(UserRole::Admin.is_allowed(&[UserRole::Admin]));
        assert!(UserRole::Admin.is_allowed(&[UserRole::User, UserRole::Admin]));
        assert!(!UserRole::User.is_allowed(&[UserRole::Admin]));
        assert!(!UserRole::Admin.is_allowed(&[]));
    }

    #[test]
    fn test_round_trip_str() {
        for role in [UserRole::User, UserRole::Admin] {
            let parsed: UserRole = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        let role: UserRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, UserRole::User);
    }
}
