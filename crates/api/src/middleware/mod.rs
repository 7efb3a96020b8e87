//! Request middleware and extractors.

pub mod auth;

pub use auth::{CurrentUser, RequireAdmin, bearer_token, role_allowed};
