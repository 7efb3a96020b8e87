//! Core types for Sungrove.

pub mod discount;
pub mod email;
pub mod id;
pub mod role;

pub use discount::Discount;
pub use email::{Email, EmailError};
pub use id::*;
pub use role::UserRole;
