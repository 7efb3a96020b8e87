//! Sungrove Core - Shared types library.
//!
//! This crate provides the common types used by the Sungrove API:
//! type-safe IDs, validated email addresses, roles, and discount math.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere, including in tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
