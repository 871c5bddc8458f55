//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Password sign-in for the single owner account

pub mod auth;

pub use auth::{AdminAuthService, AuthError, hash_password};
