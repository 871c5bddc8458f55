//! Session-backed models for the storefront.

pub mod session;

pub use session::{SessionCart, keys as session_keys};
