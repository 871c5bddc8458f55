//! Core types for Flavors Express.
//!
//! This module provides type-safe wrappers for the menu domain.

pub mod email;
pub mod id;
pub mod menu_item;
pub mod price;
pub mod variant;

pub use email::{Email, EmailError};
pub use id::*;
pub use menu_item::{MenuItem, non_blank};
pub use price::{Currency, MenuPrice};
pub use variant::Variant;
