//! Flavors Express Core - Shared domain library.
//!
//! This crate provides the menu domain used across all Flavors Express components:
//! - `storefront` - Public-facing menu, cart and WhatsApp checkout
//! - `admin` - Menu management dashboard
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate holds types, the cart engine and the checkout composer, none
//! of which perform I/O. Persistence is reached through traits: [`cart::CartStorage`]
//! for the per-client cart slot and [`catalog::CatalogReader`] /
//! [`catalog::CatalogWriter`] for the menu catalog. The `PostgreSQL` catalog
//! lives behind the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, variants, menu items and emails
//! - [`cart`] - Cart engine with half/full pricing
//! - [`checkout`] - Order summary and WhatsApp handoff
//! - [`menu`] - Validation of admin-submitted menu items
//! - [`catalog`] - Catalog store traits and implementations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod menu;
pub mod types;

pub use cart::{Cart, CartLine, CartNotice, CartStorage, MemoryStorage, StorageError};
pub use catalog::{
    CatalogError, CatalogReader, CatalogWriter, MemoryCatalog, MenuQuery, MenuSnapshot,
};
pub use checkout::{CheckoutError, Handoff, OrderDestination};
pub use menu::{Field, MenuItemDraft, MenuItemInput, ValidationErrors};
pub use types::*;
