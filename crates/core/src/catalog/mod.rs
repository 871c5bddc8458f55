//! Catalog store contracts.
//!
//! The catalog owns every [`MenuItem`]. The storefront only reads from it
//! ([`CatalogReader`]); the admin dashboard also writes ([`CatalogWriter`]).
//! Both traits are object safe so applications can hold an
//! `Arc<dyn CatalogReader>` and swap the `PostgreSQL` store for
//! [`MemoryCatalog`] in tests.

mod memory;
#[cfg(feature = "postgres")]
mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::menu::MenuItemDraft;
use crate::types::{MenuItem, MenuItemId};

pub use memory::MemoryCatalog;
#[cfg(feature = "postgres")]
pub use postgres::PgCatalog;

/// Errors that can occur while talking to the catalog store.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Database error from sqlx.
    #[cfg(feature = "postgres")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored data could not be turned into a menu item.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The record does not exist.
    #[error("not found")]
    NotFound,

    /// The store cannot serve requests right now.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Filter applied when listing menu items.
///
/// Results are always ordered by category, then name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuQuery {
    pub available_only: bool,
    pub featured_only: bool,
    pub limit: Option<usize>,
}

impl MenuQuery {
    /// Every item, including hidden ones (admin view).
    #[must_use]
    pub const fn all() -> Self {
        Self {
            available_only: false,
            featured_only: false,
            limit: None,
        }
    }

    /// Items customers may see.
    #[must_use]
    pub const fn public() -> Self {
        Self {
            available_only: true,
            featured_only: false,
            limit: None,
        }
    }

    /// Available, featured items capped at `limit` (home page).
    #[must_use]
    pub const fn featured(limit: usize) -> Self {
        Self {
            available_only: true,
            featured_only: true,
            limit: Some(limit),
        }
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether an item passes the visibility filters.
    #[must_use]
    pub const fn matches(&self, item: &MenuItem) -> bool {
        (!self.available_only || item.is_available) && (!self.featured_only || item.is_featured)
    }
}

/// Read access to the catalog.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// List items matching `query`, ordered by category then name.
    async fn list(&self, query: &MenuQuery) -> Result<Vec<MenuItem>, CatalogError>;

    /// Fetch one item regardless of availability.
    async fn get(&self, id: MenuItemId) -> Result<Option<MenuItem>, CatalogError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), CatalogError>;
}

/// Write access to the catalog.
///
/// Deleting a record never touches its hosted image; callers clean that up
/// separately.
#[async_trait]
pub trait CatalogWriter: CatalogReader {
    /// Insert a new item with a freshly generated ID.
    async fn create(&self, draft: &MenuItemDraft) -> Result<MenuItem, CatalogError>;

    /// Replace every field of an existing item.
    ///
    /// Returns `CatalogError::NotFound` if no item has `id`.
    async fn replace(&self, id: MenuItemId, draft: &MenuItemDraft)
    -> Result<MenuItem, CatalogError>;

    /// Delete an item. Returns whether a record was removed.
    async fn delete(&self, id: MenuItemId) -> Result<bool, CatalogError>;
}

/// Point-in-time public view of the menu.
///
/// Each refresh replaces the previous snapshot wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuSnapshot {
    items: Vec<MenuItem>,
    categories: Vec<String>,
}

impl MenuSnapshot {
    /// Label of the tab that shows every category.
    pub const ALL: &'static str = "All";

    /// Build a snapshot, dropping unavailable items.
    ///
    /// Categories are `"All"` followed by each distinct category in
    /// first-seen order, or empty when nothing is available.
    #[must_use]
    pub fn from_items(items: Vec<MenuItem>) -> Self {
        let items: Vec<MenuItem> = items.into_iter().filter(|i| i.is_available).collect();

        let mut categories = Vec::new();
        if !items.is_empty() {
            categories.push(Self::ALL.to_string());
            for item in &items {
                if !categories.contains(&item.category) {
                    categories.push(item.category.clone());
                }
            }
        }

        Self { items, categories }
    }

    #[must_use]
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items shown under a category tab. `"All"` shows everything.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a MenuItem> {
        self.items
            .iter()
            .filter(move |item| category == Self::ALL || item.category == category)
    }

    /// Look up an item that is currently on the public menu.
    #[must_use]
    pub fn find(&self, id: MenuItemId) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }
}
