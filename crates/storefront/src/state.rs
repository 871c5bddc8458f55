//! Application state shared across handlers.

use std::sync::Arc;

use flavors_core::{CatalogReader, MenuSnapshot};

use crate::config::{RestaurantConfig, StorefrontConfig};
use crate::feed::MenuReceiver;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog, the live menu and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<dyn CatalogReader>,
    menu: MenuReceiver,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Catalog used for item lookups and readiness checks
    /// * `menu` - Live menu feed (see [`crate::feed::start`])
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        catalog: Arc<dyn CatalogReader>,
        menu: MenuReceiver,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                menu,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Restaurant identity, currency and ordering number.
    #[must_use]
    pub fn restaurant(&self) -> &RestaurantConfig {
        &self.inner.config.restaurant
    }

    /// Get a reference to the catalog.
    #[must_use]
    pub fn catalog(&self) -> &dyn CatalogReader {
        self.inner.catalog.as_ref()
    }

    /// Latest published menu snapshot.
    #[must_use]
    pub fn menu(&self) -> Arc<MenuSnapshot> {
        Arc::clone(&self.inner.menu.borrow())
    }
}
