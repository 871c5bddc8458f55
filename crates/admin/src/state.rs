//! Application state shared across handlers.

use std::sync::Arc;

use flavors_core::CatalogWriter;

use crate::config::AdminConfig;
use crate::images::ImageStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    catalog: Arc<dyn CatalogWriter>,
    images: Arc<dyn ImageStore>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: AdminConfig,
        catalog: Arc<dyn CatalogWriter>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                images,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Read/write access to the menu catalog.
    #[must_use]
    pub fn catalog(&self) -> &dyn CatalogWriter {
        self.inner.catalog.as_ref()
    }

    #[must_use]
    pub fn images(&self) -> &dyn ImageStore {
        self.inner.images.as_ref()
    }
}
