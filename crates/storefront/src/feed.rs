//! Live menu feed.
//!
//! A background task polls the catalog and publishes a fresh
//! [`MenuSnapshot`] through a `watch` channel. Handlers read the latest
//! snapshot without touching the database. A failed poll keeps the previous
//! snapshot in place.

use std::sync::Arc;
use std::time::Duration;

use flavors_core::{CatalogError, CatalogReader, MenuQuery, MenuSnapshot};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Receiving side of the feed, held in application state.
pub type MenuReceiver = watch::Receiver<Arc<MenuSnapshot>>;

/// Poll the catalog once and publish the result.
///
/// # Errors
///
/// Returns the catalog error; the published snapshot is left unchanged.
#[instrument(skip_all)]
pub async fn refresh(
    catalog: &dyn CatalogReader,
    tx: &watch::Sender<Arc<MenuSnapshot>>,
) -> Result<(), CatalogError> {
    let items = catalog.list(&MenuQuery::public()).await?;
    let snapshot = MenuSnapshot::from_items(items);
    debug!(items = snapshot.items().len(), "menu snapshot refreshed");

    tx.send_if_modified(|current| {
        if **current == snapshot {
            false
        } else {
            *current = Arc::new(snapshot);
            true
        }
    });
    Ok(())
}

/// Load the first snapshot, then keep it fresh every `every`.
///
/// The first refresh completes before this returns so the server never
/// starts with a stale view. If it fails the feed starts empty and the
/// polling task keeps trying.
pub async fn start(
    catalog: Arc<dyn CatalogReader>,
    every: Duration,
) -> (MenuReceiver, JoinHandle<()>) {
    let (tx, rx) = watch::channel(Arc::new(MenuSnapshot::default()));

    if let Err(e) = refresh(catalog.as_ref(), &tx).await {
        warn!(error = %e, "initial menu load failed, starting with an empty menu");
    }
    info!(
        items = rx.borrow().items().len(),
        interval_secs = every.as_secs(),
        "menu feed started"
    );

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick fires immediately; the initial refresh already ran.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if tx.is_closed() {
                debug!("menu feed has no subscribers, stopping");
                break;
            }
            if let Err(e) = refresh(catalog.as_ref(), &tx).await {
                warn!(error = %e, "menu refresh failed, keeping last snapshot");
            }
        }
    });

    (rx, handle)
}

/// A feed that never changes, for tests and previews.
#[must_use]
pub fn fixed(snapshot: MenuSnapshot) -> MenuReceiver {
    let (_tx, rx) = watch::channel(Arc::new(snapshot));
    rx
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use flavors_core::{MemoryCatalog, MenuItem, MenuItemId, MenuPrice};
    use rust_decimal::Decimal;

    use super::*;

    fn dish(name: &str, available: bool) -> MenuItem {
        MenuItem {
            id: MenuItemId::generate(),
            name: name.to_string(),
            description: "Fresh from the tandoor.".to_string(),
            category: "Mains".to_string(),
            price: MenuPrice::full_only(Decimal::new(200, 0)),
            has_half_quantity: false,
            is_available: available,
            is_featured: false,
            image_url: None,
        }
    }

    /// Catalog that fails every call once tripped.
    struct FlakyCatalog {
        inner: MemoryCatalog,
        broken: AtomicBool,
    }

    impl FlakyCatalog {
        fn check(&self) -> Result<(), CatalogError> {
            if self.broken.load(Ordering::SeqCst) {
                Err(CatalogError::Unavailable("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl CatalogReader for FlakyCatalog {
        async fn list(&self, query: &MenuQuery) -> Result<Vec<MenuItem>, CatalogError> {
            self.check()?;
            self.inner.list(query).await
        }

        async fn get(&self, id: MenuItemId) -> Result<Option<MenuItem>, CatalogError> {
            self.check()?;
            self.inner.get(id).await
        }

        async fn ping(&self) -> Result<(), CatalogError> {
            self.check()
        }
    }

    #[tokio::test]
    async fn test_refresh_publishes_available_items() {
        let catalog =
            MemoryCatalog::with_items(vec![dish("Biryani", true), dish("Off Menu", false)]);
        let (tx, rx) = watch::channel(Arc::new(MenuSnapshot::default()));

        refresh(&catalog, &tx).await.unwrap();

        let snapshot = rx.borrow().clone();
        assert_eq!(snapshot.items().len(), 1);
        assert_eq!(snapshot.categories(), ["All", "Mains"]);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_last_snapshot() {
        let catalog = FlakyCatalog {
            inner: MemoryCatalog::with_items(vec![dish("Biryani", true)]),
            broken: AtomicBool::new(false),
        };
        let (tx, rx) = watch::channel(Arc::new(MenuSnapshot::default()));
        refresh(&catalog, &tx).await.unwrap();

        catalog.broken.store(true, Ordering::SeqCst);
        assert!(refresh(&catalog, &tx).await.is_err());
        assert_eq!(rx.borrow().items().len(), 1);
    }

    #[tokio::test]
    async fn test_start_loads_before_returning() {
        let catalog: Arc<dyn CatalogReader> =
            Arc::new(MemoryCatalog::with_items(vec![dish("Biryani", true)]));
        let (rx, handle) = start(catalog, Duration::from_secs(60)).await;

        assert_eq!(rx.borrow().items().len(), 1);
        handle.abort();
    }

    #[tokio::test]
    async fn test_start_survives_unreachable_catalog() {
        let catalog: Arc<dyn CatalogReader> = Arc::new(FlakyCatalog {
            inner: MemoryCatalog::new(),
            broken: AtomicBool::new(true),
        });
        let (rx, handle) = start(catalog, Duration::from_secs(60)).await;

        assert!(rx.borrow().is_empty());
        handle.abort();
    }

    #[test]
    fn test_fixed_feed_keeps_value() {
        let rx = fixed(MenuSnapshot::from_items(vec![dish("Biryani", true)]));
        assert_eq!(rx.borrow().items().len(), 1);
    }
}
