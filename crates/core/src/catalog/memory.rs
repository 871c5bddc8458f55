//! In-process catalog for tests, demos and local development.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use super::{CatalogError, CatalogReader, CatalogWriter, MenuQuery};
use crate::menu::MenuItemDraft;
use crate::types::{MenuItem, MenuItemId};

/// Catalog held in memory behind a lock.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    items: RwLock<Vec<MenuItem>>,
}

impl MemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with existing items.
    #[must_use]
    pub fn with_items(items: Vec<MenuItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }
}

fn poisoned<T>(_: PoisonError<T>) -> CatalogError {
    CatalogError::Unavailable("catalog lock poisoned".to_string())
}

#[async_trait]
impl CatalogReader for MemoryCatalog {
    async fn list(&self, query: &MenuQuery) -> Result<Vec<MenuItem>, CatalogError> {
        let items = self.items.read().map_err(poisoned)?;
        let mut matching: Vec<MenuItem> = items
            .iter()
            .filter(|item| query.matches(item))
            .cloned()
            .collect();
        drop(items);

        matching.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
        if let Some(limit) = query.limit {
            matching.truncate(limit);
        }
        Ok(matching)
    }

    async fn get(&self, id: MenuItemId) -> Result<Option<MenuItem>, CatalogError> {
        let items = self.items.read().map_err(poisoned)?;
        Ok(items.iter().find(|item| item.id == id).cloned())
    }

    async fn ping(&self) -> Result<(), CatalogError> {
        self.items.read().map(|_| ()).map_err(poisoned)
    }
}

#[async_trait]
impl CatalogWriter for MemoryCatalog {
    async fn create(&self, draft: &MenuItemDraft) -> Result<MenuItem, CatalogError> {
        let item = draft.clone().into_item(MenuItemId::generate());
        self.items.write().map_err(poisoned)?.push(item.clone());
        Ok(item)
    }

    async fn replace(
        &self,
        id: MenuItemId,
        draft: &MenuItemDraft,
    ) -> Result<MenuItem, CatalogError> {
        let mut items = self.items.write().map_err(poisoned)?;
        let slot = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(CatalogError::NotFound)?;
        *slot = draft.clone().into_item(id);
        Ok(slot.clone())
    }

    async fn delete(&self, id: MenuItemId) -> Result<bool, CatalogError> {
        let mut items = self.items.write().map_err(poisoned)?;
        let before = items.len();
        items.retain(|item| item.id != id);
        Ok(items.len() != before)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::MenuPrice;

    fn draft(name: &str, category: &str) -> MenuItemDraft {
        MenuItemDraft {
            name: name.to_string(),
            description: "Cooked to order in the tandoor.".to_string(),
            category: category.to_string(),
            price: MenuPrice::full_only(Decimal::new(180, 0)),
            has_half_quantity: false,
            is_available: true,
            is_featured: false,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_list_orders_by_category_then_name() {
        let catalog = MemoryCatalog::new();
        catalog.create(&draft("Tandoori Roti", "Breads")).await.unwrap();
        catalog.create(&draft("Aloo Tikki", "Appetizers")).await.unwrap();
        catalog.create(&draft("Butter Naan", "Breads")).await.unwrap();

        let names: Vec<String> = catalog
            .list(&MenuQuery::all())
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, ["Aloo Tikki", "Butter Naan", "Tandoori Roti"]);
    }

    #[tokio::test]
    async fn test_featured_query_filters_and_caps() {
        let catalog = MemoryCatalog::new();
        for name in ["A", "B", "C"] {
            let mut d = draft(name, "Mains");
            d.is_featured = true;
            catalog.create(&d).await.unwrap();
        }
        let mut hidden = draft("Hidden", "Mains");
        hidden.is_featured = true;
        hidden.is_available = false;
        catalog.create(&hidden).await.unwrap();

        let featured = catalog.list(&MenuQuery::featured(2)).await.unwrap();
        assert_eq!(featured.len(), 2);
        assert!(featured.iter().all(|i| i.is_available && i.is_featured));
    }

    #[tokio::test]
    async fn test_replace_is_full_replacement() {
        let catalog = MemoryCatalog::new();
        let mut original = draft("Lassi", "Drinks");
        original.image_url = Some("/uploads/lassi.jpg".to_string());
        let created = catalog.create(&original).await.unwrap();

        let updated = catalog
            .replace(created.id, &draft("Mango Lassi", "Drinks"))
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Mango Lassi");
        assert_eq!(updated.image_url, None);
    }

    #[tokio::test]
    async fn test_replace_missing_is_not_found() {
        let catalog = MemoryCatalog::new();
        let result = catalog
            .replace(MenuItemId::generate(), &draft("Ghost", "Mains"))
            .await;
        assert!(matches!(result, Err(CatalogError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_reports_removal() {
        let catalog = MemoryCatalog::new();
        let created = catalog.create(&draft("Chai", "Drinks")).await.unwrap();

        assert!(catalog.delete(created.id).await.unwrap());
        assert!(!catalog.delete(created.id).await.unwrap());
        assert!(catalog.get(created.id).await.unwrap().is_none());
    }
}
