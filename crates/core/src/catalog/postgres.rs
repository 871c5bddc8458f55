//! `PostgreSQL` catalog store.
//!
//! # Table: `menu_item`
//!
//! Prices are stored as two `NUMERIC(10,2)` columns; `price_half` is `NULL`
//! when the kitchen does not offer a half portion.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CatalogError, CatalogReader, CatalogWriter, MenuQuery};
use crate::menu::MenuItemDraft;
use crate::types::{MenuItem, MenuItemId, MenuPrice, non_blank};

const SELECT_COLUMNS: &str = "SELECT id, name, description, category, price_full, price_half, \
     has_half_quantity, is_available, is_featured, image_url, created_at, updated_at \
     FROM menu_item";

/// Internal row type for `menu_item` queries.
#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    id: Uuid,
    name: String,
    description: String,
    category: String,
    price_full: Decimal,
    price_half: Option<Decimal>,
    has_half_quantity: bool,
    is_available: bool,
    is_featured: bool,
    image_url: Option<String>,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
    #[allow(dead_code)]
    updated_at: DateTime<Utc>,
}

impl TryFrom<MenuItemRow> for MenuItem {
    type Error = CatalogError;

    fn try_from(row: MenuItemRow) -> Result<Self, Self::Error> {
        if row.price_full <= Decimal::ZERO {
            return Err(CatalogError::DataCorruption(format!(
                "non-positive price for menu item {}",
                row.id
            )));
        }

        Ok(Self {
            id: MenuItemId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            category: row.category,
            price: MenuPrice {
                full: row.price_full,
                half: row.price_half,
            },
            has_half_quantity: row.has_half_quantity,
            is_available: row.is_available,
            is_featured: row.is_featured,
            image_url: non_blank(row.image_url),
        })
    }
}

/// Catalog backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CatalogReader for PgCatalog {
    async fn list(&self, query: &MenuQuery) -> Result<Vec<MenuItem>, CatalogError> {
        let limit = query.limit.and_then(|l| i64::try_from(l).ok());
        let sql = format!(
            "{SELECT_COLUMNS} \
             WHERE ($1 = FALSE OR is_available) AND ($2 = FALSE OR is_featured) \
             ORDER BY category, name \
             LIMIT $3"
        );

        let rows: Vec<MenuItemRow> = sqlx::query_as(&sql)
            .bind(query.available_only)
            .bind(query.featured_only)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn get(&self, id: MenuItemId) -> Result<Option<MenuItem>, CatalogError> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = $1");
        let row: Option<MenuItemRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn ping(&self) -> Result<(), CatalogError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl CatalogWriter for PgCatalog {
    async fn create(&self, draft: &MenuItemDraft) -> Result<MenuItem, CatalogError> {
        let row: MenuItemRow = sqlx::query_as(
            r"
            INSERT INTO menu_item (
                id, name, description, category, price_full, price_half,
                has_half_quantity, is_available, is_featured, image_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, name, description, category, price_full, price_half,
                      has_half_quantity, is_available, is_featured, image_url,
                      created_at, updated_at
            ",
        )
        .bind(MenuItemId::generate())
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.category)
        .bind(draft.price.full)
        .bind(draft.price.half)
        .bind(draft.has_half_quantity)
        .bind(draft.is_available)
        .bind(draft.is_featured)
        .bind(&draft.image_url)
        .fetch_one(&self.pool)
        .await?;

        let item = MenuItem::try_from(row)?;
        tracing::info!(id = %item.id, name = %item.name, "menu item created");
        Ok(item)
    }

    async fn replace(
        &self,
        id: MenuItemId,
        draft: &MenuItemDraft,
    ) -> Result<MenuItem, CatalogError> {
        let row: Option<MenuItemRow> = sqlx::query_as(
            r"
            UPDATE menu_item
            SET name = $2, description = $3, category = $4,
                price_full = $5, price_half = $6, has_half_quantity = $7,
                is_available = $8, is_featured = $9, image_url = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, category, price_full, price_half,
                      has_half_quantity, is_available, is_featured, image_url,
                      created_at, updated_at
            ",
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.category)
        .bind(draft.price.full)
        .bind(draft.price.half)
        .bind(draft.has_half_quantity)
        .bind(draft.is_available)
        .bind(draft.is_featured)
        .bind(&draft.image_url)
        .fetch_optional(&self.pool)
        .await?;

        let item = MenuItem::try_from(row.ok_or(CatalogError::NotFound)?)?;
        tracing::info!(id = %item.id, "menu item replaced");
        Ok(item)
    }

    async fn delete(&self, id: MenuItemId) -> Result<bool, CatalogError> {
        let result = sqlx::query("DELETE FROM menu_item WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
