//! Seed the catalog with a sample menu.
//!
//! Nothing is inserted when the catalog already has items, so the command
//! is safe to run on every deploy.

use flavors_core::catalog::PgCatalog;
use flavors_core::{CatalogError, CatalogReader, CatalogWriter, MenuItemInput, MenuQuery};
use thiserror::Error;
use tracing::{info, warn};

use flavors_admin::db;

use super::MissingEnvVar;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    MissingEnvVar(#[from] MissingEnvVar),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Sample item {name:?} is invalid: {reason}")]
    InvalidSample { name: &'static str, reason: String },
}

/// One dish of the sample menu.
struct SampleItem {
    name: &'static str,
    description: &'static str,
    category: &'static str,
    full_price: &'static str,
    half_price: Option<&'static str>,
    is_available: bool,
    is_featured: bool,
}

impl SampleItem {
    fn input(&self) -> MenuItemInput {
        MenuItemInput {
            name: self.name.to_string(),
            description: self.description.to_string(),
            category: self.category.to_string(),
            full_price: self.full_price.to_string(),
            half_price: self.half_price.unwrap_or_default().to_string(),
            has_half_quantity: self.half_price.is_some(),
            is_available: self.is_available,
            is_featured: self.is_featured,
        }
    }
}

const SAMPLE_MENU: &[SampleItem] = &[
    SampleItem {
        name: "Margherita Pizza",
        description: "Classic pizza with tomato, mozzarella and fresh basil.",
        category: "Main Courses",
        full_price: "12.99",
        half_price: Some("7.49"),
        is_available: true,
        is_featured: true,
    },
    SampleItem {
        name: "Spaghetti Carbonara",
        description: "Spaghetti tossed with egg, pecorino, guanciale and black pepper.",
        category: "Main Courses",
        full_price: "15.50",
        half_price: Some("8.75"),
        is_available: true,
        is_featured: true,
    },
    SampleItem {
        name: "Bruschetta",
        description: "Grilled bread rubbed with garlic and topped with tomatoes.",
        category: "Appetizers",
        full_price: "7.99",
        half_price: None,
        is_available: true,
        is_featured: false,
    },
    SampleItem {
        name: "Caesar Salad",
        description: "Romaine lettuce, croutons and parmesan in Caesar dressing.",
        category: "Appetizers",
        full_price: "9.50",
        half_price: Some("5.50"),
        is_available: true,
        is_featured: false,
    },
    SampleItem {
        name: "Tiramisu",
        description: "Coffee-soaked ladyfingers layered with mascarpone cream.",
        category: "Desserts",
        full_price: "8.00",
        half_price: None,
        is_available: true,
        is_featured: true,
    },
    SampleItem {
        name: "Chocolate Lava Cake",
        description: "Warm chocolate cake with a molten centre.",
        category: "Desserts",
        full_price: "8.50",
        half_price: None,
        is_available: true,
        is_featured: false,
    },
    SampleItem {
        name: "Lemonade",
        description: "Freshly squeezed lemons with a hint of mint.",
        category: "Drinks",
        full_price: "3.50",
        half_price: None,
        is_available: true,
        is_featured: false,
    },
    SampleItem {
        name: "Iced Tea",
        description: "Black tea brewed strong and served over ice.",
        category: "Drinks",
        full_price: "3.00",
        half_price: None,
        is_available: true,
        is_featured: false,
    },
    SampleItem {
        name: "Filet Mignon",
        description: "Tender beef fillet with red wine reduction. Back soon.",
        category: "Main Courses",
        full_price: "32.00",
        half_price: None,
        is_available: false,
        is_featured: false,
    },
];

/// Insert the sample menu when the catalog is empty.
///
/// Returns the number of items inserted.
///
/// # Errors
///
/// Returns `SeedError` if the database is unreachable or an insert fails.
pub async fn sample_menu() -> Result<usize, SeedError> {
    let database_url = super::database_url()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    seed_catalog(&PgCatalog::new(pool)).await
}

/// Insert [`SAMPLE_MENU`] into `catalog` unless it already has items.
async fn seed_catalog(catalog: &dyn CatalogWriter) -> Result<usize, SeedError> {
    let existing = catalog.list(&MenuQuery::all()).await?;
    if !existing.is_empty() {
        warn!(items = existing.len(), "Catalog is not empty, skipping seed");
        return Ok(0);
    }

    for sample in SAMPLE_MENU {
        let draft = sample
            .input()
            .validate()
            .map_err(|errors| SeedError::InvalidSample {
                name: sample.name,
                reason: errors
                    .iter()
                    .map(|(field, message)| format!("{field}: {message}"))
                    .collect::<Vec<_>>()
                    .join(", "),
            })?;
        let item = catalog.create(&draft).await?;
        info!(item_id = %item.id, name = %item.name, "Seeded menu item");
    }

    info!("Seeding complete! {} items inserted", SAMPLE_MENU.len());
    Ok(SAMPLE_MENU.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use flavors_core::MemoryCatalog;

    use super::*;

    #[test]
    fn test_sample_menu_is_valid() {
        for sample in SAMPLE_MENU {
            let draft = sample.input().validate().unwrap();
            assert_eq!(draft.price.half.is_some(), sample.half_price.is_some());
        }
    }

    #[tokio::test]
    async fn test_seed_fills_empty_catalog_once() {
        let catalog = MemoryCatalog::new();

        assert_eq!(seed_catalog(&catalog).await.unwrap(), SAMPLE_MENU.len());
        assert_eq!(seed_catalog(&catalog).await.unwrap(), 0);

        let items = catalog.list(&MenuQuery::all()).await.unwrap();
        assert_eq!(items.len(), SAMPLE_MENU.len());
        let public = catalog.list(&MenuQuery::public()).await.unwrap();
        assert_eq!(public.len(), SAMPLE_MENU.len() - 1);
    }
}
