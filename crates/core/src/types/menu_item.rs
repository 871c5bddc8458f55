//! Menu item records as stored in the catalog.

use serde::{Deserialize, Deserializer, Serialize};

use super::{MenuItemId, MenuPrice, Variant};

/// A dish on the menu.
///
/// Field names serialize in camelCase to match the stored document shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub price: MenuPrice,
    /// Whether the half portion is offered at all.
    #[serde(default)]
    pub has_half_quantity: bool,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub is_featured: bool,
    /// Hosted image reference. Empty strings from older documents read as `None`.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub image_url: Option<String>,
}

impl MenuItem {
    /// Whether customers may order this variant.
    #[must_use]
    pub const fn offers(&self, variant: Variant) -> bool {
        match variant {
            Variant::Full => true,
            Variant::Half => self.has_half_quantity,
        }
    }

    /// Half price when it is both enabled and set.
    #[must_use]
    pub fn half_price(&self) -> Option<rust_decimal::Decimal> {
        if self.has_half_quantity {
            self.price.half
        } else {
            None
        }
    }
}

const fn default_true() -> bool {
    true
}

/// Normalize an optional string, treating blank values as absent.
#[must_use]
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(non_blank)
}
