//! Validation of menu items submitted from the admin dashboard.
//!
//! Form input arrives as loosely typed strings. [`MenuItemInput::validate`]
//! checks every field, collects all failures, and only then produces a
//! [`MenuItemDraft`] the catalog can persist.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{MenuItem, MenuItemId, MenuPrice, non_blank};

const MIN_NAME_CHARS: usize = 2;
const MIN_DESCRIPTION_CHARS: usize = 10;
const MIN_CATEGORY_CHARS: usize = 2;

/// Form fields that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Description,
    Category,
    FullPrice,
    HalfPrice,
}

impl Field {
    /// Form field name as submitted by the dashboard.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Category => "category",
            Self::FullPrice => "full_price",
            Self::HalfPrice => "half_price",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field validation failures. At most one message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(BTreeMap<Field, &'static str>);

impl ValidationErrors {
    fn add(&mut self, field: Field, message: &'static str) {
        self.0.entry(field).or_insert(message);
    }

    /// Message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }
}

/// Raw menu item form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemInput {
    pub name: String,
    pub description: String,
    pub category: String,
    pub full_price: String,
    pub half_price: String,
    pub has_half_quantity: bool,
    pub is_available: bool,
    pub is_featured: bool,
}

impl MenuItemInput {
    /// Prefill a form from an existing item.
    #[must_use]
    pub fn from_item(item: &MenuItem) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone(),
            category: item.category.clone(),
            full_price: item.price.full.to_string(),
            half_price: item.price.half.map(|h| h.to_string()).unwrap_or_default(),
            has_half_quantity: item.has_half_quantity,
            is_available: item.is_available,
            is_featured: item.is_featured,
        }
    }

    /// Validate every field and build a draft.
    ///
    /// A half price is only kept when the half portion is enabled.
    ///
    /// # Errors
    ///
    /// Returns `ValidationErrors` carrying one message per invalid field.
    pub fn validate(&self) -> Result<MenuItemDraft, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = self.name.trim();
        if name.chars().count() < MIN_NAME_CHARS {
            errors.add(Field::Name, "Name must be at least 2 characters.");
        }

        let description = self.description.trim();
        if description.chars().count() < MIN_DESCRIPTION_CHARS {
            errors.add(
                Field::Description,
                "Description must be at least 10 characters.",
            );
        }

        let category = self.category.trim();
        if category.chars().count() < MIN_CATEGORY_CHARS {
            errors.add(Field::Category, "Category is required.");
        }

        let full = match parse_amount(&self.full_price) {
            Ok(full) => Some(full),
            Err(err) => {
                errors.add(Field::FullPrice, err.message(Field::FullPrice));
                None
            }
        };

        let half = if self.has_half_quantity {
            match parse_amount(&self.half_price) {
                Ok(half) => Some(half),
                Err(err) => {
                    errors.add(Field::HalfPrice, err.message(Field::HalfPrice));
                    None
                }
            }
        } else {
            None
        };

        match full {
            Some(full) if errors.is_empty() => Ok(MenuItemDraft {
                name: name.to_string(),
                description: description.to_string(),
                category: category.to_string(),
                price: MenuPrice { full, half },
                has_half_quantity: self.has_half_quantity,
                is_available: self.is_available,
                is_featured: self.is_featured,
                image_url: None,
            }),
            _ => Err(errors),
        }
    }
}

/// Why a submitted price was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AmountError {
    NotPositive,
    TooPrecise,
    TooLarge,
}

impl AmountError {
    const fn message(self, field: Field) -> &'static str {
        match (self, field) {
            (Self::NotPositive, Field::HalfPrice) => {
                "Half price is required when half quantity is enabled."
            }
            (Self::NotPositive, _) => "Price must be a positive number.",
            (Self::TooPrecise, Field::HalfPrice) => {
                "Half price can have at most 2 decimal places."
            }
            (Self::TooPrecise, _) => "Price can have at most 2 decimal places.",
            (Self::TooLarge, Field::HalfPrice) => "Half price must be below 100,000,000.",
            (Self::TooLarge, _) => "Price must be below 100,000,000.",
        }
    }
}

/// Prices are stored as `NUMERIC(10,2)`.
const MAX_PRICE_SCALE: u32 = 2;
const PRICE_CEILING: i64 = 100_000_000;

fn parse_amount(raw: &str) -> Result<Decimal, AmountError> {
    let amount = raw
        .trim()
        .parse::<Decimal>()
        .map_err(|_| AmountError::NotPositive)?;
    if !amount.is_sign_positive() || amount.is_zero() {
        return Err(AmountError::NotPositive);
    }
    if amount.normalize().scale() > MAX_PRICE_SCALE {
        return Err(AmountError::TooPrecise);
    }
    if amount >= Decimal::from(PRICE_CEILING) {
        return Err(AmountError::TooLarge);
    }
    Ok(amount)
}

/// A validated menu item, ready to be created or to replace an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: MenuPrice,
    pub has_half_quantity: bool,
    pub is_available: bool,
    pub is_featured: bool,
    pub image_url: Option<String>,
}

impl MenuItemDraft {
    /// Attach a hosted image.
    #[must_use]
    pub fn with_image(mut self, image_url: Option<String>) -> Self {
        self.image_url = non_blank(image_url);
        self
    }

    /// Materialize the draft as a stored item.
    #[must_use]
    pub fn into_item(self, id: MenuItemId) -> MenuItem {
        MenuItem {
            id,
            name: self.name,
            description: self.description,
            category: self.category,
            price: self.price,
            has_half_quantity: self.has_half_quantity,
            is_available: self.is_available,
            is_featured: self.is_featured,
            image_url: self.image_url,
        }
    }
}
