//! Shopping cart engine.
//!
//! A [`Cart`] owns the ordered list of [`CartLine`]s for one shopping
//! session. Lines are keyed by `(item id, variant)`: adding the same pair
//! again bumps the quantity instead of creating a second line.
//!
//! Every mutation writes the full line list to the injected
//! [`CartStorage`] slot, and the cart is rebuilt from that slot with
//! [`Cart::hydrate`]. Storage failures are logged and never abort an
//! operation.
//!
//! ```
//! use flavors_core::cart::{Cart, MemoryStorage};
//! # use flavors_core::{MenuItem, MenuItemId, MenuPrice, Variant};
//! # use rust_decimal::Decimal;
//! # let naan = MenuItem {
//! #     id: MenuItemId::generate(),
//! #     name: "Butter Naan".into(),
//! #     description: "Tandoor-baked flatbread".into(),
//! #     category: "Breads".into(),
//! #     price: MenuPrice::full_only(Decimal::new(45, 0)),
//! #     has_half_quantity: false,
//! #     is_available: true,
//! #     is_featured: false,
//! #     image_url: None,
//! # };
//! let mut cart = Cart::hydrate(MemoryStorage::default());
//! cart.add_to_cart(&naan, Variant::Full);
//! cart.add_to_cart(&naan, Variant::Full);
//! assert_eq!(cart.lines().len(), 1);
//! assert_eq!(cart.count(), 2);
//! assert_eq!(cart.total(), Decimal::new(90, 0));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{MenuItem, MenuItemId, Variant};

/// One `(menu item, variant)` pairing with a quantity.
///
/// Carries a copy of the item as it was when first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(flatten)]
    pub item: MenuItem,
    /// Always at least 1.
    pub quantity: u32,
    pub selected_quantity: Variant,
}

impl CartLine {
    /// Whether this line is the one identified by `(id, variant)`.
    #[must_use]
    pub fn matches(&self, id: MenuItemId, variant: Variant) -> bool {
        self.item.id == id && self.selected_quantity == variant
    }

    /// Price of a single unit of this line.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.item.price.unit_price(self.selected_quantity)
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity)
    }
}

/// Errors raised by a [`CartStorage`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cart storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable single-slot storage for the serialized cart.
pub trait CartStorage {
    /// Read the stored payload, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot cannot be read.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Overwrite the slot with a new payload.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot cannot be written.
    fn store(&mut self, payload: String) -> Result<(), StorageError>;
}

/// In-process slot, used by tests and as a write buffer by callers that
/// persist asynchronously.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Option<String>,
    writes: usize,
}

impl MemoryStorage {
    /// A slot pre-filled with a payload.
    #[must_use]
    pub const fn with_payload(payload: String) -> Self {
        Self {
            slot: Some(payload),
            writes: 0,
        }
    }

    /// Current slot contents.
    #[must_use]
    pub fn payload(&self) -> Option<&str> {
        self.slot.as_deref()
    }

    /// Number of writes since creation.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }

    /// Consume the slot, returning the payload.
    #[must_use]
    pub fn into_payload(self) -> Option<String> {
        self.slot
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.slot.clone())
    }

    fn store(&mut self, payload: String) -> Result<(), StorageError> {
        self.slot = Some(payload);
        self.writes += 1;
        Ok(())
    }
}

/// Events produced by cart mutations, drained by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartNotice {
    /// Lines changed; views showing the cart should refresh.
    Changed,
    /// An item was added (acknowledgment shown to the customer).
    Added { name: String, variant: Variant },
}

impl CartNotice {
    /// Human-readable acknowledgment text, if this notice has one.
    #[must_use]
    pub fn description(&self) -> Option<String> {
        match self {
            Self::Changed => None,
            Self::Added { name, variant } => {
                Some(format!("{name} ({variant}) is now in your cart."))
            }
        }
    }
}

/// Cart state for one shopping session.
#[derive(Debug)]
pub struct Cart<S> {
    lines: Vec<CartLine>,
    storage: S,
    notices: Vec<CartNotice>,
}

impl<S: CartStorage> Cart<S> {
    /// Build a cart from whatever the storage slot holds.
    ///
    /// An empty slot, an unreadable slot, or an unparseable payload all
    /// yield an empty cart.
    pub fn hydrate(storage: S) -> Self {
        let lines = match storage.load() {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<CartLine>>(&payload) {
                Ok(lines) => normalize(lines),
                Err(e) => {
                    tracing::warn!(error = %e, "discarding unreadable stored cart");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load stored cart");
                Vec::new()
            }
        };

        Self {
            lines,
            storage,
            notices: Vec::new(),
        }
    }

    /// Add one unit of `item` in the given variant.
    ///
    /// Callers must only offer `Variant::Half` when `item.has_half_quantity`
    /// is set.
    pub fn add_to_cart(&mut self, item: &MenuItem, variant: Variant) {
        if let Some(line) = self.line_mut(item.id, variant) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(CartLine {
                item: item.clone(),
                quantity: 1,
                selected_quantity: variant,
            });
        }

        self.notices.push(CartNotice::Added {
            name: item.name.clone(),
            variant,
        });
        self.commit();
    }

    /// Set the quantity of a line. Zero or below removes the line.
    ///
    /// Does nothing when no line matches.
    pub fn update_quantity(&mut self, id: MenuItemId, variant: Variant, quantity: i64) {
        if quantity <= 0 {
            self.remove_from_cart(id, variant);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let Some(line) = self.line_mut(id, variant) else {
            return;
        };
        if line.quantity != quantity {
            line.quantity = quantity;
            self.commit();
        }
    }

    /// Remove the line for `(id, variant)` if present.
    pub fn remove_from_cart(&mut self, id: MenuItemId, variant: Variant) {
        let before = self.lines.len();
        self.lines.retain(|line| !line.matches(id, variant));
        if self.lines.len() != before {
            self.commit();
        }
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.lines.clear();
        self.commit();
    }

    fn line_mut(&mut self, id: MenuItemId, variant: Variant) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.matches(id, variant))
    }

    fn commit(&mut self) {
        self.notices.push(CartNotice::Changed);
        match serde_json::to_string(&self.lines) {
            Ok(payload) => {
                if let Err(e) = self.storage.store(payload) {
                    tracing::warn!(error = %e, "failed to persist cart");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize cart"),
        }
    }
}

impl<S> Cart<S> {
    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Drain notices produced since the last call.
    pub fn take_notices(&mut self) -> Vec<CartNotice> {
        std::mem::take(&mut self.notices)
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the cart, returning the storage backend.
    pub fn into_storage(self) -> S {
        self.storage
    }
}

/// Drop zero-quantity lines and merge duplicate `(id, variant)` pairs.
fn normalize(lines: Vec<CartLine>) -> Vec<CartLine> {
    let mut merged: Vec<CartLine> = Vec::with_capacity(lines.len());
    for line in lines.into_iter().filter(|line| line.quantity > 0) {
        match merged
            .iter_mut()
            .find(|existing| existing.matches(line.item.id, line.selected_quantity))
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => merged.push(line),
        }
    }
    merged
}
