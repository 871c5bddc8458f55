//! Session-related types.
//!
//! A visitor's cart lives in their session under [`keys::CART`] as the JSON
//! list of cart lines. [`SessionCart`] bridges the synchronous cart engine
//! and the async session: the payload is read once into a buffer, the
//! engine runs against the buffer, and the buffer is written back only if
//! the engine persisted something.

use flavors_core::{Cart, CartStorage, MemoryStorage};
use tower_sessions::Session;

/// Session keys for storefront data.
pub mod keys {
    /// Key for the serialized cart lines.
    pub const CART: &str = "cart";
}

/// A cart hydrated from the visitor's session.
pub struct SessionCart {
    session: Session,
    cart: Cart<MemoryStorage>,
}

impl SessionCart {
    /// Read the cart slot from the session.
    ///
    /// A missing or unreadable slot yields an empty cart.
    pub async fn load(session: Session) -> Self {
        let payload = match session.get::<String>(keys::CART).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read cart from session");
                None
            }
        };
        let storage = payload.map_or_else(MemoryStorage::default, MemoryStorage::with_payload);

        Self {
            session,
            cart: Cart::hydrate(storage),
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart<MemoryStorage> {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart<MemoryStorage> {
        &mut self.cart
    }

    /// Write the slot back if the cart persisted any change.
    ///
    /// # Errors
    ///
    /// Returns the session store error if the write fails.
    pub async fn save(&self) -> Result<(), tower_sessions::session::Error> {
        let storage = self.cart.storage();
        if storage.writes() == 0 {
            return Ok(());
        }
        match storage.load() {
            Ok(Some(payload)) => self.session.insert(keys::CART, payload).await,
            _ => Ok(()),
        }
    }
}
