//! Checkout handoff to WhatsApp.
//!
//! There is no server-side order: checkout turns the cart into a plain-text
//! summary and a `wa.me` deep link addressed to the restaurant's number.
//! A successful handoff clears the cart.

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::cart::{Cart, CartLine, CartStorage};
use crate::types::{Currency, MenuItem, Variant};

const WHATSAPP_BASE: &str = "https://wa.me/";
const MIN_PHONE_DIGITS: usize = 6;
const MAX_PHONE_DIGITS: usize = 15;

/// Errors that abort a checkout before any state changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// No destination number is configured for the restaurant.
    #[error("Restaurant's phone number is not configured. Please contact support.")]
    MissingDestination,

    /// The configured destination is not a usable phone number.
    #[error("invalid destination phone number: {0}")]
    InvalidDestination(String),

    /// Nothing to order.
    #[error("your cart is empty")]
    EmptyCart,
}

/// WhatsApp destination: an international phone number, digits only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDestination(String);

impl OrderDestination {
    /// Parse a phone number, ignoring `+`, spaces, dashes, dots and parentheses.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidDestination` if anything other than
    /// 6 to 15 digits remains.
    pub fn parse(raw: &str) -> Result<Self, CheckoutError> {
        let digits: String = raw
            .chars()
            .filter(|c| !matches!(c, '+' | ' ' | '-' | '.' | '(' | ')'))
            .collect();

        let valid_len = (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len());
        if !valid_len || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(CheckoutError::InvalidDestination(raw.to_string()));
        }
        Ok(Self(digits))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a successful handoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handoff {
    /// Plain-text order summary.
    pub message: String,
    /// Deep link to open in a new browsing context.
    pub url: String,
}

/// Render the order summary for a list of lines.
///
/// ```text
/// Hi, I'd like to order:
/// - 2x Paneer Tikka (half)
/// - 1x Butter Naan (full)
///
/// Total: ₹325.00
/// ```
#[must_use]
pub fn order_summary(lines: &[CartLine], total: Decimal, currency: Currency) -> String {
    let items = lines
        .iter()
        .map(|line| {
            format!(
                "- {}x {} ({})",
                line.quantity, line.item.name, line.selected_quantity
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Hi, I'd like to order:\n{items}\n\nTotal: {}",
        currency.format(total)
    )
}

/// Build a `wa.me` link carrying `message` as pre-filled text.
#[must_use]
pub fn whatsapp_link(destination: &OrderDestination, message: &str) -> String {
    format!(
        "{WHATSAPP_BASE}{}?text={}",
        destination.as_str(),
        urlencoding::encode(message)
    )
}

/// Hand the cart off to WhatsApp and clear it.
///
/// # Errors
///
/// Returns `CheckoutError::MissingDestination` when no number is configured
/// and `CheckoutError::EmptyCart` when there is nothing to order. In both
/// cases the cart is left untouched.
pub fn checkout<S: CartStorage>(
    cart: &mut Cart<S>,
    destination: Option<&OrderDestination>,
    currency: Currency,
) -> Result<Handoff, CheckoutError> {
    let destination = destination.ok_or(CheckoutError::MissingDestination)?;
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let message = order_summary(cart.lines(), cart.total(), currency);
    let url = whatsapp_link(destination, &message);
    cart.clear_cart();

    tracing::info!(destination = %destination, "order handed off to whatsapp");
    Ok(Handoff { message, url })
}

/// Order a single unit of one item directly, bypassing the cart.
///
/// # Errors
///
/// Returns `CheckoutError::MissingDestination` when no number is configured.
pub fn direct_order(
    item: &MenuItem,
    variant: Variant,
    destination: Option<&OrderDestination>,
    currency: Currency,
) -> Result<Handoff, CheckoutError> {
    let destination = destination.ok_or(CheckoutError::MissingDestination)?;
    let price = item.price.unit_price(variant);
    let message = format!(
        "Hi, I'd like to directly order: 1x {} ({variant}) - {}",
        item.name,
        currency.format(price)
    );
    let url = whatsapp_link(destination, &message);
    Ok(Handoff { message, url })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::MemoryStorage;
    use crate::types::{MenuItemId, MenuPrice};

    fn item(name: &str, full: i64, half: Option<i64>) -> MenuItem {
        MenuItem {
            id: MenuItemId::generate(),
            name: name.to_string(),
            description: "House special".to_string(),
            category: "Main Courses".to_string(),
            price: MenuPrice {
                full: Decimal::new(full, 0),
                half: half.map(|h| Decimal::new(h, 0)),
            },
            has_half_quantity: half.is_some(),
            is_available: true,
            is_featured: false,
            image_url: None,
        }
    }

    fn destination() -> OrderDestination {
        OrderDestination::parse("+91 98765-43210").unwrap()
    }

    #[test]
    fn test_destination_strips_formatting() {
        assert_eq!(destination().as_str(), "919876543210");
    }

    #[test]
    fn test_destination_rejects_letters_and_short_numbers() {
        assert!(OrderDestination::parse("call-me").is_err());
        assert!(OrderDestination::parse("123").is_err());
        assert!(OrderDestination::parse("").is_err());
    }

    #[test]
    fn test_summary_format() {
        let tikka = item("Paneer Tikka", 240, Some(140));
        let naan = item("Butter Naan", 45, None);
        let mut cart = Cart::hydrate(MemoryStorage::default());
        cart.add_to_cart(&tikka, Variant::Half);
        cart.add_to_cart(&tikka, Variant::Half);
        cart.add_to_cart(&naan, Variant::Full);

        let summary = order_summary(cart.lines(), cart.total(), Currency::INR);
        assert_eq!(
            summary,
            "Hi, I'd like to order:\n- 2x Paneer Tikka (half)\n- 1x Butter Naan (full)\n\nTotal: ₹325.00"
        );
    }

    #[test]
    fn test_link_encodes_message() {
        let link = whatsapp_link(&destination(), "1x Chai & Samosa\nTotal: ₹40.00");
        let url = url::Url::parse(&link).unwrap();
        assert_eq!(url.host_str(), Some("wa.me"));
        assert_eq!(url.path(), "/919876543210");
        let text = url
            .query_pairs()
            .find(|(k, _)| k == "text")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert_eq!(text, "1x Chai & Samosa\nTotal: ₹40.00");
    }

    #[test]
    fn test_checkout_without_destination_leaves_cart() {
        let mut cart = Cart::hydrate(MemoryStorage::default());
        cart.add_to_cart(&item("Lassi", 60, None), Variant::Full);

        let result = checkout(&mut cart, None, Currency::INR);
        assert_eq!(result, Err(CheckoutError::MissingDestination));
        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn test_checkout_empty_cart_rejected() {
        let mut cart = Cart::hydrate(MemoryStorage::default());
        let result = checkout(&mut cart, Some(&destination()), Currency::INR);
        assert_eq!(result, Err(CheckoutError::EmptyCart));
    }

    #[test]
    fn test_checkout_clears_cart() {
        let mut cart = Cart::hydrate(MemoryStorage::default());
        cart.add_to_cart(&item("Lassi", 60, None), Variant::Full);

        let handoff = checkout(&mut cart, Some(&destination()), Currency::INR).unwrap();
        assert!(handoff.message.ends_with("Total: ₹60.00"));
        assert!(handoff.url.starts_with("https://wa.me/919876543210?text="));
        assert!(cart.is_empty());
        assert_eq!(cart.storage().payload(), Some("[]"));
    }

    #[test]
    fn test_direct_order_uses_variant_price() {
        let tikka = item("Paneer Tikka", 240, Some(140));
        let handoff =
            direct_order(&tikka, Variant::Half, Some(&destination()), Currency::INR).unwrap();
        assert_eq!(
            handoff.message,
            "Hi, I'd like to directly order: 1x Paneer Tikka (half) - ₹140.00"
        );
        assert_eq!(
            direct_order(&tikka, Variant::Full, None, Currency::INR),
            Err(CheckoutError::MissingDestination)
        );
    }
}
