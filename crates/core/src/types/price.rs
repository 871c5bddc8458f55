//! Menu prices and currency formatting using decimal arithmetic.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Variant;

/// ISO 4217 currency codes the restaurant can price in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
}

impl Currency {
    /// Display symbol placed before amounts.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::INR => "₹",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::INR => "INR",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }

    /// Format an amount for display, e.g. `₹12.50`.
    #[must_use]
    pub fn format(self, amount: Decimal) -> String {
        format!("{}{:.2}", self.symbol(), amount.round_dp(2))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INR" => Ok(Self::INR),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            other => Err(format!("unsupported currency: {other}")),
        }
    }
}

/// Price of a menu item: a required full-portion price and an optional
/// half-portion price.
///
/// Older catalog documents stored a flat number; those deserialize as a
/// full price with no half price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PriceRepr")]
pub struct MenuPrice {
    /// Full-portion price.
    pub full: Decimal,
    /// Half-portion price, if the kitchen offers one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub half: Option<Decimal>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PriceRepr {
    Flat(Decimal),
    Split {
        full: Decimal,
        #[serde(default)]
        half: Option<Decimal>,
    },
}

impl From<PriceRepr> for MenuPrice {
    fn from(repr: PriceRepr) -> Self {
        match repr {
            PriceRepr::Flat(full) => Self { full, half: None },
            PriceRepr::Split { full, half } => Self { full, half },
        }
    }
}

impl MenuPrice {
    /// A price with only a full portion.
    #[must_use]
    pub const fn full_only(full: Decimal) -> Self {
        Self { full, half: None }
    }

    /// A price with both portions.
    #[must_use]
    pub const fn with_half(full: Decimal, half: Decimal) -> Self {
        Self {
            full,
            half: Some(half),
        }
    }

    /// Unit price charged for a variant.
    ///
    /// Selecting `Half` when no half price exists charges the full price.
    #[must_use]
    pub fn unit_price(&self, variant: Variant) -> Decimal {
        match (variant, self.half) {
            (Variant::Half, Some(half)) => half,
            _ => self.full,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_half_falls_back_to_full() {
        let price = MenuPrice::full_only(dec("10.00"));
        assert_eq!(price.unit_price(Variant::Half), dec("10.00"));
    }

    #[test]
    fn test_half_price_used_when_present() {
        let price = MenuPrice::with_half(dec("10.00"), dec("6.00"));
        assert_eq!(price.unit_price(Variant::Half), dec("6.00"));
        assert_eq!(price.unit_price(Variant::Full), dec("10.00"));
    }

    #[test]
    fn test_legacy_flat_price_deserializes() {
        let price: MenuPrice = serde_json::from_str("12.99").unwrap();
        assert_eq!(price, MenuPrice::full_only(dec("12.99")));
    }

    #[test]
    fn test_structured_price_deserializes() {
        let price: MenuPrice = serde_json::from_str(r#"{"full": 240, "half": 140}"#).unwrap();
        assert_eq!(price, MenuPrice::with_half(dec("240"), dec("140")));

        let price: MenuPrice = serde_json::from_str(r#"{"full": "99.50"}"#).unwrap();
        assert_eq!(price, MenuPrice::full_only(dec("99.50")));
    }

    #[test]
    fn test_currency_format_pads_and_rounds() {
        assert_eq!(Currency::INR.format(dec("16")), "₹16.00");
        assert_eq!(Currency::USD.format(dec("3.456")), "$3.46");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("inr".parse::<Currency>().unwrap(), Currency::INR);
        assert!("XYZ".parse::<Currency>().is_err());
    }
}
