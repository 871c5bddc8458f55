//! Portion size selection for a menu item.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Portion size a customer orders.
///
/// Each variant carries its own price; see [`super::MenuPrice::unit_price`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Half,
    #[default]
    Full,
}

impl Variant {
    /// Lowercase label used in order messages and forms.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Half => "half",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "half" => Ok(Self::Half),
            "full" => Ok(Self::Full),
            _ => Err(format!("invalid variant: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_uses_lowercase_tags() {
        assert_eq!(serde_json::to_string(&Variant::Half).unwrap(), "\"half\"");
        let v: Variant = serde_json::from_str("\"full\"").unwrap();
        assert_eq!(v, Variant::Full);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert_eq!("half".parse::<Variant>().unwrap(), Variant::Half);
        assert!("quarter".parse::<Variant>().is_err());
    }
}
