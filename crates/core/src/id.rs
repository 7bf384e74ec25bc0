//! Strongly-typed identifiers used across the storefront.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Numeric identifier of a purchasable variant (what the cart endpoint takes).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(u64);

impl VariantId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for VariantId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for VariantId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for VariantId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<u64>()
            .map_err(|e| DomainError::invalid_id(format!("VariantId: {e}")))?;
        if id == 0 {
            return Err(DomainError::invalid_id("VariantId: must be non-zero"));
        }
        Ok(Self(id))
    }
}

/// URL handle of a product (`/products/{handle}.js`).
///
/// Handles are lowercase slugs; anything that would escape the path segment
/// is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductHandle(String);

impl ProductHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ProductHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProductHandle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let handle = s.trim();
        if handle.is_empty() {
            return Err(DomainError::invalid_id("ProductHandle: empty"));
        }
        if let Some(bad) = handle
            .chars()
            .find(|c| !(c.is_alphanumeric() || *c == '-' || *c == '_' || *c == '.'))
        {
            return Err(DomainError::invalid_id(format!(
                "ProductHandle: unexpected character {bad:?}"
            )));
        }
        if handle.chars().all(|c| c == '.') {
            return Err(DomainError::invalid_id("ProductHandle: not a product"));
        }
        Ok(Self(handle.to_string()))
    }
}

impl TryFrom<String> for ProductHandle {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProductHandle> for String {
    fn from(value: ProductHandle) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_id_rejects_zero_and_garbage() {
        assert!("0".parse::<VariantId>().is_err());
        assert!("abc".parse::<VariantId>().is_err());
        assert_eq!(" 42 ".parse::<VariantId>().unwrap(), VariantId::new(42));
    }

    #[test]
    fn handle_rejects_path_segments() {
        assert!("soft-winter-jacket".parse::<ProductHandle>().is_ok());
        assert!("../cart".parse::<ProductHandle>().is_err());
        assert!("a/b".parse::<ProductHandle>().is_err());
        assert!("..".parse::<ProductHandle>().is_err());
        assert!("   ".parse::<ProductHandle>().is_err());
    }

    #[test]
    fn handle_deserializes_with_validation() {
        let ok: ProductHandle = serde_json::from_str("\"tee\"").unwrap();
        assert_eq!(ok.as_str(), "tee");
        assert!(serde_json::from_str::<ProductHandle>("\"a b\"").is_err());
    }
}
