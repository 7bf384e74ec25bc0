//! Cart quantities.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A positive line-item quantity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub const ONE: Quantity = Quantity(1);

    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        Ok(Self(value))
    }

    /// Parse free-form shopper input leniently.
    ///
    /// Leading digits are taken (`"3 pcs"` is 3); anything unparseable, zero
    /// or negative clamps to 1.
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        let digits: String = trimmed
            .strip_prefix('+')
            .unwrap_or(trimmed)
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        match digits.parse::<u32>() {
            Ok(n) if n >= 1 => Self(n),
            Ok(_) => Self::ONE,
            // Overflowing input is still "a lot".
            Err(_) if !digits.is_empty() => Self(u32::MAX),
            Err(_) => Self::ONE,
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<u32> for Quantity {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_input_clamps_to_one() {
        assert_eq!(Quantity::from_input("").get(), 1);
        assert_eq!(Quantity::from_input("0").get(), 1);
        assert_eq!(Quantity::from_input("-4").get(), 1);
        assert_eq!(Quantity::from_input("abc").get(), 1);
        assert_eq!(Quantity::from_input(" 3 ").get(), 3);
        assert_eq!(Quantity::from_input("2.9").get(), 2);
        assert_eq!(Quantity::from_input("99999999999").get(), u32::MAX);
    }

    #[test]
    fn zero_is_rejected_by_constructor() {
        assert!(Quantity::new(0).is_err());
        assert_eq!(Quantity::new(5).unwrap().get(), 5);
    }
}
