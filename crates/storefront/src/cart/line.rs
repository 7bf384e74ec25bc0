use serde::{Deserialize, Serialize};

use quickbuy_core::{Quantity, VariantId};

/// One `{id, quantity}` entry of a cart add.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: VariantId,
    pub quantity: Quantity,
}

impl CartLineItem {
    pub fn new(id: VariantId, quantity: Quantity) -> Self {
        Self { id, quantity }
    }
}

/// Body of `POST /cart/add.js`.
///
/// The endpoint accepts a bare line (`{id, quantity}`) or a batch
/// (`{items: [...]}`); a batch is accepted or rejected as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CartAddRequest {
    Batch { items: Vec<CartLineItem> },
    Single(CartLineItem),
}

impl CartAddRequest {
    pub fn single(line: CartLineItem) -> Self {
        Self::Single(line)
    }

    pub fn batch(items: Vec<CartLineItem>) -> Self {
        Self::Batch { items }
    }

    pub fn lines(&self) -> &[CartLineItem] {
        match self {
            Self::Single(line) => core::slice::from_ref(line),
            Self::Batch { items } => items,
        }
    }
}

/// A line as echoed back by the cart endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedLine {
    /// Variant id of the line.
    pub id: VariantId,
    pub quantity: u32,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Unit price in smallest currency unit.
    #[serde(default)]
    pub price: Option<u64>,
}

/// Success body of `POST /cart/add.js`, mirroring the request shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CartAddResponse {
    Batch { items: Vec<AddedLine> },
    Single(AddedLine),
}

impl CartAddResponse {
    pub fn lines(&self) -> &[AddedLine] {
        match self {
            Self::Single(line) => core::slice::from_ref(line),
            Self::Batch { items } => items,
        }
    }
}
