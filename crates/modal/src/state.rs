//! Explicit modal state and the pure updates applied to it.

use quickbuy_catalog::{AxisMap, MatchRule, Product, Selection, Variant, match_variant};
use quickbuy_core::{DomainError, DomainResult, ProductHandle, Quantity};

/// A product loaded into the modal, with the shopper's choices so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedProduct {
    product: Product,
    axes: AxisMap,
    selection: Selection,
    active: Option<usize>,
    rule: Option<MatchRule>,
    quantity: Quantity,
}

impl LoadedProduct {
    /// Selectors start on the default variant's values (first available,
    /// else first).
    pub fn new(product: Product) -> Self {
        let axes = AxisMap::resolve(&product);
        let selection = product
            .default_variant()
            .map(Selection::from_variant)
            .unwrap_or_default();

        let mut loaded = Self {
            product,
            axes,
            selection,
            active: None,
            rule: None,
            quantity: Quantity::ONE,
        };
        loaded.recompute();
        loaded
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn axes(&self) -> AxisMap {
        self.axes
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn match_rule(&self) -> Option<MatchRule> {
        self.rule
    }

    pub fn active_variant(&self) -> Option<&Variant> {
        self.active.and_then(|i| self.product.variants.get(i))
    }

    /// Pick `value` on `axis` and re-resolve the active variant.
    pub fn select(&mut self, axis: usize, value: impl Into<String>) -> DomainResult<()> {
        if axis >= self.product.axis_count() {
            return Err(DomainError::validation(format!(
                "axis {axis} out of range ({} axes)",
                self.product.axis_count()
            )));
        }
        self.selection.set(axis, value);
        self.recompute();
        Ok(())
    }

    pub fn set_quantity_input(&mut self, input: &str) {
        self.quantity = Quantity::from_input(input);
    }

    fn recompute(&mut self) {
        let found = match_variant(&self.product, &self.selection);
        self.active = found.map(|m| m.index);
        self.rule = found.map(|m| m.rule);
        tracing::debug!(
            selection = ?self.selection,
            variant = ?found.map(|m| m.variant.id),
            rule = ?self.rule,
            "active variant recomputed"
        );
    }
}

/// Content of an open modal. `content` is empty until the product arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenModal {
    pub handle: ProductHandle,
    /// Bumped on every open; stale delayed closes carry an older value.
    pub generation: u64,
    pub content: Option<LoadedProduct>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Open(OpenModal),
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    pub fn open(&self) -> Option<&OpenModal> {
        match self {
            Self::Open(open) => Some(open),
            Self::Closed => None,
        }
    }

    pub fn open_mut(&mut self) -> Option<&mut OpenModal> {
        match self {
            Self::Open(open) => Some(open),
            Self::Closed => None,
        }
    }

    pub fn loaded(&self) -> Option<&LoadedProduct> {
        self.open().and_then(|o| o.content.as_ref())
    }

    pub fn loaded_mut(&mut self) -> Option<&mut LoadedProduct> {
        self.open_mut().and_then(|o| o.content.as_mut())
    }
}
