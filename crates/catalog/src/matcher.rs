//! Variant matching against a partial selection.

use crate::product::{Product, Variant};
use crate::selection::Selection;

/// Which rule produced a [`VariantMatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// The variant agrees with every selected axis.
    Exact,
    /// Nothing usable matched; first available variant instead.
    FirstAvailable,
    /// Nothing matched and nothing is available; first variant overall.
    First,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantMatch<'a> {
    pub variant: &'a Variant,
    /// Position in `product.variants`.
    pub index: usize,
    pub rule: MatchRule,
}

/// True when `variant` has the selected value at every selected axis.
///
/// Unselected axes are wildcards; values compare as strings.
pub fn matches_selection(variant: &Variant, selection: &Selection) -> bool {
    selection
        .iter()
        .all(|(axis, value)| variant.option(axis) == Some(value))
}

/// Resolve the variant for `selection`. Declaration order breaks ties.
///
/// Preference, first hit wins:
/// 1. an available variant matching the selection;
/// 2. for a selection covering every axis, its matching variant even if sold out;
/// 3. the first available variant;
/// 4. a sold-out variant matching the selection;
/// 5. the first variant.
///
/// Returns `None` only for a product without variants.
pub fn match_variant<'a>(product: &'a Product, selection: &Selection) -> Option<VariantMatch<'a>> {
    let hit = |rule: MatchRule| move |(index, variant): (usize, &'a Variant)| VariantMatch {
        variant,
        index,
        rule,
    };
    let variants = || product.variants.iter().enumerate();
    let first_match = || variants().find(|(_, v)| matches_selection(v, selection));

    if let Some(found) = variants().find(|(_, v)| v.available && matches_selection(v, selection)) {
        return Some(hit(MatchRule::Exact)(found));
    }

    if selection.covers(product.axis_count()) {
        if let Some(found) = first_match() {
            return Some(hit(MatchRule::Exact)(found));
        }
    }

    if let Some((index, variant)) = variants().find(|(_, v)| v.available) {
        tracing::debug!(?selection, variant = %variant.id, "no available match; using first available variant");
        return Some(hit(MatchRule::FirstAvailable)((index, variant)));
    }

    if let Some(found) = first_match() {
        return Some(hit(MatchRule::Exact)(found));
    }

    variants().next().map(hit(MatchRule::First))
}
