//! Option axis resolution.
//!
//! Merchants name axes inconsistently ("Colour", "Size", "Title"...), so the
//! modal locates its color and size axes by name and falls back to positional
//! guesses when no name matches.

use crate::product::Product;

/// Name guesses used by [`AxisMap::resolve`].
pub const COLOR_AXIS: &str = "color";
pub const SIZE_AXIS: &str = "size";

/// Index of the axis named `name_guess` (case-insensitive), else `fallback`.
///
/// The fallback is returned as-is; callers check it against the axis count.
pub fn find_option_index(product: &Product, name_guess: &str, fallback: usize) -> usize {
    let guess = name_guess.trim();
    product
        .options
        .iter()
        .position(|o| o.name.trim().eq_ignore_ascii_case(guess))
        .unwrap_or(fallback)
}

/// Distinct values of `axis` in the order variants first use them.
pub fn axis_values(product: &Product, axis: usize) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in product.variants.iter().filter_map(|v| v.option(axis)) {
        if !seen.iter().any(|s| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}

/// Where the color and size axes live on a given product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisMap {
    pub color: Option<usize>,
    pub size: Option<usize>,
}

impl AxisMap {
    /// Color falls back to the first axis; size to the second, clamped to the
    /// last axis for single-axis products. Products without axes map nothing.
    pub fn resolve(product: &Product) -> Self {
        let Some(last) = product.axis_count().checked_sub(1) else {
            return Self::default();
        };

        let color = find_option_index(product, COLOR_AXIS, 0);
        let size = find_option_index(product, SIZE_AXIS, last.min(1));

        Self {
            color: (color <= last).then_some(color),
            size: (size <= last).then_some(size),
        }
    }
}
