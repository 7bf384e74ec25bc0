//! Product catalog model and variant resolution.
//!
//! This crate contains the storefront's product JSON model plus the pure
//! selection logic the modal runs on it (no IO, no HTTP).

pub mod matcher;
pub mod options;
pub mod product;
pub mod selection;

pub use matcher::{MatchRule, VariantMatch, match_variant, matches_selection};
pub use options::{AxisMap, axis_values, find_option_index};
pub use product::{ImageRef, Product, ProductOption, Variant};
pub use selection::Selection;
