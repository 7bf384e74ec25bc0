//! `quickbuy-core`: shared storefront primitives.
//!
//! This crate contains **pure** building blocks (no IO): identifiers, quantities,
//! money formatting and the domain error model.

pub mod error;
pub mod id;
pub mod money;
pub mod quantity;

pub use error::{DomainError, DomainResult};
pub use id::{ProductHandle, VariantId};
pub use money::{MoneyFormat, format_cents};
pub use quantity::Quantity;
