//! `quickbuy-storefront`: talking to the storefront's AJAX endpoints.
//!
//! - [`StorefrontApi`]: the seam over `GET /products/{handle}.js` and `POST /cart/add.js`
//! - [`HttpStorefront`]: `reqwest` implementation against a live shop
//! - [`InMemoryStorefront`]: scripted implementation for tests/dev
//! - [`cart`]: cart submission, including the bundled bonus item rule

pub mod api;
pub mod cart;
pub mod error;
pub mod http;
pub mod memory;

pub use api::StorefrontApi;
pub use cart::{
    AddedLine, BonusConfig, BonusOutcome, BonusQuantity, BonusSource, BundleStrategy,
    BundleTrigger, CartAddRequest, CartAddResponse, CartError, CartLineItem, CartSubmission,
    CartSubmitter, PrimaryItem,
};
pub use error::StorefrontError;
pub use http::HttpStorefront;
pub use memory::InMemoryStorefront;
