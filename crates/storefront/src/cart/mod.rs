//! Cart submission.
//!
//! The primary line is what the shopper asked for and its outcome is the only
//! one the UI reports. The bonus line is best-effort: its result is returned
//! as data ([`BonusOutcome`]) and never turns into an error.

pub mod bonus;
pub mod line;
pub mod submitter;

pub use bonus::{BonusConfig, BonusOutcome, BonusQuantity, BonusSource, BundleStrategy, BundleTrigger};
pub use line::{AddedLine, CartAddRequest, CartAddResponse, CartLineItem};
pub use submitter::{CartError, CartSubmission, CartSubmitter, PrimaryItem};
