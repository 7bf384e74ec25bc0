//! `quickbuy-modal`: the product quick-buy modal, without a DOM.
//!
//! The page feeds [`UiEvent`]s into an [`EventBus`]; an attached
//! [`ModalController`] turns them into state changes, storefront calls and
//! [`UiEffect`]s (alerts, delayed close). Rendering reads a [`ModalView`].

pub mod config;
pub mod controller;
pub mod events;
pub mod state;
pub mod view;

pub use config::ModalConfig;
pub use controller::{ControllerError, ModalController, UiEffect};
pub use events::{CloseReason, EventBus, InMemoryEventBus, Key, Subscription, UiEvent};
pub use state::{LoadedProduct, ModalState, OpenModal};
pub use view::{ChoiceView, ModalView, SelectorKind, SelectorView};
