//! The modal controller: UI events in, storefront calls and UI effects out.

use std::time::Duration;

use thiserror::Error;

use quickbuy_core::{DomainError, ProductHandle};
use quickbuy_storefront::{CartSubmission, CartSubmitter, PrimaryItem, StorefrontApi};

use crate::config::ModalConfig;
use crate::events::{CloseReason, EventBus, Key, Subscription, UiEvent};
use crate::state::{LoadedProduct, ModalState, OpenModal};
use crate::view::ModalView;

/// Alert shown when a product can't be loaded.
pub const LOAD_FAILURE: &str = "Could not load product. Please try again.";
/// Status note after a successful add.
pub const ADDED_NOTE: &str = "Added!";

/// Things the host must do on the controller's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Show a blocking message to the shopper.
    Alert(String),
    /// Publish [`UiEvent::CloseTimerElapsed`] with `generation` after `after`.
    ScheduleClose { after: Duration, generation: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("modal is not open")]
    NotOpen,
    #[error("product is still loading")]
    NotLoaded,
    #[error("product has no variants")]
    NoVariant,
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Owns the modal state for one page.
///
/// - `attach` subscribes to a UI event bus; `detach` drops the subscription and closes
/// - `pump` drains pending events; `dispatch` handles one event directly
/// - Storefront calls are awaited in sequence inside the handler that issued them
pub struct ModalController<S> {
    api: S,
    config: ModalConfig,
    submitter: CartSubmitter,
    state: ModalState,
    generation: u64,
    last_submission: Option<CartSubmission>,
    subscription: Option<Subscription<UiEvent>>,
}

impl<S> ModalController<S>
where
    S: StorefrontApi,
{
    pub fn new(api: S, config: ModalConfig) -> Self {
        let submitter = CartSubmitter::new(config.bonus.clone());
        Self {
            api,
            config,
            submitter,
            state: ModalState::Closed,
            generation: 0,
            last_submission: None,
            subscription: None,
        }
    }

    pub fn api(&self) -> &S {
        &self.api
    }

    pub fn config(&self) -> &ModalConfig {
        &self.config
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn view(&self) -> ModalView {
        ModalView::render(&self.state, &self.config.money_format)
    }

    /// Result of the most recent successful add, bonus outcome included.
    pub fn last_submission(&self) -> Option<&CartSubmission> {
        self.last_submission.as_ref()
    }

    pub fn attach<B>(&mut self, bus: &B)
    where
        B: EventBus<UiEvent>,
    {
        self.subscription = Some(bus.subscribe());
        tracing::debug!("modal controller attached");
    }

    pub fn detach(&mut self) {
        if self.subscription.take().is_some() {
            self.close(CloseReason::Detached);
            tracing::debug!("modal controller detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Handle every event published since the last pump.
    ///
    /// Returns nothing while detached.
    pub async fn pump(&mut self) -> Vec<UiEffect> {
        let events = match &self.subscription {
            Some(sub) => sub.drain(),
            None => return Vec::new(),
        };

        let mut effects = Vec::new();
        for event in events {
            effects.extend(self.dispatch(event).await);
        }
        effects
    }

    /// Handle one event. Events that don't apply to the current state are
    /// ignored.
    pub async fn dispatch(&mut self, event: UiEvent) -> Vec<UiEffect> {
        let result = match event {
            UiEvent::OpenProduct { handle } => return self.open(handle).await,
            UiEvent::OptionChanged { axis, value } => self.select(axis, value).map(|_| Vec::new()),
            UiEvent::QuantityChanged(input) => self.set_quantity(&input).map(|_| Vec::new()),
            UiEvent::AddClicked => self.add_to_cart().await,
            UiEvent::OverlayClicked => Ok(self.close(CloseReason::Overlay)),
            UiEvent::CloseClicked => Ok(self.close(CloseReason::CloseControl)),
            UiEvent::KeyDown(Key::Escape) => Ok(self.close(CloseReason::Escape)),
            UiEvent::KeyDown(Key::Other(_)) => Ok(Vec::new()),
            UiEvent::CloseTimerElapsed { generation } => Ok(self.close_if_current(generation)),
        };

        result.unwrap_or_else(|err| {
            match err {
                ControllerError::NoVariant => tracing::warn!(error = %err, "add to cart ignored"),
                _ => tracing::debug!(error = %err, "ignoring ui event"),
            }
            Vec::new()
        })
    }

    /// Open the modal for `handle` and load the product.
    ///
    /// The modal is open (empty) while the fetch is in flight. On failure it
    /// closes again and the shopper gets an alert.
    pub async fn open(&mut self, handle: ProductHandle) -> Vec<UiEffect> {
        self.generation += 1;
        let generation = self.generation;
        self.last_submission = None;
        self.state = ModalState::Open(OpenModal {
            handle: handle.clone(),
            generation,
            content: None,
            note: None,
        });
        tracing::info!(%handle, generation, "opening product modal");

        let fetched = self.api.fetch_product(&handle).await;
        match fetched {
            Ok(product) => {
                if let Some(open) = self.state.open_mut() {
                    tracing::debug!(%handle, variants = product.variants.len(), "product loaded");
                    open.content = Some(LoadedProduct::new(product));
                }
                Vec::new()
            }
            Err(err) => {
                tracing::error!(%handle, error = %err, "product load failed");
                self.close(CloseReason::LoadFailed);
                vec![UiEffect::Alert(LOAD_FAILURE.to_string())]
            }
        }
    }

    pub fn select(&mut self, axis: usize, value: impl Into<String>) -> Result<(), ControllerError> {
        self.loaded_mut()?.select(axis, value)?;
        Ok(())
    }

    pub fn set_quantity(&mut self, input: &str) -> Result<(), ControllerError> {
        self.loaded_mut()?.set_quantity_input(input);
        Ok(())
    }

    /// Submit the active variant.
    ///
    /// Success sets the "Added!" note and schedules the close; a primary
    /// failure alerts and leaves the modal as it was.
    pub async fn add_to_cart(&mut self) -> Result<Vec<UiEffect>, ControllerError> {
        let open = self.state.open().ok_or(ControllerError::NotOpen)?;
        let generation = open.generation;
        let loaded = open.content.as_ref().ok_or(ControllerError::NotLoaded)?;
        let variant = loaded.active_variant().ok_or(ControllerError::NoVariant)?;

        let item = PrimaryItem {
            variant,
            quantity: loaded.quantity(),
            axes: loaded.axes(),
            selection: loaded.selection(),
        };

        let result = self.submitter.submit(&self.api, item).await;
        match result {
            Ok(submission) => {
                if let Some(open) = self.state.open_mut() {
                    open.note = Some(ADDED_NOTE.to_string());
                }
                self.last_submission = Some(submission);
                Ok(vec![UiEffect::ScheduleClose {
                    after: self.config.close_delay,
                    generation,
                }])
            }
            Err(err) => Ok(vec![UiEffect::Alert(err.user_message())]),
        }
    }

    /// Hide the modal and drop its content. Closing a closed modal is a no-op.
    pub fn close(&mut self, reason: CloseReason) -> Vec<UiEffect> {
        if let ModalState::Open(open) = std::mem::take(&mut self.state) {
            tracing::info!(handle = %open.handle, %reason, "modal closed");
        }
        Vec::new()
    }

    fn close_if_current(&mut self, generation: u64) -> Vec<UiEffect> {
        match self.state.open() {
            Some(open) if open.generation == generation => self.close(CloseReason::AfterAdd),
            _ => {
                tracing::debug!(generation, "stale close timer");
                Vec::new()
            }
        }
    }

    fn loaded_mut(&mut self) -> Result<&mut LoadedProduct, ControllerError> {
        let open = self.state.open_mut().ok_or(ControllerError::NotOpen)?;
        open.content.as_mut().ok_or(ControllerError::NotLoaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickbuy_catalog::{Product, ProductOption, Variant};
    use quickbuy_core::VariantId;
    use quickbuy_storefront::{InMemoryStorefront, StorefrontError};

    fn tee() -> Product {
        let variant = |id: u64, opts: [&str; 2]| Variant {
            id: VariantId::new(id),
            title: opts.join(" / "),
            price: 2000,
            available: true,
            options: opts.iter().map(|s| s.to_string()).collect(),
        };
        Product {
            id: None,
            handle: Some("classic-tee".to_string()),
            title: "Classic Tee".to_string(),
            description: "Soft cotton.".to_string(),
            price: Some(2000),
            images: Vec::new(),
            featured_image: None,
            options: ["Color", "Size"]
                .iter()
                .map(|n| ProductOption {
                    name: n.to_string(),
                    values: Vec::new(),
                })
                .collect(),
            variants: vec![variant(1, ["Red", "Medium"]), variant(4, ["Black", "Medium"])],
        }
    }

    fn handle() -> ProductHandle {
        "classic-tee".parse().unwrap()
    }

    fn controller() -> ModalController<InMemoryStorefront> {
        let store = InMemoryStorefront::new();
        store.insert_product(handle(), tee());
        ModalController::new(store, ModalConfig::default())
    }

    fn block_on<F: core::future::Future>(fut: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(fut)
    }

    #[test]
    fn open_loads_product_and_defaults_selection() {
        let mut c = controller();
        let effects = block_on(c.open(handle()));
        assert!(effects.is_empty());
        let view = c.view();
        assert!(!view.hidden);
        assert_eq!(view.title, "Classic Tee");
        assert_eq!(view.price, "$20.00");
    }

    #[test]
    fn failed_load_alerts_and_stays_closed() {
        let mut c = controller();
        c.api()
            .fail_product(handle(), StorefrontError::Network("offline".to_string()));
        let effects = block_on(c.open(handle()));
        assert_eq!(effects, vec![UiEffect::Alert(LOAD_FAILURE.to_string())]);
        assert!(!c.state().is_open());
        assert_eq!(c.view(), ModalView::hidden());
    }

    #[test]
    fn add_before_open_is_an_error() {
        let mut c = controller();
        assert_eq!(block_on(c.add_to_cart()), Err(ControllerError::NotOpen));
        assert_eq!(c.select(0, "Black"), Err(ControllerError::NotOpen));
    }

    #[test]
    fn successful_add_notes_and_schedules_close() {
        let mut c = controller();
        block_on(c.open(handle()));
        c.select(0, "Black").unwrap();
        let effects = block_on(c.add_to_cart()).unwrap();
        assert_eq!(
            effects,
            vec![UiEffect::ScheduleClose {
                after: Duration::from_millis(400),
                generation: 1
            }]
        );
        assert_eq!(c.view().note, ADDED_NOTE);
        assert_eq!(
            c.last_submission().unwrap().primary.lines()[0].id,
            VariantId::new(4)
        );
    }

    #[test]
    fn failed_add_alerts_and_keeps_modal_open() {
        let mut c = controller();
        block_on(c.open(handle()));
        c.api().reject_variant(VariantId::new(1), "Sold out");
        let before = c.state().clone();

        let effects = block_on(c.add_to_cart()).unwrap();
        assert_eq!(effects, vec![UiEffect::Alert("Sold out".to_string())]);
        assert_eq!(c.state(), &before);
        assert!(c.last_submission().is_none());
    }

    #[test]
    fn stale_close_timer_does_not_close_reopened_modal() {
        let mut c = controller();
        block_on(c.open(handle()));
        block_on(c.add_to_cart()).unwrap();
        block_on(c.open(handle()));

        block_on(c.dispatch(UiEvent::CloseTimerElapsed { generation: 1 }));
        assert!(c.state().is_open());
        block_on(c.dispatch(UiEvent::CloseTimerElapsed { generation: 2 }));
        assert!(!c.state().is_open());
    }

    #[test]
    fn invalid_events_are_ignored() {
        let mut c = controller();
        block_on(c.open(handle()));
        let before = c.state().clone();
        let effects = block_on(c.dispatch(UiEvent::OptionChanged {
            axis: 9,
            value: "Wool".to_string(),
        }));
        assert!(effects.is_empty());
        assert_eq!(c.state(), &before);
    }

    /// Log lines written while `f` runs, as JSON text.
    fn captured_logs(f: impl FnOnce()) -> String {
        use std::io::Write;
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Buffer(Arc<Mutex<Vec<u8>>>);

        impl Write for Buffer {
            fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(bytes);
                Ok(bytes.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);

        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn add_without_variants_is_ignored_with_a_warning() {
        let store = InMemoryStorefront::new();
        let mut empty = tee();
        empty.variants.clear();
        store.insert_product(handle(), empty);
        let mut c = ModalController::new(store, ModalConfig::default());
        block_on(c.open(handle()));

        let logs = captured_logs(|| {
            let effects = block_on(c.dispatch(UiEvent::AddClicked));
            assert!(effects.is_empty());
        });

        assert_eq!(block_on(c.add_to_cart()), Err(ControllerError::NoVariant));
        assert!(c.api().cart_requests().is_empty());
        let line = logs
            .lines()
            .find(|l| l.contains("add to cart ignored"))
            .expect("warning logged");
        assert!(line.contains("\"level\":\"WARN\""), "{line}");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn ui_step() -> impl Strategy<Value = UiEvent> {
            prop_oneof![
                (0usize..3, prop::sample::select(vec!["Red", "Black", "Medium", "Small", "Wool"]))
                    .prop_map(|(axis, value)| UiEvent::OptionChanged {
                        axis,
                        value: value.to_string(),
                    }),
                "[0-9a-z]{0,3}".prop_map(UiEvent::QuantityChanged),
                Just(UiEvent::AddClicked),
            ]
        }

        fn dismissal() -> impl Strategy<Value = UiEvent> {
            prop_oneof![
                Just(UiEvent::KeyDown(Key::Escape)),
                Just(UiEvent::OverlayClicked),
                Just(UiEvent::CloseClicked),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 64,
                ..ProptestConfig::default()
            })]

            /// Property: whatever the shopper did, a dismissal hides the modal
            /// and leaves no content behind.
            #[test]
            fn dismissal_always_hides_and_clears(
                steps in prop::collection::vec(ui_step(), 0..12),
                close in dismissal(),
            ) {
                let mut c = controller();
                block_on(async {
                    c.open(handle()).await;
                    for step in steps {
                        c.dispatch(step).await;
                    }
                    c.dispatch(close).await;
                });

                prop_assert_eq!(c.state(), &ModalState::Closed);
                prop_assert_eq!(c.view(), ModalView::hidden());
            }
        }
    }
}
