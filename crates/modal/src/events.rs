//! UI events and the bus that carries them to the controller.
//!
//! The page (or a test) publishes [`UiEvent`]s; a controller receives them
//! only while attached, through its own [`Subscription`]. Dropping the
//! subscription is the detach: the bus prunes dead subscribers on the next
//! publish.

use std::sync::{Mutex, mpsc};

use quickbuy_core::ProductHandle;

/// Keyboard keys the modal cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other(String),
}

impl Key {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Self::Escape,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Something the shopper (or a timer) did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Click on a product trigger carrying a handle.
    OpenProduct { handle: ProductHandle },
    /// A color pill or size/option select changed.
    OptionChanged { axis: usize, value: String },
    /// Raw quantity input.
    QuantityChanged(String),
    AddClicked,
    OverlayClicked,
    CloseClicked,
    KeyDown(Key),
    /// A close scheduled by [`crate::UiEffect::ScheduleClose`] is due.
    CloseTimerElapsed { generation: u64 },
}

/// Why the modal closed (for logs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Overlay,
    CloseControl,
    Escape,
    AfterAdd,
    LoadFailed,
    Detached,
}

impl core::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Overlay => "overlay",
            Self::CloseControl => "close_control",
            Self::Escape => "escape",
            Self::AfterAdd => "after_add",
            Self::LoadFailed => "load_failed",
            Self::Detached => "detached",
        })
    }
}

/// A subscription to a bus. Single consumer.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: mpsc::Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: mpsc::Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Everything published so far, in publish order.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Pub/sub for UI events.
pub trait EventBus<M> {
    type Error: core::fmt::Debug;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InMemoryBusError {
    /// Publish failed due to internal lock poisoning.
    Poisoned,
}

/// In-memory fan-out bus (no IO, no async).
#[derive(Debug)]
pub struct InMemoryEventBus<M> {
    subscribers: Mutex<Vec<mpsc::Sender<M>>>,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live subscriptions as of the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        let mut subs = self.subscribers.lock().map_err(|_| InMemoryBusError::Poisoned)?;

        // Drop detached subscribers while publishing.
        subs.retain(|tx| tx.send(message.clone()).is_ok());

        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();

        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }
}
