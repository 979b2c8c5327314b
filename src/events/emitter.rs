// ============================================================================
// Emitter
// Synchronous publish/subscribe hub keyed by event type name
// ============================================================================

use super::config::EmitterConfig;
use super::errors::{EventError, EventResult};
use super::event::{Event, EventData, ListenerId};
use super::handler::EventHandler;
use super::registry::{Delivery, Registry};
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Persistent listener callback.
pub type Listener = Arc<dyn EventHandler>;

/// Future resolving to the next event of one type.
///
/// Returned by `wait_for_next`. The registration exists from the moment the
/// waiter is created, so an event fired right after creation is not missed.
/// Dropping the waiter abandons it.
#[must_use = "a waiter does nothing unless awaited"]
pub struct EventWaiter {
    event_type: String,
    receiver: oneshot::Receiver<Event>,
}

impl EventWaiter {
    pub(crate) fn new(event_type: &str, receiver: oneshot::Receiver<Event>) -> Self {
        Self {
            event_type: event_type.to_owned(),
            receiver,
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }
}

impl Future for EventWaiter {
    type Output = EventResult<Event>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        Pin::new(&mut this.receiver).poll(cx).map(|result| {
            result.map_err(|_| EventError::WaiterDropped {
                event_type: this.event_type.clone(),
            })
        })
    }
}

/// Synchronous event emitter.
///
/// Listeners run on the caller's thread, in registration order, before
/// `notify_listeners` returns. Clones share one registration table.
///
/// # Example
/// ```rust
/// use market_primitives::events::{names, payload, Emitter};
/// use serde_json::json;
///
/// let emitter = Emitter::new();
/// let id = emitter.subscribe(names::TICK, |event| {
///     assert_eq!(event.get("bid"), Some(&json!("1.1")));
/// });
/// emitter.notify_listeners(names::TICK, payload(json!({"bid": "1.1"})));
/// emitter.unsubscribe(&id);
/// ```
#[derive(Clone)]
pub struct Emitter {
    name: Arc<str>,
    registry: Arc<Mutex<Registry<Listener>>>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    pub fn with_config(config: EmitterConfig) -> Self {
        Self {
            name: Arc::from(config.name),
            registry: Arc::new(Mutex::new(Registry::new())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a persistent listener for `event_type`.
    pub fn subscribe<F>(&self, event_type: &str, callback: F) -> ListenerId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.subscribe_handler(event_type, Arc::new(callback))
    }

    /// Register a shared handler object for `event_type`.
    pub fn subscribe_handler(&self, event_type: &str, handler: Arc<dyn EventHandler>) -> ListenerId {
        let id = self.registry.lock().add_persistent(event_type, handler);
        tracing::debug!(emitter = %self.name, event_type, listener = %id, "listener added");
        id
    }

    /// Same as `subscribe`.
    pub fn add_event_listener<F>(&self, event_type: &str, callback: F) -> ListenerId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.subscribe(event_type, callback)
    }

    /// Remove a registration. Returns `false` for unknown or removed ids.
    pub fn unsubscribe(&self, id: &ListenerId) -> bool {
        let removed = self.registry.lock().remove(id);
        if removed {
            tracing::debug!(emitter = %self.name, listener = %id, "listener removed");
        }
        removed
    }

    /// Same as `unsubscribe`.
    pub fn remove_event_listener(&self, id: &ListenerId) -> bool {
        self.unsubscribe(id)
    }

    /// Wait for the next event of `event_type`.
    pub fn wait_for_next(&self, event_type: &str) -> EventWaiter {
        let receiver = self.registry.lock().add_one_shot(event_type);
        tracing::trace!(emitter = %self.name, event_type, "waiter added");
        EventWaiter::new(event_type, receiver)
    }

    /// Deliver a new event to every listener of `event_type`.
    ///
    /// The listener list is snapshotted first: listeners added during the
    /// pass see the next event, and a listener removed by an earlier one in
    /// the same pass is skipped. Pending waiters are resolved before any
    /// listener runs.
    ///
    /// # Panics
    ///
    /// Listener panics propagate to the caller; listeners after the
    /// panicking one do not run for this event.
    pub fn notify_listeners(&self, event_type: &str, data: EventData) {
        let event = Event::new(event_type, data);
        let deliveries = self.registry.lock().take_deliveries(event_type);
        tracing::debug!(
            emitter = %self.name,
            event_type,
            listeners = deliveries.len(),
            "dispatching event"
        );

        let mut callbacks = Vec::with_capacity(deliveries.len());
        for delivery in deliveries {
            match delivery {
                Delivery::Callback(id, handler) => callbacks.push((id, handler)),
                Delivery::Waiter(sender) => {
                    // receiver may have been dropped since the snapshot
                    let _ = sender.send(event.clone());
                },
            }
        }

        for (id, handler) in callbacks {
            let live = self.registry.lock().contains(&id);
            if !live {
                tracing::trace!(listener = %id, "skipping listener removed during dispatch");
                continue;
            }
            tracing::trace!(listener = %id, "invoking listener");
            handler.on_event(&event);
        }
    }

    /// Deliver an event with an empty payload.
    pub fn notify(&self, event_type: &str) {
        self.notify_listeners(event_type, EventData::new());
    }

    /// Registrations (persistent and pending waiters) for `event_type`.
    /// Waiters whose `EventWaiter` was dropped are not counted.
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.registry.lock().listener_count(event_type)
    }

    /// Event types with at least one registration, sorted.
    pub fn event_types(&self) -> Vec<String> {
        self.registry.lock().event_types()
    }

    /// Remove every registration for `event_type`; returns how many went.
    pub fn clear(&self, event_type: &str) -> usize {
        self.registry.lock().clear(event_type)
    }

    pub fn clear_all(&self) {
        self.registry.lock().clear_all();
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}
