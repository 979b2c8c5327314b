// ============================================================================
// Async Emitter
// Dispatch that completes only after every listener finished reacting
// ============================================================================

use super::config::{DispatchMode, EmitterConfig};
use super::emitter::EventWaiter;
use super::errors::{EventError, EventResult, ListenerError, ListenerFailure};
use super::event::{Event, EventData, ListenerId};
use super::registry::{Deliveries, Delivery, Registry};
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Boxed future returned by an async listener.
pub type ListenerFuture = Pin<Box<dyn Future<Output = Result<(), ListenerError>> + Send + 'static>>;

/// Persistent async listener callback.
pub type AsyncListener = Arc<dyn Fn(Event) -> ListenerFuture + Send + Sync>;

/// Event emitter whose dispatch awaits its listeners.
///
/// Use it where the caller must know every subscriber has reacted before it
/// moves on, e.g. an order-confirmation listener updating account state.
///
/// Each listener runs as its own tokio task, so a listener that fails or
/// panics is isolated: the remaining listeners still run, and the failures
/// come back together as `EventError::Dispatch`.
///
/// # Panics
///
/// `notify_listeners` and `notify` must be polled inside a Tokio runtime:
/// listener tasks are started with `tokio::spawn`, which panics when no
/// runtime is running (e.g. under `futures::executor::block_on`).
///
/// # Example
/// ```rust
/// use market_primitives::events::{names, AsyncEmitter, EventData};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let emitter = AsyncEmitter::new();
/// emitter.subscribe(names::ORDER_FILLED, |event| async move {
///     assert_eq!(event.event_type, "order-filled");
///     Ok(())
/// });
/// emitter
///     .notify_listeners(names::ORDER_FILLED, EventData::new())
///     .await
///     .unwrap();
/// # }
/// ```
#[derive(Clone)]
pub struct AsyncEmitter {
    config: Arc<EmitterConfig>,
    registry: Arc<Mutex<Registry<AsyncListener>>>,
}

impl AsyncEmitter {
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    pub fn with_config(config: EmitterConfig) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(Mutex::new(Registry::new())),
        }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Register a persistent async listener for `event_type`.
    pub fn subscribe<F, Fut>(&self, event_type: &str, callback: F) -> ListenerId
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ListenerError>> + Send + 'static,
    {
        let listener: AsyncListener =
            Arc::new(move |event| -> ListenerFuture { Box::pin(callback(event)) });
        let id = self.registry.lock().add_persistent(event_type, listener);
        tracing::debug!(
            emitter = %self.config.name,
            event_type,
            listener = %id,
            "async listener added"
        );
        id
    }

    /// Same as `subscribe`.
    pub fn add_event_listener<F, Fut>(&self, event_type: &str, callback: F) -> ListenerId
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ListenerError>> + Send + 'static,
    {
        self.subscribe(event_type, callback)
    }

    /// Remove a registration. Returns `false` for unknown or removed ids.
    pub fn unsubscribe(&self, id: &ListenerId) -> bool {
        let removed = self.registry.lock().remove(id);
        if removed {
            tracing::debug!(emitter = %self.config.name, listener = %id, "async listener removed");
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
        EventWaiter::new(event_type, receiver)
    }

    /// Deliver a new event and wait for every listener of `event_type`.
    ///
    /// Listeners are started in registration order. In `Sequential` mode each
    /// one finishes before the next starts, and a listener removed by an
    /// earlier one in the same pass is skipped. In `Concurrent` mode the live
    /// listeners are read once before any task is spawned, so each of them
    /// runs exactly once and a removal made by one takes effect from the next
    /// event. Pending
    /// waiters are resolved before any listener runs.
    ///
    /// # Errors
    /// Returns `Dispatch` listing every listener that returned an error or
    /// panicked, after all listeners were attempted.
    ///
    /// # Panics
    /// Panics if polled outside a Tokio runtime.
    pub async fn notify_listeners(&self, event_type: &str, data: EventData) -> EventResult<()> {
        let event = Event::new(event_type, data);
        let deliveries = self.registry.lock().take_deliveries(event_type);
        tracing::debug!(
            emitter = %self.config.name,
            event_type,
            listeners = deliveries.len(),
            mode = ?self.config.dispatch,
            "dispatching event"
        );

        let listeners = self.resolve_waiters(&event, deliveries);
        let failures = match self.config.dispatch {
            DispatchMode::Sequential => self.run_sequential(&event, listeners).await,
            DispatchMode::Concurrent => self.run_concurrent(&event, listeners).await,
        };

        if failures.is_empty() {
            return Ok(());
        }
        for failure in &failures {
            tracing::warn!(
                emitter = %self.config.name,
                event_type,
                listener = %failure.listener,
                error = %failure.message,
                "listener failed"
            );
        }
        Err(EventError::Dispatch {
            event_type: event_type.to_owned(),
            failures,
        })
    }

    /// Deliver an event with an empty payload.
    pub async fn notify(&self, event_type: &str) -> EventResult<()> {
        self.notify_listeners(event_type, EventData::new()).await
    }

    pub fn listener_count(&self, event_type: &str) -> usize {
        self.registry.lock().listener_count(event_type)
    }

    pub fn event_types(&self) -> Vec<String> {
        self.registry.lock().event_types()
    }

    pub fn clear(&self, event_type: &str) -> usize {
        self.registry.lock().clear(event_type)
    }

    pub fn clear_all(&self) {
        self.registry.lock().clear_all();
    }

    fn resolve_waiters(
        &self,
        event: &Event,
        deliveries: Deliveries<AsyncListener>,
    ) -> Vec<(ListenerId, AsyncListener)> {
        let mut listeners = Vec::with_capacity(deliveries.len());
        for delivery in deliveries {
            match delivery {
                Delivery::Callback(id, listener) => listeners.push((id, listener)),
                Delivery::Waiter(sender) => {
                    let _ = sender.send(event.clone());
                },
            }
        }
        listeners
    }

    fn start(
        &self,
        event: &Event,
        id: ListenerId,
        listener: &AsyncListener,
    ) -> JoinHandle<Result<(), ListenerError>> {
        tracing::trace!(listener = %id, "starting listener");
        tokio::spawn(listener(event.clone()))
    }

    async fn run_sequential(
        &self,
        event: &Event,
        listeners: Vec<(ListenerId, AsyncListener)>,
    ) -> Vec<ListenerFailure> {
        let mut failures = Vec::new();
        for (id, listener) in listeners {
            let live = self.registry.lock().contains(&id);
            if !live {
                tracing::trace!(listener = %id, "skipping listener removed during dispatch");
                continue;
            }
            let handle = self.start(event, id, &listener);
            if let Some(failure) = settle(id, handle).await {
                failures.push(failure);
            }
        }
        failures
    }

    async fn run_concurrent(
        &self,
        event: &Event,
        listeners: Vec<(ListenerId, AsyncListener)>,
    ) -> Vec<ListenerFailure> {
        let live: Vec<_> = {
            let registry = self.registry.lock();
            listeners
                .into_iter()
                .filter(|(id, _)| registry.contains(id))
                .collect()
        };
        let handles: Vec<_> = live
            .into_iter()
            .map(|(id, listener)| (id, self.start(event, id, &listener)))
            .collect();

        let mut failures = Vec::new();
        for (id, handle) in handles {
            if let Some(failure) = settle(id, handle).await {
                failures.push(failure);
            }
        }
        failures
    }
}

impl Default for AsyncEmitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Await one listener task and turn an error or panic into a failure record.
async fn settle(id: ListenerId, handle: JoinHandle<Result<(), ListenerError>>) -> Option<ListenerFailure> {
    let message = match handle.await {
        Ok(Ok(())) => return None,
        Ok(Err(err)) => err.to_string(),
        Err(join_err) if join_err.is_panic() => format!("listener panicked: {join_err}"),
        Err(join_err) => format!("listener task aborted: {join_err}"),
    };
    Some(ListenerFailure {
        listener: id,
        message,
    })
}
