// ============================================================================
// Event Errors
// ============================================================================

use super::event::ListenerId;
use thiserror::Error;

/// Error returned by an async listener.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// One listener that failed while handling an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerFailure {
    pub listener: ListenerId,
    pub message: String,
}

/// Errors surfaced by the emitters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// Every listener was attempted; these ones failed
    #[error("{} listener(s) failed while handling {event_type:?}", .failures.len())]
    Dispatch {
        event_type: String,
        failures: Vec<ListenerFailure>,
    },

    /// A pending waiter was removed before its event fired
    #[error("waiter for {event_type:?} was dropped before the event fired")]
    WaiterDropped { event_type: String },
}

/// Result type alias for emitter operations
pub type EventResult<T> = Result<T, EventError>;
