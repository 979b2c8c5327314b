// ============================================================================
// Event Handler Interface
// Object-style subscribers for the synchronous emitter
// ============================================================================

use super::event::Event;

/// Subscriber that prefers a type over a closure.
/// Implementations can handle logging, metrics, state updates, etc.
pub trait EventHandler: Send + Sync {
    /// Handle one event
    fn on_event(&self, event: &Event);
}

impl<F> EventHandler for F
where
    F: Fn(&Event) + Send + Sync,
{
    fn on_event(&self, event: &Event) {
        self(event)
    }
}

/// Logging event handler
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: &Event) {
        tracing::debug!(
            event_type = %event.event_type,
            timestamp = %event.timestamp,
            "Emitter event: {:?}",
            event.data
        );
    }
}
