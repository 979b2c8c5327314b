// ============================================================================
// Events Module
// Ordered publish/subscribe for market and account events
// ============================================================================
//
// This module provides:
// - Emitter: synchronous dispatch on the caller's thread
// - AsyncEmitter: dispatch that awaits every listener (feature "async")
// - EventWaiter: one-shot future for the next event of a type
// - Event / EventData / ListenerId: value objects
//
// Every registered listener sees each event once, in registration order.

mod config;
mod emitter;
mod errors;
mod event;
mod handler;
mod registry;

#[cfg(feature = "async")]
mod async_emitter;

pub use config::{DispatchMode, EmitterConfig};
pub use emitter::{Emitter, EventWaiter, Listener};
pub use errors::{EventError, EventResult, ListenerError, ListenerFailure};
pub use event::{names, payload, Event, EventData, ListenerId};
pub use handler::{EventHandler, LoggingEventHandler};

#[cfg(feature = "async")]
pub use async_emitter::{AsyncEmitter, AsyncListener, ListenerFuture};
